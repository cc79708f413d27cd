mod cli;
mod commands;
mod config;
mod env;
mod error;
mod http;
mod import;
mod log;
mod output;
mod path_ext;
mod vcs;

use clap::Parser;
use error::{ErrorFormatter, NlxError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, NlxError> {
    let cli = cli::Cli::parse();
    let verbose = cli.verbose;
    log::init(verbose);

    match commands::dispatch(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if !err.is_domain() => Err(err),
        Err(NlxError::Import(err)) => {
            eprintln!("{}", ErrorFormatter::new(verbose > 0).format(&err));
            Ok(ExitCode::FAILURE)
        }
        // NotReady: 理由はワークスペース側でログ出力済み
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
