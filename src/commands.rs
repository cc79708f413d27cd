use crate::cli::{Cli, Command};
use crate::error::Result;

pub mod import;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Import(args) => import::run(args, cli.verbose).await,
    }
}
