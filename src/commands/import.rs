//! nlx import コマンド
//!
//! カレントディレクトリを含む git ワークスペースにファイルまたはURLを取り込む。

use crate::config::WorkspaceConfig;
use crate::error::{NlxError, Result};
use crate::http::HttpTransport;
use crate::import::{Collaborators, ContentFetcher, ImportOrchestrator, ImportRequest, LayoutConvention};
use crate::log::TracingSink;
use crate::output::ImportSummary;
use crate::vcs::GitWorkspace;
use clap::Parser;
use std::env;

#[derive(Debug, Parser)]
#[command(after_help = "\
LAYOUT (nlx.toml [layout], defaults shown):
  <OUTPUT> must lie inside data_dir (\".\").
  The content is stored at cache_dir/<path> (\".cache\") and linked from <OUTPUT>.
  The state record is written to state_dir/<path>.state (\".state\").
  The state record's directory must already exist:
  importing into imports/ requires .state/imports/.")]
pub struct Args {
    /// Local file path or http(s)/ftp(s) URL to import
    pub input: String,

    /// Destination path inside the data directory (an existing directory keeps the input's file name)
    pub output: String,
}

pub async fn run(args: Args, verbose: u8) -> Result<()> {
    let cwd = env::current_dir()?;
    let workspace = match GitWorkspace::discover(&cwd) {
        Ok(workspace) => workspace,
        Err(e) => {
            tracing::error!("Not inside a git workspace: {}", e);
            return Err(NlxError::NotReady);
        }
    };

    let config = WorkspaceConfig::load(workspace.root())?;
    let convention = LayoutConvention::new(workspace.root(), &config.layout)?;
    let transport = HttpTransport::new(&config.http).with_progress(verbose < 2);
    let fetcher = ContentFetcher::new(Box::new(transport)).with_chunk_size(config.http.chunk_size);
    let sink = TracingSink;

    let mut orchestrator = ImportOrchestrator::new(Collaborators {
        readiness: &workspace,
        provenance: &workspace,
        convention: &convention,
        fetcher: &fetcher,
        log: &sink,
    });
    let request = ImportRequest::new(args.input, args.output);
    let report = match orchestrator.run(&request).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(state) = orchestrator.failed_at() {
                tracing::debug!("Import stopped in state {:?}: {}", state, e);
            }
            return Err(e);
        }
    };

    let summary = ImportSummary::from_report(&report, convention.root());
    println!("{} {}", summary.prefix, summary.message);
    println!("{}", summary.detail);
    Ok(())
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
