//! インポートパイプライン（状態マシン）
//!
//! ## 状態遷移図
//!
//! ```text
//! Init ──▶ Validated ──▶ Fetched ──▶ Linked ──▶ Recorded ──▶ Done
//!   │          │            │          │           │
//!   └──────────┴────────────┴──────────┴───────────┴──▶ Failed
//! ```
//!
//! どの段階で失敗しても以降の処理は行わず、完了済みの処理も戻さない。

use super::fetch::{ContentFetcher, FetchSummary};
use super::layout::{LayoutConvention, TargetLayout};
use super::link::{LinkBinder, WorkspaceLink};
use super::source::{self, ResolvedSource};
use super::state::{ProvenanceContext, StateRecord, StateRecorder};
use super::ImportRequest;
use crate::error::{NlxError, Result};
use crate::log::LogSink;
use crate::vcs::{ProvenanceProvider, ReadinessProvider};

/// パイプラインの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Init,
    Validated,
    Fetched,
    Linked,
    Recorded,
    Done,
    Failed,
}

impl ImportState {
    /// 正常系での次の状態
    pub fn next(self) -> Option<Self> {
        match self {
            ImportState::Init => Some(ImportState::Validated),
            ImportState::Validated => Some(ImportState::Fetched),
            ImportState::Fetched => Some(ImportState::Linked),
            ImportState::Linked => Some(ImportState::Recorded),
            ImportState::Recorded => Some(ImportState::Done),
            ImportState::Done | ImportState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ImportState::Done | ImportState::Failed)
    }

    /// Failed へは終端以外のどこからでも遷移できる
    pub fn can_transition_to(self, to: ImportState) -> bool {
        if to == ImportState::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

/// パイプラインが利用する外部機能
pub struct Collaborators<'a> {
    pub readiness: &'a dyn ReadinessProvider,
    pub provenance: &'a dyn ProvenanceProvider,
    pub convention: &'a LayoutConvention,
    pub fetcher: &'a ContentFetcher,
    pub log: &'a dyn LogSink,
}

/// 成功したインポートの結果
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub source: ResolvedSource,
    pub layout: TargetLayout,
    pub link: WorkspaceLink,
    pub fetched: FetchSummary,
    pub record: StateRecord,
}

/// 各コンポーネントを順に実行する
pub struct ImportOrchestrator<'a> {
    deps: Collaborators<'a>,
    state: ImportState,
    failed_at: Option<ImportState>,
}

impl<'a> ImportOrchestrator<'a> {
    pub fn new(deps: Collaborators<'a>) -> Self {
        Self {
            deps,
            state: ImportState::Init,
            failed_at: None,
        }
    }

    /// 現在の状態
    #[cfg(test)]
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// 失敗した時点の状態（失敗していなければ None）
    pub fn failed_at(&self) -> Option<ImportState> {
        self.failed_at
    }

    /// インポートを実行する
    pub async fn run(&mut self, request: &ImportRequest) -> Result<ImportReport> {
        let result = self.execute(request).await;
        if result.is_err() && !self.state.is_terminal() {
            self.failed_at = Some(self.state);
            self.transition(ImportState::Failed);
        }
        result
    }

    async fn execute(&mut self, request: &ImportRequest) -> Result<ImportReport> {
        if self.state != ImportState::Init {
            return Err(NlxError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "an import orchestrator runs only once",
            )));
        }

        if !self.deps.readiness.is_ready() {
            return Err(NlxError::NotReady);
        }

        let source = source::resolve(&request.input_reference)?;
        let provenance = self.deps.provenance.provenance()?;
        let layout = self
            .deps
            .convention
            .layout(&request.output_reference, &source)?;
        self.transition(ImportState::Validated);

        if source.is_remote() {
            self.deps
                .log
                .info(&format!("Downloading file {} ...", source.display_ref()));
        }
        let fetched = self
            .deps
            .fetcher
            .fetch(&source, &layout.cache_storage_path)
            .await?;
        self.deps.log.info(&format!(
            "Input file \"{}\" was {} to cache \"{}\" ({} bytes)",
            source.display_ref(),
            if source.is_remote() { "downloaded" } else { "copied" },
            self.display(&layout.cache_storage_path),
            fetched.bytes
        ));
        self.transition(ImportState::Fetched);

        let link = LinkBinder::bind(&layout.workspace_link_path, &layout.cache_storage_path)?;
        self.deps.log.info(&format!(
            "Symlink from data file \"{}\" to the cache file \"{}\" was created",
            self.display(&link.link_path),
            link.target.display()
        ));
        self.transition(ImportState::Linked);

        if layout.state_record_path.exists() {
            let previous = match StateRecorder::load(&layout.state_record_path) {
                Ok(stale) => format!("recorded at commit {}", stale.commit),
                Err(_) => "unreadable".to_string(),
            };
            self.deps.log.warn(&format!(
                "State file \"{}\" already exists ({}) and will be replaced",
                self.display(&layout.state_record_path),
                previous
            ));
        }
        let context = ProvenanceContext {
            source: &request.input_reference,
            data_path: self
                .deps
                .convention
                .relative_to_root(&layout.workspace_link_path),
            cache_path: self
                .deps
                .convention
                .relative_to_root(&layout.cache_storage_path),
            provenance: &provenance,
            fetched: &fetched,
        };
        let record = StateRecorder::record(&layout.state_record_path, &context)?;
        self.deps.log.info(&format!(
            "State file \"{}\" was created",
            self.display(&layout.state_record_path)
        ));
        self.transition(ImportState::Recorded);

        self.transition(ImportState::Done);
        Ok(ImportReport {
            source,
            layout,
            link,
            fetched,
            record,
        })
    }

    fn transition(&mut self, next: ImportState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        self.deps
            .log
            .debug(&format!("import state: {:?} -> {:?}", self.state, next));
        self.state = next;
    }

    fn display(&self, path: &std::path::Path) -> String {
        self.deps
            .convention
            .relative_to_root(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
