//! データインポート
//!
//! ローカルファイルまたはURLをワークスペースのキャッシュに取り込み、
//! データディレクトリに相対シンボリックリンクを張って、来歴をステートファイルに残す。

mod fetch;
mod layout;
mod link;
mod pipeline;
mod source;
mod state;

pub use fetch::{BoxFuture, ChunkStream, ContentFetcher, RemoteTransport};
pub use layout::LayoutConvention;
pub use pipeline::{Collaborators, ImportOrchestrator, ImportReport};

#[cfg(test)]
pub use source::ResolvedSource;

/// 1回のインポート要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// ローカルファイルパスまたはURL
    pub input_reference: String,
    /// リンクを作成するパス（既存ディレクトリならその中に作成）
    pub output_reference: String,
}

impl ImportRequest {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input_reference: input.into(),
            output_reference: output.into(),
        }
    }
}
