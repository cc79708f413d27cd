//! ステートファイル
//!
//! インポートした成果物の来歴（コミット、チェックサム、サイズ）を JSON で保存する。

use super::fetch::FetchSummary;
use crate::error::ImportError;
use crate::vcs::Provenance;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// ステートファイルの種別
pub const STATE_KIND_IMPORT: &str = "import";

/// インポート来歴
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// 種別（常に "import"）
    pub kind: String,
    /// 入力として与えられた参照（パスまたはURL）
    pub source: String,
    /// ワークスペースルートからのリンクパス
    pub data_path: PathBuf,
    /// ワークスペースルートからのキャッシュパス
    pub cache_path: PathBuf,
    /// インポート時の HEAD コミット
    pub commit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// `sha256:<hex>`
    pub checksum: String,
    pub size: u64,
    /// RFC3339
    pub created_at: String,
    pub tool_version: String,
}

/// ステートファイルを組み立てるための情報
#[derive(Debug, Clone)]
pub struct ProvenanceContext<'a> {
    pub source: &'a str,
    pub data_path: PathBuf,
    pub cache_path: PathBuf,
    pub provenance: &'a Provenance,
    pub fetched: &'a FetchSummary,
}

impl StateRecord {
    pub fn new(context: &ProvenanceContext<'_>) -> Self {
        Self {
            kind: STATE_KIND_IMPORT.to_string(),
            source: context.source.to_string(),
            data_path: context.data_path.clone(),
            cache_path: context.cache_path.clone(),
            commit: context.provenance.commit.clone(),
            branch: context.provenance.branch.clone(),
            checksum: context.fetched.checksum(),
            size: context.fetched.bytes,
            created_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// ステートファイルの読み書き
pub struct StateRecorder;

impl StateRecorder {
    /// 来歴を `path` に書き出す
    ///
    /// 既存のファイルは無条件に置き換える。親ディレクトリは作らない。
    pub fn record(path: &Path, context: &ProvenanceContext<'_>) -> Result<StateRecord, ImportError> {
        let record = StateRecord::new(context);
        Self::write(path, &record).map_err(|source| ImportError::StateWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(record)
    }

    fn write(path: &Path, record: &StateRecord) -> io::Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        // 同じディレクトリに一時ファイルを作成
        let mut temp_file = NamedTempFile::new_in(parent)?;

        let mut content = serde_json::to_string_pretty(record)?;
        content.push('\n');
        temp_file.write_all(content.as_bytes())?;

        // アトミックに置換
        temp_file.persist(path)?;
        Ok(())
    }

    /// ステートファイルを読み込む
    pub fn load(path: &Path) -> io::Result<StateRecord> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
