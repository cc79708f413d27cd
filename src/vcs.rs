//! バージョン管理との連携
//!
//! インポートパイプラインは Git を直接呼ばず、ここで定義するトレイト経由で
//! 「ワークスペースが操作可能か」と「現在の位置（コミット）」を問い合わせる。

mod git;

pub use git::GitWorkspace;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// ワークスペースが新しい操作を受け付けられる状態か判定する
pub trait ReadinessProvider: Send + Sync {
    /// 準備ができていなければ false（理由はプロバイダー自身がログに出す）
    fn is_ready(&self) -> bool;
}

/// 状態ファイルに記録する来歴情報を提供する
pub trait ProvenanceProvider: Send + Sync {
    fn provenance(&self) -> Result<Provenance>;
}

/// バージョン管理上の位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// HEAD のコミットID
    pub commit: String,
    /// 現在のブランチ（detached HEAD の場合は None）
    pub branch: Option<String>,
}
