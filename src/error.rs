use std::path::PathBuf;
use thiserror::Error;

pub mod code;
pub mod formatter;

pub use code::ErrorCode;
pub use formatter::ErrorFormatter;

/// インポート処理のドメインエラー
///
/// ユーザーに1行で表示され、終了コード1で終了する。
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Input file \"{0}\" does not exist")]
    InvalidSource(String),

    #[error("Input file \"{0}\" has to be a regular file")]
    NotAFile(String),

    #[error("Output file \"{}\" already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Output file directory \"{}\" does not exist", .0.display())]
    DestinationDirectoryMissing(PathBuf),

    #[error("Output file \"{}\" is outside of the data directory \"{}\"", .path.display(), .data_dir.display())]
    DestinationOutsideData { path: PathBuf, data_dir: PathBuf },

    #[error("Output file \"{}\" points into the reserved directory \"{}\"", .path.display(), .reserved.display())]
    DestinationReserved { path: PathBuf, reserved: PathBuf },

    #[error("Failed to fetch \"{source_ref}\" into cache \"{}\": {reason}", .cache.display())]
    Fetch {
        source_ref: String,
        cache: PathBuf,
        #[source]
        reason: FetchFailure,
    },

    #[error("Failed to create symlink \"{}\": {source}", .link.display())]
    Link {
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file \"{}\": {source}", .path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    /// エラーコードを取得
    pub fn code(&self) -> ErrorCode {
        match self {
            ImportError::InvalidSource(_) => ErrorCode::Imp001,
            ImportError::NotAFile(_) => ErrorCode::Imp002,
            ImportError::DestinationExists(_) => ErrorCode::Imp003,
            ImportError::DestinationDirectoryMissing(_) => ErrorCode::Imp004,
            ImportError::DestinationOutsideData { .. } => ErrorCode::Imp005,
            ImportError::DestinationReserved { .. } => ErrorCode::Imp006,
            ImportError::Fetch { .. } => ErrorCode::Imp007,
            ImportError::Link { .. } => ErrorCode::Imp008,
            ImportError::StateWrite { .. } => ErrorCode::Imp009,
        }
    }
}

/// コンテンツ取得時の失敗要因
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16 },
}

/// NLX統一エラー型
#[derive(Debug, Error)]
pub enum NlxError {
    #[error(transparent)]
    Import(#[from] ImportError),

    /// ワークスペースが操作可能な状態にない（理由はプロバイダーが出力済み）
    #[error("Workspace is not ready for an import")]
    NotReady,

    #[error("Version control error: {0}")]
    Vcs(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NlxError>;

impl NlxError {
    /// ドメインエラー（ユーザー向けに整形して表示するもの）かどうか
    pub fn is_domain(&self) -> bool {
        matches!(self, NlxError::Import(_) | NlxError::NotReady)
    }
}
