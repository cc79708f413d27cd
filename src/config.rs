//! ワークスペース設定（nlx.toml）とHTTP設定

use crate::error::{NlxError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// git の管理ディレクトリ（データ・キャッシュ・ステートのいずれにも使えない）
pub const GIT_DIR: &str = ".git";

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = "nlx.toml";

/// ダウンロード時のチャンクサイズ（100 KiB）
pub const DEFAULT_CHUNK_SIZE: usize = 100 * 1024;

/// ワークスペース設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    pub layout: LayoutConfig,
    pub http: HttpConfig,
}

/// データ・キャッシュ・ステートの各ディレクトリ（ワークスペースルートからの相対パス）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cache_dir: PathBuf::from(".cache"),
            state_dir: PathBuf::from(".state"),
        }
    }
}

/// HTTP設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// User-Agent
    pub user_agent: String,
    /// 1回の書き込みで扱う最大バイト数
    pub chunk_size: usize,
    /// タイムアウト（秒）。未指定なら無制限
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("nlx/{}", env!("CARGO_PKG_VERSION")),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

impl WorkspaceConfig {
    /// ワークスペースルートの nlx.toml を読み込む（無ければデフォルト）
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_from(&root.join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(NlxError::Io(e)),
        };

        let config: Self = toml::from_str(&content).map_err(|e| {
            NlxError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.http.chunk_size == 0 {
            return Err(NlxError::Config("http.chunk_size must be positive".to_string()));
        }

        let layout = &self.layout;
        let mut normalized = Vec::new();
        for (key, dir) in [
            ("layout.data_dir", &layout.data_dir),
            ("layout.cache_dir", &layout.cache_dir),
            ("layout.state_dir", &layout.state_dir),
        ] {
            if dir.is_absolute() {
                return Err(NlxError::Config(format!(
                    "{} must be relative to the workspace root: {}",
                    key,
                    dir.display()
                )));
            }
            let dir = normalize_relative(dir).ok_or_else(|| {
                NlxError::Config(format!(
                    "{} must stay inside the workspace root: {}",
                    key,
                    dir.display()
                ))
            })?;
            if dir.starts_with(GIT_DIR) {
                return Err(NlxError::Config(format!(
                    "{} must not point into {}: {}",
                    key,
                    GIT_DIR,
                    dir.display()
                )));
            }
            normalized.push(dir);
        }

        let (data, cache, state) = (&normalized[0], &normalized[1], &normalized[2]);
        // 空のパスはワークスペースルート自身
        for (key, reserved) in [("layout.cache_dir", cache), ("layout.state_dir", state)] {
            if data.starts_with(reserved) {
                return Err(NlxError::Config(format!(
                    "layout.data_dir must not lie inside {}",
                    key
                )));
            }
        }

        if cache.starts_with(state) || state.starts_with(cache) {
            return Err(NlxError::Config(
                "layout.cache_dir and layout.state_dir must not contain each other".to_string(),
            ));
        }

        Ok(())
    }
}

/// `.` と `..` を取り除く（ルートより上に出る場合は None）
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::Normal(part) => normalized.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
