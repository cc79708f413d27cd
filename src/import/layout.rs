//! 出力先パスの導出と検証
//!
//! ワークスペースに見えるリンク、キャッシュ上の実体、ステートファイルの
//! 3つのパスは、データディレクトリからの相対位置を共有する。
//!
//! ```text
//! <root>/<data_dir>/R   -> ワークスペースリンク
//! <root>/<cache_dir>/R  -> キャッシュ（実体）
//! <root>/<state_dir>/R.state -> ステートファイル
//! ```

use super::source::ResolvedSource;
use crate::config::{LayoutConfig, GIT_DIR};
use crate::error::{FetchFailure, ImportError};
use crate::path_ext::PathExt;
use std::path::{Path, PathBuf};

/// ステートファイルの拡張子
pub const STATE_SUFFIX: &str = ".state";

/// 1つの成果物に対応する3つのパス（すべて絶対パス）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    pub workspace_link_path: PathBuf,
    pub cache_storage_path: PathBuf,
    pub state_record_path: PathBuf,
}

/// ワークスペースのディレクトリ規約
#[derive(Debug, Clone)]
pub struct LayoutConvention {
    root: PathBuf,
    data_root: PathBuf,
    cache_root: PathBuf,
    state_root: PathBuf,
    git_dir: PathBuf,
}

impl LayoutConvention {
    /// `root` は実在するワークスペースルート
    pub fn new(root: &Path, config: &LayoutConfig) -> std::io::Result<Self> {
        let root = root.canonicalize()?;
        Ok(Self {
            data_root: root.join(&config.data_dir).absolutize(),
            cache_root: root.join(&config.cache_dir).absolutize(),
            state_root: root.join(&config.state_dir).absolutize(),
            git_dir: root.join(GIT_DIR),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ワークスペースルートからの相対パス（ルート外ならそのまま）
    pub fn relative_to_root(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// リンクパスからキャッシュパスとステートファイルパスを求める
    ///
    /// `link` は正規化済みの絶対パス。
    pub fn map(&self, link: &Path) -> Result<(PathBuf, PathBuf), ImportError> {
        for reserved in [&self.cache_root, &self.state_root, &self.git_dir] {
            if link.starts_with(reserved) {
                return Err(ImportError::DestinationReserved {
                    path: link.to_path_buf(),
                    reserved: reserved.clone(),
                });
            }
        }

        let relative = link
            .strip_prefix(&self.data_root)
            .ok()
            .filter(|r| !r.as_os_str().is_empty())
            .ok_or_else(|| ImportError::DestinationOutsideData {
                path: link.to_path_buf(),
                data_dir: self.data_root.clone(),
            })?;

        let cache = self.cache_root.join(relative);
        let state = self.state_root.join(relative).with_suffix(STATE_SUFFIX);
        Ok((cache, state))
    }

    /// 出力指定から3つのパスを導出し、書き込み可能かを検証する
    ///
    /// 検証に通った場合のみキャッシュの親ディレクトリを作成する。
    pub fn layout(
        &self,
        output_reference: &str,
        source: &ResolvedSource,
    ) -> Result<TargetLayout, ImportError> {
        let output = Path::new(output_reference);
        let requested = if output.is_dir() {
            match source.file_name() {
                Some(name) => output.join(name),
                None => output.to_path_buf(),
            }
        } else {
            output.to_path_buf()
        };

        // 壊れたシンボリックリンクも「存在する」とみなす
        if requested.symlink_metadata().is_ok() {
            return Err(ImportError::DestinationExists(requested));
        }

        let parent = requested
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = match requested.file_name() {
            Some(name) if parent.is_dir() => name,
            _ => return Err(ImportError::DestinationDirectoryMissing(parent.to_path_buf())),
        };
        let parent = parent
            .canonicalize()
            .map_err(|_| ImportError::DestinationDirectoryMissing(parent.to_path_buf()))?;
        let workspace_link_path = parent.join(file_name);

        let (cache_storage_path, state_record_path) = self.map(&workspace_link_path)?;

        // 中断されたインポートの残骸を上書きしない
        if cache_storage_path.symlink_metadata().is_ok() {
            return Err(ImportError::DestinationExists(cache_storage_path));
        }

        if let Some(state_parent) = state_record_path.parent() {
            if !state_parent.is_dir() {
                return Err(ImportError::DestinationDirectoryMissing(
                    state_parent.to_path_buf(),
                ));
            }
        }

        if let Some(cache_parent) = cache_storage_path.parent() {
            std::fs::create_dir_all(cache_parent).map_err(|e| ImportError::Fetch {
                source_ref: source.display_ref(),
                cache: cache_storage_path.clone(),
                reason: FetchFailure::Io(e),
            })?;
        }

        Ok(TargetLayout {
            workspace_link_path,
            cache_storage_path,
            state_record_path,
        })
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
