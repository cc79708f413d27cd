//! ワークスペースリンク
//!
//! ワークスペース上のパスからキャッシュ上の実体への相対シンボリックリンクを張る。
//! リンクはバイト列を所有しない（ワークスペースパス -> キャッシュパス の関係）。

use crate::error::ImportError;
use crate::path_ext::PathExt;
use std::io;
use std::path::{Path, PathBuf};

/// ワークスペースパスからキャッシュパスへの関係
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLink {
    /// リンク自身のパス
    pub link_path: PathBuf,
    /// リンクに書かれた（相対）ターゲット
    pub target: PathBuf,
}

impl WorkspaceLink {
    /// ターゲットをリンクのディレクトリ基準で解決した絶対パス
    pub fn resolve(&self) -> PathBuf {
        if self.target.is_absolute() {
            return self.target.absolutize();
        }
        let base = self.link_path.parent().unwrap_or(Path::new("."));
        base.join(&self.target).absolutize()
    }
}

/// 相対シンボリックリンクの作成と参照
pub struct LinkBinder;

impl LinkBinder {
    /// `link_path` に `cache_path` を指す相対リンクを作成する
    ///
    /// 両方とも絶対パスであること。
    pub fn bind(link_path: &Path, cache_path: &Path) -> Result<WorkspaceLink, ImportError> {
        let link_error = |source: io::Error| ImportError::Link {
            link: link_path.to_path_buf(),
            source,
        };

        // レイアウト検証後に作られた可能性があるので再確認する
        if link_path.symlink_metadata().is_ok() {
            return Err(link_error(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a filesystem entry already occupies the link path",
            )));
        }

        let link_dir = link_path.parent().ok_or_else(|| {
            link_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "link path has no parent directory",
            ))
        })?;
        let target = cache_path.relative_from(link_dir);

        create_symlink(&target, link_path).map_err(link_error)?;

        // 作成したリンクを読み戻し、キャッシュを指していることを確認する
        match Self::lookup(link_path).map_err(link_error)? {
            Some(link) if link.resolve() == cache_path.absolutize() => Ok(link),
            _ => Err(link_error(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "created link does not resolve to \"{}\"",
                    cache_path.display()
                ),
            ))),
        }
    }

    /// `link_path` がシンボリックリンクならその関係を返す
    pub fn lookup(link_path: &Path) -> io::Result<Option<WorkspaceLink>> {
        match link_path.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = std::fs::read_link(link_path)?;
                Ok(Some(WorkspaceLink {
                    link_path: link_path.to_path_buf(),
                    target,
                }))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(test)]
#[path = "link_test.rs"]
mod tests;
