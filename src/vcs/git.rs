//! git CLI によるワークスペース実装
//!
//! ユーザーの git 設定をそのまま使うため、ライブラリではなく git コマンドを呼ぶ。

use super::{Provenance, ProvenanceProvider, ReadinessProvider};
use crate::error::{NlxError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// git 管理下のワークスペース
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    root: PathBuf,
}

impl GitWorkspace {
    /// `dir` を含むリポジトリのトップレベルを探す
    pub fn discover(dir: &Path) -> Result<Self> {
        let output = run_git(dir, &["rev-parse", "--show-toplevel"])?;
        Ok(Self {
            root: PathBuf::from(output),
        })
    }

    /// ワークスペースルート
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args)
    }

    /// 追跡対象ファイルの未コミット変更一覧
    fn changed_files(&self) -> Result<Vec<String>> {
        let status = self.git(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(status
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.get(3..).unwrap_or(line).to_string())
            .collect())
    }
}

impl ReadinessProvider for GitWorkspace {
    fn is_ready(&self) -> bool {
        match self.changed_files() {
            Ok(changed) if changed.is_empty() => true,
            Ok(changed) => {
                tracing::error!("Commit all changed files before running an import");
                for file in &changed {
                    tracing::error!("    changed: {}", file);
                }
                false
            }
            Err(e) => {
                tracing::error!("Unable to check the git status: {}", e);
                false
            }
        }
    }
}

impl ProvenanceProvider for GitWorkspace {
    fn provenance(&self) -> Result<Provenance> {
        let commit = self.git(&["rev-parse", "HEAD"])?;
        let branch = self
            .git(&["rev-parse", "--abbrev-ref", "HEAD"])
            .ok()
            .filter(|b| b != "HEAD");
        Ok(Provenance { commit, branch })
    }
}

/// git を実行して標準出力（末尾の改行を除く）を返す
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| NlxError::Vcs(format!("Failed to run git {}: {}", args.join(" "), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NlxError::Vcs(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

#[cfg(test)]
#[path = "git_test.rs"]
mod tests;
