//! Path 拡張トレイト
//!
//! 標準ライブラリの `Path` にワークスペース内のパス計算用メソッドを追加する。

use std::path::{Component, Path, PathBuf};

/// Path の拡張トレイト
pub trait PathExt {
    /// 絶対パスに変換し、`.` と `..` を取り除く
    ///
    /// `canonicalize()` と異なりシンボリックリンクを解決せず、
    /// パスが存在しなくてもよい。
    fn absolutize(&self) -> PathBuf;

    /// `base` ディレクトリから `self` への相対パスを計算する
    ///
    /// どちらも絶対パスであること。
    ///
    /// ```text
    /// self=/w/.cache/imports/raw.csv, base=/w/imports -> ../.cache/imports/raw.csv
    /// self=/a/b.md,                   base=/a         -> b.md
    /// ```
    fn relative_from(&self, base: &Path) -> PathBuf;

    /// 末尾のファイル名に接尾辞を追加する（`a/b.csv` + `.state` -> `a/b.csv.state`）
    fn with_suffix(&self, suffix: &str) -> PathBuf;
}

impl PathExt for Path {
    fn absolutize(&self) -> PathBuf {
        let abs = if self.is_relative() {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(self),
                Err(_) => self.to_path_buf(),
            }
        } else {
            self.to_path_buf()
        };

        let mut components = Vec::new();
        for component in abs.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match components.last() {
                    Some(Component::Normal(_)) => {
                        components.pop();
                    }
                    // ルートより上には行かない
                    Some(Component::RootDir) => {}
                    _ => components.push(component),
                },
                _ => components.push(component),
            }
        }

        components.iter().collect()
    }

    fn relative_from(&self, base: &Path) -> PathBuf {
        let target: Vec<_> = self.components().collect();
        let base: Vec<_> = base.components().collect();

        let common_len = target
            .iter()
            .zip(base.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = PathBuf::new();
        for _ in common_len..base.len() {
            result.push("..");
        }
        for component in &target[common_len..] {
            result.push(component.as_os_str());
        }

        // 空のリンク先は作れない
        if result.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            result
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut raw = self.as_os_str().to_os_string();
        raw.push(suffix);
        PathBuf::from(raw)
    }
}

#[cfg(test)]
#[path = "path_ext_test.rs"]
mod tests;
