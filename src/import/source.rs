//! インポート元の解決
//!
//! 入力文字列をURLかローカルファイルに一度だけ分類する。
//! 以降の取得方法はこの分類で決まり、再判定はしない。

use crate::error::ImportError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// http/https/ftp/ftps + ドメイン・localhost・IPv4、任意のポートとパス/クエリ
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\A(?:http|ftp)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)\z",
    ))
    .expect("valid URL regex")
});

/// 解決済みのインポート元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// 解決時点で存在した通常ファイル
    LocalFile(PathBuf),
    /// リモートURL
    RemoteResource(String),
}

impl ResolvedSource {
    /// ディレクトリ指定の出力で使うファイル名
    ///
    /// URLの場合はクエリとフラグメントを除いた最後の空でないパスセグメント。
    /// パスが無い URL ではホスト名になる。
    pub fn file_name(&self) -> Option<String> {
        match self {
            ResolvedSource::LocalFile(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            ResolvedSource::RemoteResource(url) => {
                let without_fragment = url.split('#').next().unwrap_or(url);
                let without_query = without_fragment
                    .split('?')
                    .next()
                    .unwrap_or(without_fragment);
                let after_scheme = without_query
                    .split_once("://")
                    .map(|(_, rest)| rest)
                    .unwrap_or(without_query);
                let mut segments = after_scheme.split('/').filter(|s| !s.is_empty());
                let authority = segments.next()?;
                match segments.last() {
                    Some(name) => Some(name.to_string()),
                    // パスが無ければホスト名（ユーザー情報とポートを除く）
                    None => authority
                        .rsplit('@')
                        .next()
                        .and_then(|host| host.split(':').next())
                        .filter(|host| !host.is_empty())
                        .map(str::to_string),
                }
            }
        }
    }

    /// 入力として表示する文字列
    pub fn display_ref(&self) -> String {
        match self {
            ResolvedSource::LocalFile(path) => path.display().to_string(),
            ResolvedSource::RemoteResource(url) => url.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ResolvedSource::RemoteResource(_))
    }
}

/// URL文法に全体一致するか（大文字小文字は区別しない）
pub fn is_url(reference: &str) -> bool {
    URL_RE.is_match(reference)
}

/// 入力文字列を分類・検証する
pub fn resolve(input_reference: &str) -> Result<ResolvedSource, ImportError> {
    if is_url(input_reference) {
        return Ok(ResolvedSource::RemoteResource(input_reference.to_string()));
    }

    let path = Path::new(input_reference);
    // シンボリックリンクは追従して実体を判定する
    let metadata = std::fs::metadata(path)
        .map_err(|_| ImportError::InvalidSource(input_reference.to_string()))?;

    if !metadata.is_file() {
        return Err(ImportError::NotAFile(input_reference.to_string()));
    }

    Ok(ResolvedSource::LocalFile(path.to_path_buf()))
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
