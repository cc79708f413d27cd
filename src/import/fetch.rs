//! キャッシュへのコンテンツ取得
//!
//! ローカルファイルはコピー、URLは一定サイズのチャンクで順にストリーミングする。
//! 失敗時に書きかけのキャッシュファイルは削除しない。

use super::source::ResolvedSource;
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::{FetchFailure, ImportError};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// リモートから順に届くバイト列
pub trait ChunkStream: Send {
    /// 次のチャンクを返す。終端なら `None`
    ///
    /// 空のチャンク（キープアライブ）を返すことがある。
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>, FetchFailure>>;
}

/// URL を GET してチャンク列を開くトランスポート
pub trait RemoteTransport: Send + Sync {
    fn open<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn ChunkStream>, FetchFailure>>;
}

/// 取得結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// 書き込んだバイト数
    pub bytes: u64,
    /// 内容の SHA-256（16進）
    pub sha256: String,
}

impl FetchSummary {
    /// ステートファイルに記録する形式（`sha256:<hex>`）
    pub fn checksum(&self) -> String {
        format!("sha256:{}", self.sha256)
    }
}

/// キャッシュファイルへの書き込みとハッシュ計算をまとめて行う
struct CacheWriter {
    file: File,
    hasher: Sha256,
    bytes: u64,
}

impl CacheWriter {
    /// 既存ファイルは上書きしない
    async fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        Ok(Self {
            file,
            hasher: Sha256::new(),
            bytes: 0,
        })
    }

    async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await?;
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    async fn finish(mut self) -> std::io::Result<FetchSummary> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(FetchSummary {
            bytes: self.bytes,
            sha256: hex::encode(self.hasher.finalize()),
        })
    }
}

/// インポート元の種類ごとに取得方法を切り替える
pub struct ContentFetcher {
    transport: Box<dyn RemoteTransport>,
    chunk_size: usize,
}

impl ContentFetcher {
    pub fn new(transport: Box<dyn RemoteTransport>) -> Self {
        Self {
            transport,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// ローカルコピー時の読み込みサイズを変更する
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// `source` の内容を `cache` に書き出す
    pub async fn fetch(
        &self,
        source: &ResolvedSource,
        cache: &Path,
    ) -> Result<FetchSummary, ImportError> {
        let result = match source {
            ResolvedSource::LocalFile(path) => self.copy_local(path, cache).await,
            ResolvedSource::RemoteResource(url) => self.download(url, cache).await,
        };

        result.map_err(|reason| ImportError::Fetch {
            source_ref: source.display_ref(),
            cache: cache.to_path_buf(),
            reason,
        })
    }

    async fn copy_local(&self, path: &Path, cache: &Path) -> Result<FetchSummary, FetchFailure> {
        let mut input = File::open(path).await?;
        let mut writer = CacheWriter::create(cache).await?;
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = input.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            writer.write(&buffer[..read]).await?;
        }

        Ok(writer.finish().await?)
    }

    async fn download(&self, url: &str, cache: &Path) -> Result<FetchSummary, FetchFailure> {
        let mut stream = self.transport.open(url).await?;
        let mut writer = CacheWriter::create(cache).await?;

        while let Some(chunk) = stream.next_chunk().await? {
            // キープアライブの空チャンクは読み飛ばして続行
            if chunk.is_empty() {
                continue;
            }
            writer.write(&chunk).await?;
        }

        Ok(writer.finish().await?)
    }
}

#[cfg(test)]
pub(crate) mod scripted;

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
