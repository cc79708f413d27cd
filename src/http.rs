//! HTTPトランスポート
//!
//! レスポンス本文を設定されたチャンクサイズ以下に切り分けて順に返す。

use crate::config::HttpConfig;
use crate::error::FetchFailure;
use crate::import::{BoxFuture, ChunkStream, RemoteTransport};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};

/// reqwest による RemoteTransport
pub struct HttpTransport {
    client: Client,
    chunk_size: usize,
    show_progress: bool,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: config.build_client(),
            chunk_size: config.chunk_size.max(1),
            show_progress: false,
        }
    }

    /// stderr にプログレスバーを表示する
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        match total {
            Some(total) if total > 0 => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            _ => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.green} Downloading... {bytes}")
                {
                    pb.set_style(style);
                }
                pb
            }
        }
    }
}

impl RemoteTransport for HttpTransport {
    fn open<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn ChunkStream>, FetchFailure>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;

            if !response.status().is_success() {
                return Err(FetchFailure::Status {
                    status: response.status().as_u16(),
                });
            }

            let progress = self.progress_bar(response.content_length());
            Ok(Box::new(ResponseStream {
                response,
                pending: Vec::new(),
                offset: 0,
                chunk_size: self.chunk_size,
                progress,
            }) as Box<dyn ChunkStream>)
        })
    }
}

/// レスポンス本文のチャンク列
struct ResponseStream {
    response: Response,
    /// 受信済みでまだ返していないバイト列
    pending: Vec<u8>,
    offset: usize,
    chunk_size: usize,
    progress: ProgressBar,
}

impl ResponseStream {
    fn take_pending(&mut self) -> Vec<u8> {
        let end = (self.offset + self.chunk_size).min(self.pending.len());
        let chunk = self.pending[self.offset..end].to_vec();
        self.offset = end;
        self.progress.inc(chunk.len() as u64);
        chunk
    }
}

impl ChunkStream for ResponseStream {
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>, FetchFailure>> {
        Box::pin(async move {
            if self.offset < self.pending.len() {
                return Ok(Some(self.take_pending()));
            }

            match self.response.chunk().await? {
                None => {
                    self.progress.finish_and_clear();
                    Ok(None)
                }
                // 空のチャンクはそのまま渡し、読み飛ばしは呼び出し側に任せる
                Some(bytes) if bytes.is_empty() => Ok(Some(Vec::new())),
                Some(bytes) => {
                    self.pending = bytes.to_vec();
                    self.offset = 0;
                    Ok(Some(self.take_pending()))
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
