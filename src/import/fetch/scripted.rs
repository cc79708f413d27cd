//! テスト用のスクリプト化トランスポート

use super::*;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// ストリームの1ステップ
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(Vec<u8>),
    Fail(std::io::ErrorKind),
}

#[derive(Default)]
struct Inner {
    responses: HashMap<String, Vec<Step>>,
    opened: Vec<String>,
}

/// URLごとに決められたチャンク列を返すトランスポート
///
/// 未登録のURLは 404 として扱う。
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// ステップ列を登録
    pub fn respond(self, url: &str, steps: Vec<Step>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert(url.to_string(), steps);
        self
    }

    /// 本文を `chunk` バイトずつに分けて登録
    pub fn with_body(self, url: &str, body: &[u8], chunk: usize) -> Self {
        let steps = body
            .chunks(chunk)
            .map(|c| Step::Chunk(c.to_vec()))
            .collect();
        self.respond(url, steps)
    }

    /// open された URL（順序どおり）
    pub fn opened(&self) -> Vec<String> {
        self.inner.lock().unwrap().opened.clone()
    }
}

struct ScriptedStream {
    steps: VecDeque<Step>,
}

impl ChunkStream for ScriptedStream {
    fn next_chunk(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>, FetchFailure>> {
        let step = self.steps.pop_front();
        Box::pin(async move {
            match step {
                None => Ok(None),
                Some(Step::Chunk(bytes)) => Ok(Some(bytes)),
                Some(Step::Fail(kind)) => Err(FetchFailure::Io(std::io::Error::from(kind))),
            }
        })
    }
}

impl RemoteTransport for ScriptedTransport {
    fn open<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Box<dyn ChunkStream>, FetchFailure>> {
        let steps = {
            let mut inner = self.inner.lock().unwrap();
            inner.opened.push(url.to_string());
            inner.responses.get(url).cloned()
        };
        Box::pin(async move {
            match steps {
                Some(steps) => Ok(Box::new(ScriptedStream {
                    steps: steps.into(),
                }) as Box<dyn ChunkStream>),
                None => Err(FetchFailure::Status { status: 404 }),
            }
        })
    }
}
