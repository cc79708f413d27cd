use super::*;
use crate::import::{ContentFetcher, ResolvedSource};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 1回だけ `response` を返すHTTPサーバーを起動し、受け取ったリクエストを記録する
async fn serve_once(response: Vec<u8>) -> (String, Arc<Mutex<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let request = Arc::new(Mutex::new(String::new()));
    let captured = Arc::clone(&request);

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&tmp[..n]);
        }
        *captured.lock().unwrap() = String::from_utf8_lossy(&buf).into_owned();
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{}/files/data.csv", addr), request)
}

fn ok_response(body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

fn transport(chunk_size: usize) -> HttpTransport {
    HttpTransport::new(&HttpConfig {
        user_agent: "nlx-test".to_string(),
        chunk_size,
        timeout_secs: Some(10),
    })
}

async fn drain(stream: &mut Box<dyn ChunkStream>) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    while let Some(chunk) = stream.next_chunk().await.unwrap() {
        chunks.push(chunk);
    }
    chunks
}

#[tokio::test]
async fn test_body_is_split_into_bounded_chunks() {
    let (url, _) = serve_once(ok_response(b"0123456789")).await;

    let mut stream = transport(4).open(&url).await.unwrap();
    let chunks = drain(&mut stream).await;

    assert!(chunks.iter().all(|c| c.len() <= 4));
    assert_eq!(chunks.concat(), b"0123456789");
}

#[tokio::test]
async fn test_request_carries_user_agent() {
    let (url, request) = serve_once(ok_response(b"x")).await;

    let mut stream = transport(1024).open(&url).await.unwrap();
    drain(&mut stream).await;

    let request = request.lock().unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /files/data.csv"));
    assert!(request.contains("user-agent: nlx-test"));
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let (url, _) =
        serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec())
            .await;

    let result = transport(1024).open(&url).await;

    assert!(matches!(result, Err(FetchFailure::Status { status: 404 })));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // 使用後すぐに閉じたポートには接続できない
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = transport(1024).open(&format!("http://{}/x", addr)).await;

    assert!(matches!(result, Err(FetchFailure::Transport(_))));
}

#[tokio::test]
async fn test_fetcher_downloads_into_cache() {
    let body: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
    let (url, _) = serve_once(ok_response(&body)).await;
    let temp = TempDir::new().unwrap();
    let cache = temp.path().join("data.csv");

    let summary = ContentFetcher::new(Box::new(transport(512)))
        .fetch(&ResolvedSource::RemoteResource(url), &cache)
        .await
        .unwrap();

    assert_eq!(summary.bytes, 5000);
    assert_eq!(std::fs::read(&cache).unwrap(), body);
}
