//! Resource downloads into the raw directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// A failed download attempt. Absorbed by the pipeline as the resource's
/// `fetch_error` status; never aborts a batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Download a resource's bytes into `dest_dir`.
///
/// The local file is named from the URL's final path segment, falling
/// back to `index.html` when the URL has no trailing segment. Returns
/// the path written on success.
pub async fn fetch_resource(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    timeout: Duration,
) -> Result<PathBuf, FetchError> {
    let response = client.get(url).timeout(timeout).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    let bytes = response.bytes().await?;

    let path = dest_dir.join(file_name_for_url(url));
    tokio::fs::write(&path, &bytes).await?;
    debug!("Fetched {} ({} bytes) -> {}", url, bytes.len(), path.display());
    Ok(path)
}

/// Local file name for a URL: its final non-empty path segment, with
/// `index.html` as the fallback.
pub fn file_name_for_url(url: &str) -> String {
    let segment = Url::parse(url).ok().and_then(|u| {
        u.path_segments().and_then(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .last()
                .map(|s| s.to_string())
        })
    });
    match segment {
        Some(name) if !name.is_empty() => name,
        _ => "index.html".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn spawn_stub(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_writes_file_named_from_url() {
        let base = spawn_stub("200 OK", "pdf bytes here").await;
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        let url = format!("{}/papers/report.pdf", base);
        let path = fetch_resource(&client, &url, dir.path(), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "report.pdf");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pdf bytes here");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_status_error() {
        let base = spawn_stub("404 Not Found", "").await;
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        let result = fetch_resource(
            &client,
            &format!("{}/gone.pdf", base),
            dir.path(),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Status(s)) if s.as_u16() == 404));
        // Nothing written on failure.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_connection_failure_is_request_error() {
        // Bind then drop to get a port that refuses connections.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();
        let result = fetch_resource(
            &client,
            &format!("http://{}/x.pdf", addr),
            dir.path(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[test]
    fn test_file_name_for_url() {
        assert_eq!(
            file_name_for_url("https://example.com/docs/report.pdf"),
            "report.pdf"
        );
        assert_eq!(file_name_for_url("https://example.com/"), "index.html");
        assert_eq!(file_name_for_url("https://example.com"), "index.html");
        assert_eq!(
            file_name_for_url("https://example.com/a/b/"),
            "b"
        );
        assert_eq!(file_name_for_url("not a url"), "index.html");
    }
}
