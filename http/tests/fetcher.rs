use beacon_core::{FetchError, StatusFetcher};
use beacon_http::HttpFetcher;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one canned HTTP response, returning the URL to hit.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    });

    format!("http://{addr}/p/chromium/g/chromium.gpu/console")
}

#[tokio::test]
async fn fetches_body() {
    let url = serve_once("200 OK", "<div class=\"console-builder-column\"></div>").await;
    let fetcher = HttpFetcher::new(url.clone(), Some(Duration::from_secs(5))).unwrap();

    assert_eq!(fetcher.target(), url);
    let body = fetcher.fetch().await.unwrap();
    assert!(body.contains("console-builder-column"));
}

#[tokio::test]
async fn error_status_is_a_fetch_error() {
    let url = serve_once("503 Service Unavailable", "down").await;
    let fetcher = HttpFetcher::new(url, None).unwrap();

    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
}

#[tokio::test]
async fn connection_refused_is_a_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(format!("http://{addr}/console"), None).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        std::future::pending::<()>().await;
    });

    let limit = Duration::from_millis(200);
    let fetcher = HttpFetcher::new(format!("http://{addr}/console"), Some(limit)).unwrap();
    let err = fetcher.fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout(d) if d == limit), "{err:?}");
}
