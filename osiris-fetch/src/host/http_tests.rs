//! Redirect-chain tests for [`HttpTransport`] against local servers.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::http::HttpTransport;
use crate::cookies::Cookie;
use crate::error::FetchError;
use crate::transport::{HttpRequest, Transport};

// ============================================================================
// Local server
// ============================================================================

/// Serves one canned response per connection and records each request,
/// lowercased.
struct Server {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Server {
    async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                seen.lock().unwrap().push(request.to_lowercase());
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn redirect(status: &str, location: &str, set_cookie: Option<&str>) -> String {
    let cookie = set_cookie
        .map(|c| format!("Set-Cookie: {c}\r\n"))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {status}\r\nLocation: {location}\r\n{cookie}Content-Length: 0\r\nConnection: close\r\n\r\n"
    )
}

fn ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn transport() -> HttpTransport {
    HttpTransport::new().unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_cookies_gathered_and_sent_to_same_host() {
    let server = Server::start(vec![
        redirect("302 Found", "/step2", Some("main=m1; Path=/")),
        redirect("302 Found", "/done", Some("HTTPSERVERID=s1; Path=/")),
        ok("landed"),
    ])
    .await;

    let request = HttpRequest::post(server.url("/start"))
        .header("Authorization", "Bearer SECRET")
        .form_field("a", "b")
        .cookies(vec![Cookie::new("caller", "c0", "127.0.0.1")]);
    let response = transport().send(request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "landed");
    assert!(response.final_url.ends_with("/done"));
    let names: Vec<_> = response.set_cookies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["main", "HTTPSERVERID"]);

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].starts_with("post /start"));
    assert!(requests[0].contains("caller=c0"));
    assert!(requests[0].ends_with("a=b"));

    // 302 turns the POST into a body-less GET
    assert!(requests[1].starts_with("get /step2"));
    assert!(!requests[1].contains("a=b"));
    assert!(requests[1].contains("main=m1"));
    assert!(requests[1].contains("caller=c0"));
    assert!(requests[1].contains("authorization: bearer secret"));

    assert!(requests[2].contains("httpserverid=s1"));
    assert!(requests[2].contains("main=m1"));
}

#[tokio::test]
async fn test_temporary_redirect_repeats_post() {
    let server = Server::start(vec![redirect("307 Temporary Redirect", "/again", None), ok("")]).await;

    let request = HttpRequest::post(server.url("/start")).form_field("a", "b");
    transport().send(request).await.unwrap();

    let requests = server.requests();
    assert!(requests[1].starts_with("post /again"));
    assert!(requests[1].ends_with("a=b"));
}

#[tokio::test]
async fn test_cross_host_redirect_drops_credentials() {
    let landing = Server::start(vec![ok("landed")]).await;
    let target = format!("http://localhost:{}/land", landing.addr.port());
    let origin = Server::start(vec![redirect("302 Found", &target, Some("sid=a1; Path=/"))]).await;

    let request = HttpRequest::get(origin.url("/start"))
        .header("Authorization", "Bearer SECRET")
        .header("Taal", "EN")
        .cookies(vec![Cookie::new("caller", "c0", "127.0.0.1")]);
    let response = transport().send(request).await.unwrap();

    assert_eq!(response.body, "landed");
    assert!(response.final_url.starts_with("http://localhost:"));

    assert!(origin.requests()[0].contains("authorization: bearer secret"));
    let landed = &landing.requests()[0];
    assert!(landed.starts_with("get /land"));
    assert!(!landed.contains("authorization"));
    assert!(!landed.contains("secret"));
    assert!(!landed.contains("sid=a1"));
    assert!(!landed.contains("caller=c0"));
    assert!(landed.contains("taal: en"));
}

#[tokio::test]
async fn test_fragment_survives_later_redirect() {
    let server = Server::start(vec![
        redirect("302 Found", "/#access_token=TOK&token_type=bearer", None),
        redirect("301 Moved Permanently", "/app/", None),
        ok("app"),
    ])
    .await;

    let request = HttpRequest::post(server.url("/oauth2/authorize")).form_field("RelayState", "r");
    let response = transport().send(request).await.unwrap();

    assert!(response.final_url.contains("/app/#access_token=TOK&token_type=bearer"));
    assert!(server.requests()[2].starts_with("get /app/ "));
}

#[tokio::test]
async fn test_redirect_loop_is_cut_off() {
    let server = Server::start((0..11).map(|_| redirect("302 Found", "/loop", None)).collect()).await;

    let result = transport().send(HttpRequest::get(server.url("/loop"))).await;

    assert!(matches!(result, Err(FetchError::TooManyRedirects(10))));
    assert_eq!(server.requests().len(), 11);
}

#[tokio::test]
async fn test_redirect_outside_allowlist_is_refused() {
    let server = Server::start(vec![redirect("302 Found", "http://localhost:1/land", None)]).await;

    let transport = transport().with_allowed_domains(vec!["127.0.0.1".to_string()]);
    let result = transport.send(HttpRequest::get(server.url("/start"))).await;

    assert!(matches!(result, Err(FetchError::DomainNotAllowed(host)) if host == "localhost"));
}
