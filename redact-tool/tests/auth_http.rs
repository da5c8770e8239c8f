use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use redact_tool::{AuthClient, InMemoryTokenStore, TokenStore};

/// Accepts one connection, consumes the request, answers with `body` at
/// `status`, and closes.
fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        consume_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        let _ = stream.flush();
    });
    format!("http://{addr}")
}

/// Reads until the header block and any declared body have arrived, so the
/// response is not written while the client is still sending.
fn consume_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(headers_end) = find(&buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..headers_end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= headers_end + 4 + content_length {
                return;
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn rejected_login_surfaces_detail_and_stores_no_token() {
    let base = serve_once("401 Unauthorized", r#"{"detail":"bad credentials"}"#);
    let client = AuthClient::new(base);
    let store = InMemoryTokenStore::new();

    // Same sequence the sign-in screen runs: persist only on success.
    match client.login("alice", "hunter2") {
        Ok(_) => panic!("login must be rejected"),
        Err(e) => assert!(e.to_string().contains("bad credentials"), "{e}"),
    }

    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn successful_login_persists_the_token() {
    let base = serve_once("200 OK", r#"{"token":"tok-1"}"#);
    let client = AuthClient::new(base);
    let store = InMemoryTokenStore::new();

    let token = client.login("alice", "hunter2").unwrap();
    store.store(&token).unwrap();

    assert_eq!(store.load().unwrap().as_deref(), Some("tok-1"));
}

#[test]
fn guest_sign_in_needs_no_credentials() {
    let base = serve_once("200 OK", r#"{"token":"guest-7"}"#);
    let client = AuthClient::new(base);

    assert_eq!(client.guest().unwrap(), "guest-7");
}

#[test]
fn identity_exchange_returns_a_service_token() {
    let base = serve_once("200 OK", r#"{"token":"svc-3"}"#);
    let client = AuthClient::new(base);

    assert_eq!(client.google("google-id-token").unwrap(), "svc-3");
}
