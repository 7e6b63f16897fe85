use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use flarelog::{
    sinks::{self, MemorySink},
    Config, HttpNotifier, LoggerFactory, NotificationError, NotificationTarget, Notifier,
};
use http::{StatusCode, Uri};
use serde_json::{json, Value};

/// Accepts a single request, answers with `status_line` and hands back the raw request.
fn serve_once(status_line: &'static str) -> (Uri, JoinHandle<String>) {
    serve_once_with_body(status_line, "")
}

fn serve_once_with_body(status_line: &'static str, payload: &'static str) -> (Uri, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            payload.len(),
            payload
        );
        stream.write_all(response.as_bytes()).unwrap();
        request
    });

    let uri = format!("http://{}/api/services/light/turn_on", addr)
        .parse()
        .unwrap();
    (uri, handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if data.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8(data).unwrap()
}

fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    let head = request.split("\r\n\r\n").next()?;
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

fn body(request: &str) -> Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn target(uri: Uri) -> NotificationTarget {
    NotificationTarget::new("light.office", uri, "secret")
}

#[test]
fn posts_alert_payload_with_bearer_token() {
    let (uri, server) = serve_once("200 OK");

    HttpNotifier::new(target(uri)).notify().unwrap();

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /api/services/light/turn_on HTTP/1.1\r\n"));
    assert_eq!(header(&request, "authorization"), Some("Bearer secret"));
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    assert_eq!(
        body(&request),
        json!({ "entity_id": "light.office", "rgb_color": [255, 0, 0], "brightness": 255 })
    );
}

#[test]
fn non_success_status_is_an_error() {
    let (uri, server) = serve_once("500 Internal Server Error");

    let err = HttpNotifier::new(target(uri)).notify().unwrap_err();

    assert!(matches!(
        err,
        NotificationError::Status(StatusCode::INTERNAL_SERVER_ERROR)
    ));
    server.join().unwrap();
}

#[test]
fn response_body_is_read_to_the_end() {
    let (uri, server) = serve_once_with_body(
        "200 OK",
        r#"[{"entity_id":"light.office","state":"on"}]"#,
    );

    HttpNotifier::new(target(uri)).notify().unwrap();
    server.join().unwrap();
}

#[test]
fn truncated_response_body_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\nconnection: close\r\n\r\nshort")
            .unwrap();
    });
    let uri = format!("http://{}/api/services/light/turn_on", addr).parse().unwrap();

    let err = HttpNotifier::new(target(uri)).notify().unwrap_err();
    assert!(matches!(err, NotificationError::Body(_)), "got {err:?}");
    server.join().unwrap();
}

#[test]
fn https_endpoint_without_trust_roots_is_a_tls_error() {
    let uri = Uri::from_static("https://127.0.0.1:1/api/services/light/turn_on");
    let notifier = HttpNotifier::with_builder(
        target(uri),
        flarelog::http::Builder::new().without_native_roots(),
    );

    let err = notifier.notify().unwrap_err();
    assert!(matches!(err, NotificationError::Tls(_)), "got {err:?}");
}

#[test]
fn unreachable_endpoint_is_an_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri: Uri = format!("http://127.0.0.1:{}/", port).parse().unwrap();

    let err = HttpNotifier::new(target(uri)).notify().unwrap_err();
    assert!(matches!(err, NotificationError::Transport(_)));
}

#[tokio::test]
async fn works_from_inside_a_runtime() {
    let (uri, server) = serve_once("201 Created");

    HttpNotifier::new(target(uri)).notify().unwrap();
    server.join().unwrap();
}

#[test]
fn error_line_notifies_the_configured_light() {
    let (uri, server) = serve_once("200 OK");
    let config = Config {
        use_ansi: false,
        ..Config::new()
    }
    .with_notification(target(uri));

    let logger = LoggerFactory::new(config).get_logger("service");
    let capture = Arc::new(MemorySink::new());
    logger.remove_output(&sinks::stdout());
    logger.add_output(capture.clone());

    flarelog::error!(logger, "lost connection to {db}", "postgres").unwrap();

    let request = server.join().unwrap();
    assert_eq!(body(&request)["entity_id"], "light.office");

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[ERROR] "));
    assert!(lines[0].ends_with("] lost connection to postgres"));
}

#[test]
fn unreachable_light_does_not_stop_the_error_line() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri: Uri = format!("http://127.0.0.1:{}/", port).parse().unwrap();
    let config = Config {
        use_ansi: false,
        ..Config::new()
    }
    .with_notification(target(uri));

    let logger = LoggerFactory::new(config).get_logger("service");
    let capture = Arc::new(MemorySink::new());
    logger.remove_output(&sinks::stdout());
    logger.add_output(capture.clone());

    logger.error("still logged").unwrap();

    assert_eq!(capture.lines().len(), 1);
}
