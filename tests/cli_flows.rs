//! End-to-end CLI flows against a local fixture server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Serve one canned response on a loopback port and return the endpoint URL.
fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
            // Drain the request before responding.
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

fn vsq_at(endpoint: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("vsq");
    cmd.arg("--endpoint").arg(endpoint);
    cmd
}

/// A loopback port with nothing listening on it.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[test]
fn search_prints_formatted_hits() {
    let endpoint = serve_once(
        "200 OK",
        r#"{"results":[{"id":"post-1","text":"all about rust","score":0.91}]}"#,
    );

    vsq_at(&endpoint)
        .args(["search", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("post-1"))
        .stdout(predicate::str::contains("**rust**"))
        .stdout(predicate::str::contains("score 0.910"));
}

#[test]
fn search_json_prints_raw_response() {
    let endpoint = serve_once(
        "200 OK",
        r#"{"results":[{"id":"post-1","text":"all about rust","score":0.91}]}"#,
    );

    vsq_at(&endpoint)
        .args(["search", "rust", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"post-1\""));
}

#[test]
fn search_rejects_empty_query_without_network() {
    vsq_at(&dead_endpoint())
        .args(["search", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query must not be empty"));
}

#[test]
fn search_rejects_unknown_metric() {
    vsq_at(&dead_endpoint())
        .args(["search", "rust", "--metric", "manhattan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown metric"));
}

#[test]
fn search_surfaces_backend_error_message() {
    let endpoint = serve_once("503 Service Unavailable", r#"{"detail":"index not ready"}"#);

    vsq_at(&endpoint)
        .args(["search", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("index not ready"));
}

#[test]
fn health_reports_ok() {
    let endpoint = serve_once("200 OK", r#"{"status":"ok"}"#);

    vsq_at(&endpoint)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn health_fails_when_nothing_listens() {
    vsq_at(&dead_endpoint())
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}

#[test]
fn tui_once_probes_the_posts_listing() {
    let endpoint = serve_once(
        "200 OK",
        r#"{"results":[{"id":"p1","text":"first","score":0.0},{"id":"p2","text":"second","score":0.0}]}"#,
    );

    vsq_at(&endpoint)
        .args(["tui", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 posts loaded"));
}

#[test]
fn tui_once_reports_initial_load_failure() {
    let endpoint = serve_once("503 Service Unavailable", r#"{"detail":"index not ready"}"#);

    vsq_at(&endpoint)
        .args(["tui", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("index not ready"));
}

#[test]
fn completions_and_man_render() {
    cargo_bin_cmd!("vsq")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vsq"));

    cargo_bin_cmd!("vsq")
        .arg("man")
        .assert()
        .success()
        .stdout(predicate::str::contains("vsq"));
}
