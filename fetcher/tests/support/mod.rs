//! Test support utilities for fetcher integration and behavioural tests.
//!
//! Provides a minimal loop-back HTTP/1.1 server that serves fixed bodies by
//! path (404 for anything else) and a scratch launcher installation layout.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

/// A running stub server. It lives until the test process exits.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request paths received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log lock").clone()
    }
}

/// Start a server answering `GET <path>` with the matching body.
pub fn serve(routes: Vec<(&str, Vec<u8>)>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, body)| (path.to_owned(), body))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    StubServer {
        base_url: format!("http://127.0.0.1:{port}"),
        requests,
    }
}

/// A URL on a port nobody is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/client.txt")
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Vec<u8>>, log: &Mutex<Vec<String>>) {
    if stream.set_read_timeout(Some(Duration::from_secs(2))).is_err() {
        return;
    }
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };
    log.lock().expect("request log lock").push(path.clone());

    let (status, body): (&str, &[u8]) = match routes.get(&path) {
        Some(body) => ("200 OK", body),
        None => ("404 Not Found", b""),
    };
    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let sent = stream
        .write_all(head.as_bytes())
        .and_then(|()| stream.write_all(body))
        .and_then(|()| stream.flush());
    if sent.is_err() {
        // The client hung up; nothing to report.
    }
}

/// Read until the end of the request head and return the request path.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(buf.get(..n)?);
    }
    let text = String::from_utf8(request).ok()?;
    let mut parts = text.lines().next()?.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_owned)
}

/// A scratch launcher installation and output root.
pub struct Install {
    _temp: TempDir,
    /// `<root>/game/versions`.
    pub versions_dir: PathBuf,
    /// `<root>/mappings`.
    pub output_root: PathBuf,
}

/// Create an empty [`Install`].
pub fn install() -> Install {
    let temp = tempfile::tempdir().expect("temp dir");
    let versions_dir = temp.path().join("game").join("versions");
    std::fs::create_dir_all(&versions_dir).expect("create versions dir");
    let output_root = temp.path().join("mappings");
    Install {
        _temp: temp,
        versions_dir,
        output_root,
    }
}
