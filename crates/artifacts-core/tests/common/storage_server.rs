//! Minimal HTTP/1.1 server emulating the storage API for integration tests.
//!
//! Serves everything under `/artifactory`: `GET api/storage/{path}` returns
//! file info with checksums (404 when absent), `PUT {path}` stores the body
//! after checking `X-Checksum-Sha1` (201), `DELETE {path}` removes it (204 or
//! 404). Each connection handles one request and is closed.
//!
//! `/moved/{rest}` answers 301 to `/artifactory/{rest}`, and `/loop/{rest}`
//! redirects to itself forever.

use artifacts_core::checksum::sha1_bytes;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const USERNAME: &str = "deployer";
pub const PASSWORD: &str = "s3cret";
/// `Authorization` value for USERNAME:PASSWORD.
const BASIC_AUTH: &str = "Basic ZGVwbG95ZXI6czNjcmV0";

const PREFIX: &str = "/artifactory/";
const STORAGE_API: &str = "api/storage/";
const MOVED_PREFIX: &str = "/moved/";
const LOOP_PREFIX: &str = "/loop/";

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerOptions {
    /// If true, requests without the expected basic auth get 401.
    pub require_auth: bool,
    /// If set, every storage info request is answered with this status and body.
    pub storage_info_override: Option<(u16, &'static str)>,
}

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
}

#[derive(Default)]
struct State {
    objects: HashMap<String, Vec<u8>>,
    requests: Vec<Recorded>,
}

pub struct StorageServer {
    origin: String,
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl StorageServer {
    pub fn start() -> Self {
        Self::start_with_options(ServerOptions::default())
    }

    pub fn start_with_options(opts: ServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state, opts));
            }
        });
        let origin = format!("http://127.0.0.1:{}", port);
        Self {
            base_url: format!("{}/artifactory", origin),
            origin,
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL whose every request is redirected to `base_url`.
    pub fn moved_url(&self) -> String {
        format!("{}/moved", self.origin)
    }

    /// Base URL that redirects to itself without end.
    pub fn loop_url(&self) -> String {
        format!("{}/loop", self.origin)
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    pub fn insert(&self, path: &str, data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(path.to_string(), data.to_vec());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// "METHOD path" for every request received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

struct Request {
    method: String,
    target: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn handle(mut stream: TcpStream, state: &Mutex<State>, opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let path = req.target.strip_prefix(PREFIX).unwrap_or(&req.target).to_string();
    state.lock().unwrap().requests.push(Recorded {
        method: req.method.clone(),
        path: path.clone(),
        headers: req.headers.clone(),
    });

    if let Some(rest) = req.target.strip_prefix(MOVED_PREFIX) {
        let location = format!("Location: {}{}\r\n", PREFIX, rest);
        respond(&mut stream, "301 Moved Permanently", &location, b"");
        return;
    }
    if req.target.starts_with(LOOP_PREFIX) {
        let location = format!("Location: {}\r\n", req.target);
        respond(&mut stream, "302 Found", &location, b"");
        return;
    }
    if opts.require_auth
        && req.headers.get("authorization").map(String::as_str) != Some(BASIC_AUTH)
    {
        respond(&mut stream, "401 Unauthorized", "", b"");
        return;
    }
    if !req.target.starts_with(PREFIX) {
        respond(&mut stream, "404 Not Found", "", b"");
        return;
    }

    match req.method.as_str() {
        "GET" => match path.strip_prefix(STORAGE_API) {
            Some(object_path) => storage_info(&mut stream, state, object_path, opts),
            None => match state.lock().unwrap().objects.get(&path).cloned() {
                Some(data) => respond(&mut stream, "200 OK", "", &data),
                None => respond(&mut stream, "404 Not Found", "", b""),
            },
        },
        "PUT" => {
            let digest = sha1_bytes(&req.body);
            match req.headers.get("x-checksum-sha1") {
                Some(declared) if !declared.eq_ignore_ascii_case(&digest) => {
                    respond(&mut stream, "409 Conflict", "", b"checksum mismatch");
                }
                _ => {
                    state.lock().unwrap().objects.insert(path.clone(), req.body);
                    let body = format!(
                        r#"{{"path": "/{}", "checksums": {{"sha1": "{}"}}}}"#,
                        path, digest
                    );
                    respond(
                        &mut stream,
                        "201 Created",
                        "Content-Type: application/json\r\n",
                        body.as_bytes(),
                    );
                }
            }
        }
        "DELETE" => {
            let removed = state.lock().unwrap().objects.remove(&path);
            match removed {
                Some(_) => respond(&mut stream, "204 No Content", "", b""),
                None => respond(&mut stream, "404 Not Found", "", b""),
            }
        }
        _ => respond(&mut stream, "405 Method Not Allowed", "", b""),
    }
}

fn storage_info(stream: &mut TcpStream, state: &Mutex<State>, path: &str, opts: ServerOptions) {
    if let Some((code, body)) = opts.storage_info_override {
        let status = format!("{} Override", code);
        respond(stream, &status, "", body.as_bytes());
        return;
    }
    let data = state.lock().unwrap().objects.get(path).cloned();
    match data {
        Some(data) => {
            let repo = path.split('/').next().unwrap_or("");
            let rest = path.split_once('/').map(|(_, r)| r).unwrap_or("");
            let body = format!(
                r#"{{
                    "repo": "{repo}",
                    "path": "/{rest}",
                    "size": "{size}",
                    "checksums": {{ "sha1": "{sha1}", "md5": "" }},
                    "originalChecksums": {{ "sha1": "{sha1}" }},
                    "uri": "http://localhost/artifactory/api/storage/{path}"
                }}"#,
                repo = repo,
                rest = rest,
                size = data.len(),
                sha1 = sha1_bytes(&data),
                path = path,
            );
            respond(
                stream,
                "200 OK",
                "Content-Type: application/json\r\n",
                body.as_bytes(),
            );
        }
        None => respond(
            stream,
            "404 Not Found",
            "Content-Type: application/json\r\n",
            br#"{"errors": [{"status": 404, "message": "Unable to find item"}]}"#,
        ),
    }
}

fn respond(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
        status,
        body.len(),
        extra_headers
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// Reads the request head, then `Content-Length` bytes of body.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = std::str::from_utf8(&data[..head_end]).ok()?;
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let len: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = data[head_end + 4..].to_vec();
    while body.len() < len {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body.truncate(len);

    Some(Request {
        method,
        target,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
