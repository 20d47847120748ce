//! Minimal HTTP/1.1 server that answers fixed Graph API routes for integration tests.
//!
//! Routes are keyed by request path (query string included). Bodies may contain
//! `{base}`, replaced with the server's base URL so `@odata.nextLink` values and
//! redirects point back at the server. Requests without an `Authorization:
//! Bearer` header get 401.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Sent as `Location` (after `{base}` substitution).
    pub location: Option<String>,
}

impl Route {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            location: None,
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            location: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            location: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            location: Some(location.to_string()),
        }
    }
}

pub struct GraphServer {
    /// Base URL including the API version, e.g. `http://127.0.0.1:1234/v1.0`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl GraphServer {
    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Route keys are paths below the base
/// URL (e.g. `/me`). The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> GraphServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}/v1.0", port);
    let routes: HashMap<String, Route> = routes
        .into_iter()
        .map(|(path, route)| (format!("/v1.0{}", path), route))
        .collect();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let base = base_url.clone();
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            let base = base.clone();
            thread::spawn(move || handle(stream, &routes, &seen, &base));
        }
    });
    GraphServer { base_url, requests }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    seen: &Mutex<Vec<String>>,
    base: &str,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path, authorized) = parse_request(request);
    if let Ok(mut seen) = seen.lock() {
        seen.push(path.trim_start_matches("/v1.0").to_string());
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    if !authorized {
        let _ = stream.write_all(b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    let route = routes.get(path).cloned().unwrap_or_else(|| Route::status(404));
    let body = String::from_utf8(route.body.clone())
        .map(|s| s.replace("{base}", base).into_bytes())
        .unwrap_or(route.body);
    let location = route
        .location
        .map(|l| format!("Location: {}\r\n", l.replace("{base}", base)))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        route.status,
        reason(route.status),
        body.len(),
        location
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Status",
    }
}

/// Returns (method, path, has bearer authorization).
fn parse_request(request: &str) -> (&str, &str, bool) {
    let mut lines = request.lines();
    let mut parts = lines.next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let authorized = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("authorization") && value.trim().starts_with("Bearer ")
        })
    });
    (method, path, authorized)
}
