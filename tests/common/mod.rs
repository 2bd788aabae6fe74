//! Shared test infrastructure for integration tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::thread::JoinHandle;

/// Local stand-in for the generation endpoint that answers exactly one request.
pub struct MockEndpoint {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

/// What the binary sent to the mock endpoint.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub api_key: Option<String>,
    pub body: String,
}

impl MockEndpoint {
    /// Serve `body` with `status` to the first connection, then stop.
    pub fn serve_once(status: u16, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock endpoint");
        let addr = listener.local_addr().expect("mock endpoint address");
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept request");
            respond(stream, status, &body)
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Wait for the single request to be served and return it.
    pub fn finish(self) -> CapturedRequest {
        self.handle.join().expect("mock endpoint thread")
    }
}

fn respond(stream: TcpStream, status: u16, body: &str) -> CapturedRequest {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("read request line");

    let mut content_length = 0usize;
    let mut chunked = false;
    let mut api_key = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            if name == "content-length" {
                content_length = value.trim().parse().expect("numeric content-length");
            } else if name == "transfer-encoding" {
                chunked = value.to_ascii_lowercase().contains("chunked");
            } else if name == "x-goog-api-key" {
                api_key = Some(value.trim().to_string());
            }
        }
    }
    let request_body = if chunked {
        read_chunked(&mut reader)
    } else {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("read request body");
        body
    };

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = stream;
    stream
        .write_all(response.as_bytes())
        .expect("write response");
    stream.flush().expect("flush response");

    CapturedRequest {
        request_line: request_line.trim_end().to_string(),
        api_key,
        body: String::from_utf8_lossy(&request_body).into_owned(),
    }
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).expect("read chunk size");
        let size_hex = size_line.trim().split(';').next().unwrap_or("0");
        let size = usize::from_str_radix(size_hex, 16).expect("hex chunk size");
        let mut chunk = vec![0u8; size + 2];
        reader.read_exact(&mut chunk).expect("read chunk");
        if size == 0 {
            return body;
        }
        body.extend_from_slice(&chunk[..size]);
    }
}

/// Run the compiled binary against `root` with the given endpoint base.
pub fn run_devjoke(root: &Path, api_base: &str, extra_args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devjoke"))
        .arg("--root")
        .arg(root)
        .args(extra_args)
        .env("GEMINI_API_KEY", "integration-key")
        .env("GEMINI_API_BASE", api_base)
        .env("GEMINI_MODEL", "test-model")
        .env_remove("RUST_LOG")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy")
        .output()
        .expect("run devjoke")
}
