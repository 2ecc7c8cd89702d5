//! Shared helpers for integration tests

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use pagetask::config::Config;
use pagetask::runner::{Context, Verbosity};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;

/// A tempdir-backed workspace with tasks/ and logs/ roots
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn config(&self) -> Config {
        Config {
            tasks_root: self.temp_dir.path().join("tasks"),
            logs_root: self.temp_dir.path().join("logs"),
            ..Config::default()
        }
    }

    pub fn context(&self) -> Context {
        Context::new(self.config()).with_verbosity(Verbosity::Silent)
    }

    /// Write a pagetask.yml inside the workspace and return its path
    pub fn write_config_file(&self) -> std::path::PathBuf {
        let path = self.temp_dir.path().join("pagetask.yml");
        std::fs::write(&path, "tasks_root: tasks\nlogs_root: logs\n").unwrap();
        path
    }
}

/// Spawn a one-shot HTTP server returning `body` as text/html, for offline
/// fetch tests. Returns the URL to request.
pub fn serve_html_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}/", addr)
}

/// Same as [`serve_html_once`] but answers a fixed number of requests
pub fn serve_html(body: &'static str, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for _ in 0..requests {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        }
    });
    format!("http://{}/", addr)
}
