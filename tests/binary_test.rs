//! Tests that run the compiled binary in a scratch working directory

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

/// Working directory with a `tmp/` root and a `serve.toml` selecting `port`
fn workdir(port: u16, access_log: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("tmp")).unwrap();
    std::fs::write(dir.path().join("tmp").join("index.html"), "<h1>hi</h1>\n").unwrap();
    std::fs::write(
        dir.path().join("serve.toml"),
        format!("[server]\nport = {port}\n\n[logging]\naccess_log = {access_log}\n"),
    )
    .unwrap();
    dir
}

fn spawn(dir: &TempDir) -> Child {
    Command::new(env!("CARGO_BIN_EXE_static-serve"))
        .current_dir(dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start server")
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_bind_conflict_exits_non_zero() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let dir = workdir(port, false);

    let output = spawn(&dir).wait_with_output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("failed to bind 127.0.0.1:{port}")),
        "unexpected stderr: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_root_exits_non_zero() {
    let dir = workdir(free_port(), false);
    std::fs::remove_dir_all(dir.path().join("tmp")).unwrap();

    let output = spawn(&dir).wait_with_output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("root directory 'tmp'"));
}

#[test]
fn test_startup_line_then_serves() {
    let port = free_port();
    let dir = workdir(port, true);
    let mut child = KillOnDrop(spawn(&dir));

    let mut stdout = BufReader::new(child.0.stdout.take().unwrap());
    let mut line = String::new();
    stdout.read_line(&mut line).unwrap();
    assert_eq!(
        line.trim_end(),
        format!("serving at http://127.0.0.1:{port} (root: tmp)")
    );

    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("<h1>hi</h1>\n"));

    // Once the process is gone both pipes reach EOF
    child.0.kill().unwrap();
    child.0.wait().unwrap();

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(rest.is_empty(), "stdout after the startup line: {rest:?}");

    let mut stderr = String::new();
    child.0.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
    assert!(stderr.contains("\"GET / HTTP/1.1\" 200 12"), "{stderr}");
}
