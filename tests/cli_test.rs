//! End-to-end tests of the `mcp-proxy` binary
//!
//! The binary runs with its stdio piped to the test, and `cat` or a small
//! shell script serves as the backend.
#![cfg(unix)]

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(10);

const REQUEST: &str = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;

fn proxy(dir: &tempfile::TempDir, server_command: &str, server_args: &[&str]) -> Child {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mcp-proxy"));
    command
        .arg("--server-command")
        .arg(server_command)
        .arg("--log-level")
        .arg("debug")
        .arg("--")
        .args(server_args)
        // Keep stray configuration out of the way
        .current_dir(dir.path())
        .env_remove("MCP_PROXY_SERVER_COMMAND")
        .env_remove("MCP_PROXY_SERVER_ARGS")
        .env_remove("MCP_PROXY_LOG_LEVEL")
        .env_remove("MCP_PROXY_INSPECT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    command.spawn().unwrap()
}

#[tokio::test]
async fn test_reply_delivered_after_client_closes_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = proxy(&dir, "cat", &[]);

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(format!("{}\n", REQUEST).as_bytes()).await.unwrap();
    // End-of-input right behind the request
    drop(stdin);

    let mut stdout = child.stdout.take().unwrap();
    let mut output = String::new();
    timeout(WAIT, stdout.read_to_string(&mut output)).await.unwrap().unwrap();
    assert_eq!(output, format!("{}\n", REQUEST));

    let status = timeout(WAIT, child.wait()).await.unwrap().unwrap();
    assert!(status.success());
}

#[tokio::test]
async fn test_exits_when_backend_exits() {
    let dir = tempfile::tempdir().unwrap();
    // Answers one line, then exits while the client still has stdin open
    let mut child = proxy(&dir, "sh", &["-c", r#"read line; printf '%s\n' "$line""#]);

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(format!("{}\n", REQUEST).as_bytes()).await.unwrap();

    let mut stdout = child.stdout.take().unwrap();
    let mut output = String::new();
    timeout(WAIT, stdout.read_to_string(&mut output)).await.unwrap().unwrap();
    assert_eq!(output, format!("{}\n", REQUEST));

    let status = timeout(WAIT, child.wait()).await.unwrap().unwrap();
    assert!(status.success());
    drop(stdin);
}

#[tokio::test]
async fn test_keeps_running_until_interrupted() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = proxy(&dir, "cat", &[]);

    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    for id in 1..=2 {
        let request = format!(r#"{{"jsonrpc":"2.0","id":{},"method":"ping"}}"#, id);
        stdin.write_all(format!("{}\n", request).as_bytes()).await.unwrap();

        let mut line = String::new();
        timeout(WAIT, stdout.read_line(&mut line)).await.unwrap().unwrap();
        assert_eq!(line.trim_end(), request);
    }

    // Neither side has closed, so the proxy must still be up
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(child.try_wait().unwrap().is_none());

    let pid = child.id().unwrap().to_string();
    let kill = Command::new("kill").args(["-INT", &pid]).status().await.unwrap();
    assert!(kill.success());

    let status = timeout(WAIT, child.wait()).await.unwrap().unwrap();
    assert!(status.success());
    drop(stdin);
}
