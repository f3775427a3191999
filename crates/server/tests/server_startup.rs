//! Spawns the real binary and checks it comes up healthy.

use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16) -> String {
    format!(
        r#"
[remote_store]
access_token = "test-token"

[server]
host = "127.0.0.1"
port = {}
"#,
        port
    )
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_drobed"))
        .env("DROBE_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait until the health endpoint answers, or give up.
async fn wait_for_health(client: &Client, port: u16) -> bool {
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);
    let deadline = Duration::from_secs(15);

    timeout(deadline, async {
        loop {
            if let Ok(response) = client.get(&url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            sleep(Duration::from_millis(100)).await;
        }
    })
    .await
    .is_ok()
}

#[tokio::test]
async fn test_server_starts_and_reports_healthy() {
    let port = get_available_port();

    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, "{}", minimal_config(port)).unwrap();

    let mut child = spawn_server(config_file.path()).await;
    let client = Client::new();

    assert!(
        wait_for_health(&client, port).await,
        "server never became healthy"
    );

    // Watcher is disabled in the minimal config.
    let status: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/watcher/status", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["running"], false);

    let _ = child.kill().await;
}

#[tokio::test]
async fn test_server_exits_on_invalid_config() {
    // max_inputs = 0 fails validation, so the process must terminate on
    // its own instead of serving.
    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[remote_store]
access_token = "test-token"

[composite]
max_inputs = 0
"#
    )
    .unwrap();

    let mut child = spawn_server(config_file.path()).await;

    let status = timeout(Duration::from_secs(15), child.wait())
        .await
        .expect("server should exit quickly on invalid config")
        .unwrap();

    assert!(!status.success());
}
