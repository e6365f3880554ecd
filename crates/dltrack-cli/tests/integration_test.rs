//! End-to-end tests for the dltrack pipeline against a loopback hub.

use clap::Parser;
use dltrack_cli::{App, AppError, Cli, Command};
use dltrack_common::test_utils::init_test_logging;
use dltrack_common::test_utils::ledger_fixtures::{missing_ledger, read_lines, temp_dir};
use dltrack_common::{format_ledger_date, today};
use dltrack_config::Config;
use dltrack_ledger::MergeOutcome;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answers every connection with the same JSON body.
async fn serve_json(body: &'static str, connections: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let mut seen = Vec::new();
            while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    base
}

#[tokio::test]
async fn test_fetch_creates_then_extends_ledger() {
    init_test_logging();
    let dir = temp_dir();
    let ledger = missing_ledger(&dir);

    let base = serve_json(
        r#"[{"id":"acme/m2","downloads":200},{"id":"acme/m1","downloads":100}]"#,
        1,
    )
    .await;
    let mut config = Config::default();
    config.hub.endpoint = base;
    config.hub.namespace = "acme".to_string();
    config.ledger.path = ledger.clone();

    let outcome = App::new(config.clone()).fetch().await.unwrap();
    assert!(matches!(outcome, MergeOutcome::Created { .. }));

    let today = format_ledger_date(today());
    assert_eq!(
        read_lines(&ledger),
        vec!["date,m1,m2".to_string(), format!("{today},100,200")]
    );

    config.hub.endpoint = serve_json(r#"[{"id":"acme/m1","downloads":150}]"#, 1).await;
    let outcome = App::new(config).execute(Command::Fetch).await;
    assert!(outcome.is_ok());
    assert_eq!(read_lines(&ledger)[2], format!("{today},150,0"));
}

#[tokio::test]
async fn test_empty_listing_leaves_ledger_untouched() {
    let dir = temp_dir();
    let ledger = missing_ledger(&dir);

    let mut config = Config::default();
    config.hub.endpoint = serve_json("[]", 1).await;
    config.hub.namespace = "acme".to_string();
    config.ledger.path = ledger.clone();

    let err = App::new(config).fetch().await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));
    assert!(!ledger.exists());
}

#[test]
fn test_app_from_config_file() {
    let dir = temp_dir();
    let config_path = dir.path().join("dltrack.yaml");
    std::fs::write(
        &config_path,
        "hub:\n  namespace: acme\nledger:\n  same_day: replace\ncharts:\n  top_n: 3\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from(["dltrack", "--config", config_path.to_str().unwrap(), "plot"]).unwrap();
    let app = App::from_cli(&cli).unwrap();

    assert_eq!(app.config().hub.namespace, "acme");
    assert_eq!(app.config().charts.top_n, 3);
    assert_eq!(app.config().ledger.same_day, dltrack_common::SameDayPolicy::Replace);
}

#[test]
fn test_invalid_config_is_config_error() {
    let dir = temp_dir();
    let config_path = dir.path().join("bad.yaml");
    std::fs::write(&config_path, "charts:\n  top_n: 0\n").unwrap();

    let cli = Cli::try_parse_from(["dltrack", "-c", config_path.to_str().unwrap(), "run"]).unwrap();
    let err = App::from_cli(&cli).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
