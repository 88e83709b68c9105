#![cfg(feature = "cli")]

use std::net::TcpListener;
use std::process::Command;

/// A local port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_spawn_failure_still_attempts_report() {
    let port = closed_port();

    let output = Command::new(env!("CARGO_BIN_EXE_scriptime"))
        .args([
            "--method",
            "explicit",
            "--email",
            "me@example.com",
            "--password",
            "secret",
            "--server",
            "127.0.0.1",
            "--port",
            &port.to_string(),
            "--to",
            "a@x.com",
            "--relay-timeout",
            "2",
            "--version-command",
            "",
            "--print-body",
            "--",
            "scriptime-no-such-program",
        ])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stdout.starts_with("Subject: "), "stdout: {}", stdout);
    assert!(stdout.contains("scriptime-no-such-program Finished"));
    assert!(stderr.contains("failed to run scriptime-no-such-program"), "stderr: {}", stderr);
}
