//! Common utilities for integration tests.
//!
//! Tests use Redis at `REDIS_URL` if set, otherwise localhost:6379.
//! They are marked `#[ignore]` and skip themselves when no server answers.

#![allow(dead_code)]

use std::process::Command;

/// Get the Redis URL from environment or default.
pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

/// Default Redis port for CLI commands.
/// Override with REDIS_PORT env var for CI.
pub fn redis_port() -> u16 {
    std::env::var("REDIS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6379)
}

/// Check if Redis is available at the test URL.
pub fn redis_available() -> bool {
    let port = redis_port();
    let output = Command::new("redis-cli")
        .args(["-p", &port.to_string(), "PING"])
        .output();

    match output {
        Ok(o) => o.status.success() && String::from_utf8_lossy(&o.stdout).trim() == "PONG",
        Err(_) => false,
    }
}

/// Run a redis-cli command and return the output as a string.
pub fn redis_cli_output(args: &[&str]) -> Option<String> {
    let port_str = redis_port().to_string();
    let mut full_args = vec!["-p", &port_str];
    full_args.extend(args);

    Command::new("redis-cli")
        .args(&full_args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// Clean up all keys matching a pattern.
pub fn cleanup_keys(pattern: &str) {
    let port_str = redis_port().to_string();

    let output = Command::new("redis-cli")
        .args(["-p", &port_str, "KEYS", pattern])
        .output()
        .ok();

    if let Some(o) = output {
        let stdout = String::from_utf8_lossy(&o.stdout);
        for key in stdout.lines().filter(|s| !s.is_empty()) {
            let _ = Command::new("redis-cli")
                .args(["-p", &port_str, "DEL", key])
                .output();
        }
    }
}
