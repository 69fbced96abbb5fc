//! Per-test phase logging.
//!
//! Lines go to stderr (shown by `cargo test -- --nocapture`) in the form
//! `[timestamp] [LEVEL] [test] message`. `TEST_LOG_JSON=1` switches to one
//! JSON object per line.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    timestamp: String,
    level: &'a str,
    test: &'a str,
    phase: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
}

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    current_phase: Mutex<String>,
}

impl TestLogger {
    /// Create a new test logger.
    #[must_use]
    pub fn new(test_name: &str) -> Self {
        let logger = Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            current_phase: Mutex::new("init".to_string()),
        };
        logger.log("INFO", "Test starting", None);
        logger
    }

    /// Set the current test phase ("setup", "execute", "verify").
    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.current_phase.lock() {
            *current = phase.to_string();
        }
        self.log("DEBUG", &format!("Phase: {phase}"), None);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log("INFO", message, None);
    }

    /// Log an HTTP request (for HTTP tests).
    pub fn http_request(&self, method: &str, url: &str) {
        self.log("DEBUG", &format!("HTTP {method} {url}"), None);
    }

    /// Mark test as passed with duration.
    pub fn finish_ok(&self) {
        let duration_ms = u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.log(
            "INFO",
            &format!("Test passed (duration: {duration_ms}ms)"),
            Some(duration_ms),
        );
    }

    fn log(&self, level: &str, message: &str, duration_ms: Option<u64>) {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let phase = self
            .current_phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();

        if std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            let entry = LogEntry {
                timestamp,
                level,
                test: &self.test_name,
                phase: &phase,
                message,
                duration_ms,
            };
            if let Ok(json) = serde_json::to_string(&entry) {
                eprintln!("{json}");
            }
        } else {
            eprintln!("[{timestamp}] [{level}] [{}] {message}", self.test_name);
        }
    }
}
