// ABOUTME: Output formatting for the build log.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

use crate::diagnostics::Warning;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    #[default]
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles build-log output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, warning: &Warning) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("Warning: {}", warning.message),
            OutputMode::Json => emit_stdout(&JsonEvent::new("warning", &warning.message, None)),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => emit_stdout(&JsonEvent::new("success", message, self.duration())),
        }
    }

    /// Print a structured result; only JSON mode shows it.
    pub fn result<T: Serialize>(&self, value: &T) {
        if self.mode == OutputMode::Json {
            let event = JsonResult {
                event: "result",
                timestamp: Utc::now(),
                result: value,
            };
            emit_stdout(&event);
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                if let Ok(json) =
                    serde_json::to_string(&JsonEvent::new("error", message, self.duration()))
                {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn emit_stdout<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    timestamp: DateTime<Utc>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn new(event: &'a str, message: &'a str, duration_secs: Option<f64>) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
            message,
            duration_secs,
        }
    }
}

#[derive(Serialize)]
struct JsonResult<'a, T> {
    event: &'a str,
    timestamp: DateTime<Utc>,
    result: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_carries_timestamp() {
        let event = JsonEvent::new("success", "published web 1.0.3", Some(1.5));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "success");
        assert_eq!(json["message"], "published web 1.0.3");
        assert_eq!(json["duration_secs"], 1.5);
        assert!(json["timestamp"].as_str().is_some());
    }

    #[test]
    fn duration_omitted_without_timer() {
        let output = Output::new(OutputMode::Json);
        assert_eq!(output.duration(), None);
        let json =
            serde_json::to_value(JsonEvent::new("error", "boom", output.duration())).unwrap();
        assert!(json.get("duration_secs").is_none());
    }
}
