use std::path::PathBuf;

use thiserror::Error;

/// Broad failure classes. Every class is terminal for the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing environment variables, malformed arguments, bad config file.
    Configuration,
    /// Missing or corrupt session file, missing field within it.
    Session,
    /// Non-200 responses and unusable response bodies.
    Remote,
    /// Connection failures, timeouts, truncated bodies.
    Transport,
}

#[derive(Error, Debug)]
pub enum ClawdError {
    #[error("{name} environment variable is not set.")]
    MissingEnv {
        name: &'static str,
        example: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(
        "No session file found at {}. Run `clawdmetrics exchange-code <auth_code>` first.",
        path.display()
    )]
    SessionMissing { path: PathBuf },

    #[error("Session file I/O error at {}: {source}", path.display())]
    SessionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {} is not a valid JSON object: {reason}", path.display())]
    SessionCorrupt { path: PathBuf, reason: String },

    #[error("Session is missing required field '{field}'. Run `clawdmetrics exchange-code <auth_code>` again.")]
    SessionField { field: &'static str },

    #[error("HTTP {status}{detail}")]
    Remote {
        status: u16,
        detail: String,
        hint: Option<String>,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClawdError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingEnv { .. } | Self::InvalidArgument(_) | Self::Config(_) => {
                ErrorCategory::Configuration
            }
            Self::SessionMissing { .. }
            | Self::SessionIo { .. }
            | Self::SessionCorrupt { .. }
            | Self::SessionField { .. } => ErrorCategory::Session,
            Self::Remote { .. } | Self::InvalidResponse { .. } => ErrorCategory::Remote,
            Self::Transport(_) => ErrorCategory::Transport,
        }
    }

    /// Remediation lines printed under the error message.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Self::MissingEnv { name, example } => vec![
                "Please set it before running this command:".to_string(),
                format!("export {}='{}'", name, example),
            ],
            Self::Remote {
                hint: Some(hint), ..
            } => vec![format!("💡 Hint: {}", hint)],
            _ => Vec::new(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
