//! Credential resolution
//!
//! Every secret a command needs is resolved once, up front, into a typed
//! credential set. A missing variable fails resolution before any HTTP client
//! is built, so configuration errors never reach the network.
//!
//! Variables:
//! - `NEXT_PUBLIC_SUPABASE_ANON_KEY` - anon key (exchange, verify)
//! - `SUPABASE_SERVICE_KEY`          - service-role key (report-stats)
//! - `SUPABASE_URL`                  - project URL (report-stats `--auth env`)
//! - `NEXT_PUBLIC_SUPABASE_URL`      - project URL (verify)

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::ClawdConfig;
use crate::error::ClawdError;
use crate::session::{SessionRecord, SessionStore};

pub const ANON_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const URL_VAR: &str = "SUPABASE_URL";
pub const PUBLIC_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";

// ============================================================================
// Environment access
// ============================================================================

/// Read-only view of environment variables.
pub trait EnvSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Look up `name`, treating empty or whitespace-only values as unset.
fn lookup(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(
    env: &dyn EnvSource,
    name: &'static str,
    example: &'static str,
) -> Result<String, ClawdError> {
    lookup(env, name).ok_or(ClawdError::MissingEnv { name, example })
}

// ============================================================================
// Secret
// ============================================================================

/// An API key. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

// ============================================================================
// Exchange flow
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExchangeCredentials {
    pub url: String,
    pub anon_key: Secret,
}

impl ExchangeCredentials {
    pub fn resolve(env: &dyn EnvSource, config: &ClawdConfig) -> Result<Self, ClawdError> {
        let anon_key = require(env, ANON_KEY_VAR, "your_key_here")?;
        Ok(Self {
            url: config.supabase_url().to_string(),
            anon_key: Secret::new(anon_key),
        })
    }
}

// ============================================================================
// Stats flow
// ============================================================================

/// Where `report-stats` gets its credentials from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsAuthMode {
    /// `SUPABASE_URL` + `SUPABASE_SERVICE_KEY`, no session file.
    #[default]
    Env,
    /// Configured project URL + `SUPABASE_SERVICE_KEY` + the cached session.
    Session,
}

impl FromStr for StatsAuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "env" => Ok(Self::Env),
            "session" => Ok(Self::Session),
            other => Err(format!(
                "unknown auth mode '{}' (expected 'env' or 'session')",
                other
            )),
        }
    }
}

impl fmt::Display for StatsAuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => f.write_str("env"),
            Self::Session => f.write_str("session"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsCredentials {
    pub mode: StatsAuthMode,
    pub url: String,
    pub service_key: Secret,
    /// Present only in [`StatsAuthMode::Session`].
    pub session: Option<SessionRecord>,
}

impl StatsCredentials {
    /// Environment variables are checked before the session file is read.
    pub fn resolve(
        mode: StatsAuthMode,
        env: &dyn EnvSource,
        config: &ClawdConfig,
        store: &SessionStore,
    ) -> Result<Self, ClawdError> {
        match mode {
            StatsAuthMode::Env => {
                let url = require(env, URL_VAR, "https://your-project.supabase.co")?;
                let service_key = require(env, SERVICE_KEY_VAR, "your_service_role_key_here")?;
                Ok(Self {
                    mode,
                    url: url.trim_end_matches('/').to_string(),
                    service_key: Secret::new(service_key),
                    session: None,
                })
            }
            StatsAuthMode::Session => {
                let service_key = require(env, SERVICE_KEY_VAR, "your_service_role_key_here")?;
                let session = store.load()?;
                session.require_access_token()?;
                Ok(Self {
                    mode,
                    url: config.supabase_url().to_string(),
                    service_key: Secret::new(service_key),
                    session: Some(session),
                })
            }
        }
    }

    /// User id to attribute the stats to, taken from the cached session.
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.user_id())
    }
}

// ============================================================================
// Verify flow
// ============================================================================

#[derive(Debug, Clone)]
pub struct VerifyCredentials {
    pub url: String,
    /// Which variable the URL came from, or `None` for the configured default.
    pub url_source: Option<&'static str>,
    pub anon_key: Secret,
}

impl VerifyCredentials {
    pub fn resolve(env: &dyn EnvSource, config: &ClawdConfig) -> Result<Self, ClawdError> {
        let (url, url_source) = if let Some(url) = lookup(env, PUBLIC_URL_VAR) {
            (url, Some(PUBLIC_URL_VAR))
        } else if let Some(url) = lookup(env, URL_VAR) {
            (url, Some(URL_VAR))
        } else {
            (config.supabase_url().to_string(), None)
        };
        let anon_key = require(env, ANON_KEY_VAR, "your_key_here")?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            url_source,
            anon_key: Secret::new(anon_key),
        })
    }
}
