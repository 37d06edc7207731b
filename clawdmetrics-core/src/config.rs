use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use shellexpand::tilde;

pub const DEFAULT_SUPABASE_URL: &str = "https://cvzmvsnztqtehoquirft.supabase.co";
pub const DEFAULT_RPC_FUNCTION: &str = "upsert_daily_stats";
pub const DEFAULT_LEADERBOARD_FUNCTION: &str = "get_leaderboard";
pub const DEFAULT_SESSION_PATH: &str = "~/.config/clawdmetrics/session.json";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/clawdmetrics/config.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Non-secret settings. Keys are never read from here, only from the environment.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClawdConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub rpc_function: String,
    pub leaderboard_function: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SUPABASE_URL.to_string(),
            rpc_function: DEFAULT_RPC_FUNCTION.to_string(),
            leaderboard_function: DEFAULT_LEADERBOARD_FUNCTION.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SESSION_PATH.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClawdConfig {
    /// Layer defaults, the config file and `CLAWDMETRICS__*` overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(p) => (tilde(p).to_string(), true),
            None => (tilde(DEFAULT_CONFIG_PATH).to_string(), false),
        };

        let s = Config::builder()
            .set_default("supabase.url", DEFAULT_SUPABASE_URL)?
            .set_default("supabase.rpc_function", DEFAULT_RPC_FUNCTION)?
            .set_default("supabase.leaderboard_function", DEFAULT_LEADERBOARD_FUNCTION)?
            .set_default("session.path", DEFAULT_SESSION_PATH)?
            .set_default("http.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?
            .add_source(File::new(&file, FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("CLAWDMETRICS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }

    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(tilde(&self.session.path).to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Project URL with any trailing slash removed.
    pub fn supabase_url(&self) -> &str {
        self.supabase.url.trim_end_matches('/')
    }
}
