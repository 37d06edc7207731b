pub mod client;
pub mod config;
pub mod credentials;
pub mod display;
pub mod error;
pub mod exchange;
pub mod models;
pub mod report;
pub mod session;
pub mod verify;

pub use client::{Endpoint, EndpointKind, SupabaseClient};
pub use config::ClawdConfig;
pub use credentials::{
    EnvSource, ExchangeCredentials, ProcessEnv, Secret, StatsAuthMode, StatsCredentials,
    VerifyCredentials,
};
pub use error::{ClawdError, ErrorCategory};
pub use models::{LeaderboardEntry, PkceGrant, StatsPayload};
pub use session::{SessionRecord, SessionStore};
pub use verify::{AnonKeyClaims, VerifyReport};
