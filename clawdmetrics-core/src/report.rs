//! Counters → `upsert_daily_stats`

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::client::{Endpoint, SupabaseClient, RPC_ERROR_FIELDS, RPC_SESSION_ERROR_FIELDS};
use crate::config::ClawdConfig;
use crate::credentials::{StatsAuthMode, StatsCredentials};
use crate::error::ClawdError;
use crate::models::StatsPayload;

#[derive(Debug, Clone)]
pub struct StatsReport {
    pub payload: StatsPayload,
    pub result: Value,
    /// Local calendar day the server is expected to file the counters under.
    pub reported_on: NaiveDate,
}

/// Error body keys used for the RPC call under each credential mode.
pub fn error_fields_for(mode: StatsAuthMode) -> &'static [&'static str] {
    match mode {
        StatsAuthMode::Env => RPC_ERROR_FIELDS,
        StatsAuthMode::Session => RPC_SESSION_ERROR_FIELDS,
    }
}

/// Full URL the counters will be posted to.
pub fn rpc_url(creds: &StatsCredentials, config: &ClawdConfig) -> String {
    let endpoint = Endpoint::rpc(&config.supabase.rpc_function, error_fields_for(creds.mode));
    format!("{}{}", creds.url, endpoint.path)
}

/// Post the counters once. The session user id, if any, is attached.
pub async fn report_stats(
    creds: &StatsCredentials,
    config: &ClawdConfig,
    payload: StatsPayload,
) -> Result<StatsReport, ClawdError> {
    let payload = payload.with_user_id(creds.user_id());
    let client = SupabaseClient::new(&creds.url, &creds.service_key, config.timeout())?;

    let result = client
        .upsert_daily_stats(
            &config.supabase.rpc_function,
            &payload,
            error_fields_for(creds.mode),
        )
        .await?;
    tracing::info!(mode = %creds.mode, "Stats reported");

    Ok(StatsReport {
        payload,
        result,
        reported_on: Local::now().date_naive(),
    })
}
