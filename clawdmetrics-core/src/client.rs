//! Supabase HTTP client
//!
//! One POST per call, no retries. Every request carries
//! `Content-Type: application/json`, `apikey: <key>` and
//! `Authorization: Bearer <key>`.
//!
//! Only HTTP 200 counts as success. Any other status is turned into
//! [`ClawdError::Remote`] with a message pulled from the JSON error body
//! (keys tried in the endpoint's priority order) and a status-specific hint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::credentials::{Secret, ANON_KEY_VAR, SERVICE_KEY_VAR};
use crate::error::ClawdError;
use crate::models::{LeaderboardEntry, PkceGrant, StatsPayload};
use crate::session::SessionRecord;

/// Raw error bodies are cut to this many characters.
pub const RAW_ERROR_LIMIT: usize = 200;

/// Error body keys for the auth token endpoint.
pub const TOKEN_ERROR_FIELDS: &[&str] = &["error_description", "error"];
/// Error body keys for the RPC endpoint with env credentials.
pub const RPC_ERROR_FIELDS: &[&str] = &["message", "error", "hint"];
/// Error body keys for the RPC endpoint with session credentials.
pub const RPC_SESSION_ERROR_FIELDS: &[&str] = &["message", "error_description", "error", "hint"];
/// Error body keys for edge functions.
pub const FUNCTION_ERROR_FIELDS: &[&str] = &["error", "message"];

// ============================================================================
// Endpoint descriptors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    Token,
    Rpc { function: String },
    EdgeFunction { name: String },
}

/// A POST target plus how to explain its failures.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub path: String,
    pub error_fields: &'static [&'static str],
}

impl Endpoint {
    pub fn token() -> Self {
        Self {
            kind: EndpointKind::Token,
            path: "/auth/v1/token?grant_type=pkce".to_string(),
            error_fields: TOKEN_ERROR_FIELDS,
        }
    }

    pub fn rpc(function: &str, error_fields: &'static [&'static str]) -> Self {
        Self {
            kind: EndpointKind::Rpc {
                function: function.to_string(),
            },
            path: format!("/rest/v1/rpc/{}", function),
            error_fields,
        }
    }

    pub fn edge_function(name: &str) -> Self {
        Self {
            kind: EndpointKind::EdgeFunction {
                name: name.to_string(),
            },
            path: format!("/functions/v1/{}", name),
            error_fields: FUNCTION_ERROR_FIELDS,
        }
    }

    /// Hint shown under a 401/403/404 from this endpoint.
    pub fn status_hint(&self, status: u16) -> Option<String> {
        let hint = match (&self.kind, status) {
            (EndpointKind::Token, 401) => {
                format!("Check that {} is correct.", ANON_KEY_VAR)
            }
            (EndpointKind::Token, 403) => {
                "The authorization code may have expired or already been used.".to_string()
            }
            (EndpointKind::Token, 404) => {
                "The auth endpoint was not found. Check the Supabase project URL.".to_string()
            }
            (EndpointKind::Rpc { .. }, 401) => {
                format!("Check that {} is correct.", SERVICE_KEY_VAR)
            }
            (EndpointKind::Rpc { .. }, 403) => {
                "The service role key may not have permission to call this function.".to_string()
            }
            (EndpointKind::Rpc { function }, 404) => format!(
                "The RPC function '{}' may not exist. Please create it in your Supabase database.",
                function
            ),
            (EndpointKind::EdgeFunction { .. }, 401) => {
                format!("Check that {} is correct.", ANON_KEY_VAR)
            }
            (EndpointKind::EdgeFunction { .. }, 403) => {
                "The anon key may not be allowed to invoke this function.".to_string()
            }
            (EndpointKind::EdgeFunction { name }, 404) => format!(
                "The edge function '{}' is not deployed. This is expected if it has not been deployed yet.",
                name
            ),
            _ => return None,
        };
        Some(hint)
    }
}

/// Turn a non-200 body into the text that follows `HTTP <status>`.
///
/// For a JSON object the first present key in `fields` wins; a `hint` match
/// renders as ` - Hint: ...`, everything else as `: ...`. A body that is not a
/// JSON object falls back to its first [`RAW_ERROR_LIMIT`] characters.
pub fn extract_error_detail(body: &str, fields: &[&str]) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            for field in fields {
                if let Some(value) = map.get(*field) {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    return if *field == "hint" {
                        format!(" - Hint: {}", text)
                    } else {
                        format!(": {}", text)
                    };
                }
            }
            String::new()
        }
        _ => {
            let raw: String = body.chars().take(RAW_ERROR_LIMIT).collect();
            if raw.trim().is_empty() {
                String::new()
            } else {
                format!(": {}", raw)
            }
        }
    }
}

// ============================================================================
// SupabaseClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
}

impl SupabaseClient {
    /// `api_key` is sent both as `apikey` and as the bearer token.
    pub fn new(base_url: &str, api_key: &Secret, timeout: Duration) -> Result<Self, ClawdError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut key = HeaderValue::from_str(api_key.expose()).map_err(|_| {
            ClawdError::InvalidArgument("API key contains invalid header characters".to_string())
        })?;
        key.set_sensitive(true);
        headers.insert("apikey", key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
            .map_err(|_| {
                ClawdError::InvalidArgument(
                    "API key contains invalid header characters".to_string(),
                )
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path)
    }

    /// Single POST; returns the parsed JSON body of a 200 response.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<Value, ClawdError> {
        let url = self.url_for(endpoint);
        tracing::debug!(url = %url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            let detail = extract_error_detail(&text, endpoint.error_fields);
            tracing::debug!(status = status.as_u16(), url = %url, "Request rejected");
            return Err(ClawdError::Remote {
                status: status.as_u16(),
                detail,
                hint: endpoint.status_hint(status.as_u16()),
            });
        }

        serde_json::from_str(&text).map_err(|e| ClawdError::InvalidResponse {
            endpoint: url,
            reason: e.to_string(),
        })
    }

    /// Exchange an authorization code for a session via the PKCE grant.
    pub async fn exchange_code(&self, code: &str) -> Result<SessionRecord, ClawdError> {
        let endpoint = Endpoint::token();
        let value = self.post_json(&endpoint, &PkceGrant::new(code)).await?;

        SessionRecord::from_value(value).map_err(|_| ClawdError::InvalidResponse {
            endpoint: self.url_for(&endpoint),
            reason: "expected a session object".to_string(),
        })
    }

    /// Call the daily stats upsert function.
    pub async fn upsert_daily_stats(
        &self,
        function: &str,
        payload: &StatsPayload,
        error_fields: &'static [&'static str],
    ) -> Result<Value, ClawdError> {
        let endpoint = Endpoint::rpc(function, error_fields);
        self.post_json(&endpoint, payload).await
    }

    /// Invoke the leaderboard edge function.
    pub async fn fetch_leaderboard(&self, function: &str) -> Result<Vec<LeaderboardEntry>, ClawdError> {
        let endpoint = Endpoint::edge_function(function);
        let url = self.url_for(&endpoint);
        let value = self.post_json(&endpoint, &serde_json::json!({})).await?;
        serde_json::from_value(value).map_err(|e| ClawdError::InvalidResponse {
            endpoint: url,
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
