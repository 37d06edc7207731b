//! Offline configuration checks
//!
//! The anon key is a JWT; its payload is decoded without verifying the
//! signature, only to show which project and role it was issued for.

use std::sync::OnceLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

fn project_url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https://([a-z0-9-]+)\.supabase\.co$").expect("valid regex"))
}

fn jwt_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("valid regex")
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("not a JWT (expected three base64url segments)")]
    Malformed,

    #[error("payload is not valid base64url")]
    Encoding,

    #[error("payload is not a JSON object: {0}")]
    Payload(String),
}

/// Claims of interest in a Supabase API key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnonKeyClaims {
    pub iss: Option<String>,
    #[serde(rename = "ref")]
    pub project_ref: Option<String>,
    pub role: Option<String>,
}

/// Project ref from a `https://<ref>.supabase.co` URL.
pub fn project_ref_from_url(url: &str) -> Option<&str> {
    project_url_pattern()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn decode_key_claims(key: &str) -> Result<AnonKeyClaims, JwtError> {
    if !jwt_pattern().is_match(key) {
        return Err(JwtError::Malformed);
    }
    let payload = key.split('.').nth(1).ok_or(JwtError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| JwtError::Encoding)?;
    serde_json::from_slice(&bytes).map_err(|e| JwtError::Payload(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub url: String,
    /// `Some(ref)` when the URL has the hosted-project shape.
    pub url_project_ref: Option<String>,
    pub claims: Result<AnonKeyClaims, JwtError>,
}

impl VerifyReport {
    pub fn build(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.to_string(),
            url_project_ref: project_ref_from_url(url).map(str::to_string),
            claims: decode_key_claims(anon_key),
        }
    }

    pub fn url_ok(&self) -> bool {
        self.url_project_ref.is_some()
    }

    /// `None` when either side is unknown.
    pub fn ref_matches(&self) -> Option<bool> {
        let url_ref = self.url_project_ref.as_deref()?;
        let key_ref = self.claims.as_ref().ok()?.project_ref.as_deref()?;
        Some(url_ref == key_ref)
    }

    /// True when nothing checked offline is wrong.
    pub fn passed(&self) -> bool {
        self.url_ok() && self.claims.is_ok() && self.ref_matches() != Some(false)
    }
}
