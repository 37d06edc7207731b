use serde::Serialize;

// Static verifier. The authorize step that would mint a real one is not part of this tool.
pub const PLACEHOLDER_CODE_VERIFIER: &str = "placeholder_code_verifier_needs_proper_implementation";

/// Body of `POST /auth/v1/token` for the PKCE grant.
#[derive(Debug, Clone, Serialize)]
pub struct PkceGrant {
    pub grant_type: &'static str,
    pub code: String,
    pub code_verifier: String,
}

impl PkceGrant {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            grant_type: "pkce",
            code: code.into(),
            code_verifier: PLACEHOLDER_CODE_VERIFIER.to_string(),
        }
    }
}
