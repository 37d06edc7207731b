//! Authorization code → session file

use std::path::PathBuf;

use crate::client::SupabaseClient;
use crate::config::ClawdConfig;
use crate::credentials::ExchangeCredentials;
use crate::error::ClawdError;
use crate::session::{SessionRecord, SessionStore};

#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub session: SessionRecord,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Require exactly one code argument, trimmed and non-empty.
pub fn validate_code<S: AsRef<str>>(args: &[S]) -> Result<String, ClawdError> {
    let raw = match args {
        [] => {
            return Err(ClawdError::InvalidArgument(
                "Missing required argument 'auth_code'".to_string(),
            ))
        }
        [raw] => raw.as_ref(),
        _ => {
            return Err(ClawdError::InvalidArgument(format!(
                "Expected exactly 1 argument, got {}",
                args.len()
            )))
        }
    };
    let code = raw.trim();
    if code.is_empty() {
        return Err(ClawdError::InvalidArgument(
            "auth_code cannot be empty".to_string(),
        ));
    }
    Ok(code.to_string())
}

/// Exchange `code` for a session and persist it.
///
/// The session file is written only after a 200 response with a JSON object
/// body; on any failure an existing file is left untouched.
pub async fn exchange_and_save(
    creds: &ExchangeCredentials,
    config: &ClawdConfig,
    store: &SessionStore,
    code: &str,
) -> Result<ExchangeOutcome, ClawdError> {
    let client = SupabaseClient::new(&creds.url, &creds.anon_key, config.timeout())?;
    let session = client.exchange_code(code).await?;
    tracing::info!("Authorization code exchanged for session");

    let bytes_written = store.save(&session)?;

    Ok(ExchangeOutcome {
        session,
        path: store.path().to_path_buf(),
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code_trims() {
        assert_eq!(validate_code(&["  abc123  "]).unwrap(), "abc123");
    }

    #[test]
    fn test_validate_code_rejects_missing_and_blank() {
        let err = validate_code::<&str>(&[]).unwrap_err();
        assert!(err.to_string().contains("auth_code"));

        let err = validate_code(&["   "]).unwrap_err();
        assert_eq!(err.to_string(), "auth_code cannot be empty");
    }

    #[test]
    fn test_validate_code_rejects_extra_arguments() {
        let err = validate_code(&["abc", "def"]).unwrap_err();
        assert!(matches!(err, ClawdError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Expected exactly 1 argument, got 2");
    }
}
