use clawdmetrics_core::display::session_summary;
use clawdmetrics_core::exchange::{exchange_and_save, validate_code};
use clawdmetrics_core::{ClawdConfig, Endpoint, EnvSource, ExchangeCredentials, SessionStore};

use super::{banner, print_block, Usage};

pub const USAGE: Usage = Usage {
    usage: "clawdmetrics exchange-code <auth_code>",
    example: "clawdmetrics exchange-code abc123def456...",
    env_vars: &["NEXT_PUBLIC_SUPABASE_ANON_KEY: Supabase anon key"],
};

/// Characters of the code echoed back before the request.
const CODE_PREVIEW_CHARS: usize = 20;

pub async fn run(
    args: &[String],
    env: &dyn EnvSource,
    config: &ClawdConfig,
) -> anyhow::Result<()> {
    let code = validate_code(args)?;

    banner("🚀 Supabase OAuth Code Exchange");

    let creds = ExchangeCredentials::resolve(env, config)?;
    let store = SessionStore::from_config(config);

    let preview: String = code.chars().take(CODE_PREVIEW_CHARS).collect();
    println!("🔄 Exchanging authorization code for session...");
    println!("   Endpoint: {}{}", creds.url, Endpoint::token().path);
    println!("   Code: {}...", preview);

    let outcome = exchange_and_save(&creds, config, &store, &code).await?;

    println!("✅ Successfully exchanged code for session!");
    println!("💾 Session saved to: {}", outcome.path.display());
    println!("   File size: {} bytes", outcome.bytes_written);

    print_block("📋 Session Summary:", &session_summary(&outcome.session));

    println!("\n✅ Done! Session has been saved and is ready to use.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config_for, env, no_requests};
    use clawdmetrics_core::credentials::ANON_KEY_VAR;
    use clawdmetrics_core::ClawdError;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_bad_arguments_fail_before_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = config_for(&server, &dir);
        let env = env(&[(ANON_KEY_VAR, "anon-key")]);

        for bad in [args(&[]), args(&["  "]), args(&["a", "b"])] {
            let err = run(&bad, &env, &config).await.unwrap_err();
            assert!(
                matches!(err.downcast_ref::<ClawdError>(), Some(ClawdError::InvalidArgument(_))),
                "expected argument error for {:?}",
                bad
            );
        }
        assert!(no_requests(&server).await);
    }

    #[tokio::test]
    async fn test_missing_anon_key_fails_before_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = config_for(&server, &dir);

        let err = run(&args(&["code"]), &env(&[]), &config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClawdError>(),
            Some(ClawdError::MissingEnv { name: ANON_KEY_VAR, .. })
        ));
        assert!(no_requests(&server).await);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_exchange_writes_session_file() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = config_for(&server, &dir);

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "abc",
                "expires_in": 3600,
                "user": {"id": "u1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        run(&args(&["valid-code"]), &env(&[(ANON_KEY_VAR, "anon-key")]), &config)
            .await
            .expect("exchange should succeed");
        assert!(dir.path().join("session.json").exists());
    }
}
