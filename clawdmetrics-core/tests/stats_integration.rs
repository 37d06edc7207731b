//! Integration tests for the stats reporting flow
//!
//! Covers both credential modes against a wiremock RPC endpoint.

use std::collections::HashMap;

use clawdmetrics_core::credentials::{SERVICE_KEY_VAR, URL_VAR};
use clawdmetrics_core::display::stats_summary;
use clawdmetrics_core::report::{report_stats, rpc_url};
use clawdmetrics_core::{
    ClawdConfig, ClawdError, ErrorCategory, SessionRecord, SessionStore, StatsAuthMode,
    StatsCredentials, StatsPayload,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RPC_PATH: &str = "/rest/v1/rpc/upsert_daily_stats";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn config_for(server: &MockServer, dir: &TempDir) -> ClawdConfig {
    let mut config = ClawdConfig::default();
    config.supabase.url = server.uri();
    config.session.path = dir.path().join("session.json").display().to_string();
    config.http.timeout_seconds = 5;
    config
}

fn env_creds(server: &MockServer, config: &ClawdConfig, dir: &TempDir) -> StatsCredentials {
    let uri = server.uri();
    StatsCredentials::resolve(
        StatsAuthMode::Env,
        &env(&[(URL_VAR, uri.as_str()), (SERVICE_KEY_VAR, "service-key")]),
        config,
        &SessionStore::new(dir.path().join("session.json")),
    )
    .expect("env credentials should resolve")
}

// ===========================================================================
// TEST 1: `10 5000 3000` with {"success": true} → summary "success: true"
// ===========================================================================
#[tokio::test]
async fn test_report_stats_env_mode_success() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .and(body_json(json!({
            "interaction_count": 10,
            "input_tokens": 5000,
            "output_tokens": 3000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let creds = env_creds(&server, &config, &dir);
    assert_eq!(rpc_url(&creds, &config), format!("{}{}", server.uri(), RPC_PATH));

    let payload = StatsPayload::from_args(&["10", "5000", "3000"]).unwrap();
    let report = report_stats(&creds, &config, payload).await.expect("report should succeed");

    assert_eq!(stats_summary(&report.result), vec!["success: true"]);
}

// ===========================================================================
// TEST 2: Session mode attaches the session user id
// ===========================================================================
#[tokio::test]
async fn test_report_stats_session_mode_sends_user_id() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);
    let store = SessionStore::from_config(&config);
    store
        .save(
            &SessionRecord::from_value(json!({
                "access_token": "abc",
                "user": {"id": "u1", "email": "a@b.com"}
            }))
            .unwrap(),
        )
        .unwrap();

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(body_json(json!({
            "interaction_count": 1,
            "input_tokens": 2,
            "output_tokens": 3,
            "user_id": "u1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"interaction_count": 11}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let creds = StatsCredentials::resolve(
        StatsAuthMode::Session,
        &env(&[(SERVICE_KEY_VAR, "service-key")]),
        &config,
        &store,
    )
    .unwrap();

    let payload = StatsPayload::from_args(&["1", "2", "3"]).unwrap();
    let report = report_stats(&creds, &config, payload).await.unwrap();

    assert_eq!(report.payload.user_id.as_deref(), Some("u1"));
    assert_eq!(stats_summary(&report.result), vec!["interaction_count: 11"]);
}

// ===========================================================================
// TEST 3: 404 → missing function hint, uses `message` before `hint`
// ===========================================================================
#[tokio::test]
async fn test_report_stats_404_missing_function() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PGRST202",
            "message": "Could not find the function public.upsert_daily_stats",
            "hint": "Perhaps you meant to call public.upsert_stats"
        })))
        .mount(&server)
        .await;

    let creds = env_creds(&server, &config, &dir);
    let payload = StatsPayload::from_args(&["1", "1", "1"]).unwrap();
    let err = report_stats(&creds, &config, payload).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Remote);
    assert_eq!(
        err.to_string(),
        "HTTP 404: Could not find the function public.upsert_daily_stats"
    );
    assert!(err.remediation()[0].contains("'upsert_daily_stats' may not exist"));
}

// ===========================================================================
// TEST 4: 403 with only a hint renders " - Hint:"
// ===========================================================================
#[tokio::test]
async fn test_report_stats_403_hint_only_body() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"hint": "grant execute first"})),
        )
        .mount(&server)
        .await;

    let creds = env_creds(&server, &config, &dir);
    let payload = StatsPayload::from_args(&["1", "1", "1"]).unwrap();
    let err = report_stats(&creds, &config, payload).await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP 403 - Hint: grant execute first");
    assert!(matches!(err, ClawdError::Remote { hint: Some(_), .. }));
}

// ===========================================================================
// TEST 5: Invalid counters are rejected
// ===========================================================================
#[test]
fn test_invalid_counters_are_rejected() {
    for args in [["-1", "5000", "3000"], ["10", "abc", "3000"], ["10", "5000", "2.5"]] {
        let result = StatsPayload::from_args(&args);
        assert!(
            matches!(result, Err(ClawdError::InvalidArgument(_))),
            "expected rejection for {:?}",
            args
        );
    }
}

// ===========================================================================
// TEST 6: Missing service key is a configuration error
// ===========================================================================
#[tokio::test]
async fn test_missing_service_key_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);

    let uri = server.uri();
    let result = StatsCredentials::resolve(
        StatsAuthMode::Env,
        &env(&[(URL_VAR, uri.as_str())]),
        &config,
        &SessionStore::from_config(&config),
    );
    assert!(matches!(
        result,
        Err(ClawdError::MissingEnv { name: SERVICE_KEY_VAR, .. })
    ));
}

// ===========================================================================
// TEST 7: Session mode without a session file points at exchange-code
// ===========================================================================
#[tokio::test]
async fn test_session_mode_without_session_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir);

    let err = StatsCredentials::resolve(
        StatsAuthMode::Session,
        &env(&[(SERVICE_KEY_VAR, "service-key")]),
        &config,
        &SessionStore::from_config(&config),
    )
    .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Session);
    assert!(err.to_string().contains("Run `clawdmetrics exchange-code <auth_code>` first"));
    assert_eq!(err.exit_code(), 1);
}
