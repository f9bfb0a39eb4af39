//! Integration tests for the enrichment flow.
//!
//! Spins up a throwaway in-process HTTP listener as the mock provider, so
//! the tests exercise the real reqwest path without any external service.
//!
//! ```bash
//! cargo test -p explorer-engine --test integration
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use explorer_common::config::AppConfig;
use explorer_common::types::AddressRecord;
use explorer_engine::enrich::Enricher;
use explorer_engine::query::QueryService;
use explorer_engine::store::AddressStore;

// ============================================================
// Mock upstream
// ============================================================

#[derive(Clone)]
struct UpstreamState {
    calls: Arc<AtomicUsize>,
    /// Number of leading requests answered with 503 before success.
    failures_before_success: usize,
    /// Last classification prompt received, for payload assertions.
    last_prompt: Arc<Mutex<Option<String>>>,
}

async fn intel_handler(
    State(state): State<UpstreamState>,
    Path(address): Path<String>,
) -> (StatusCode, Json<Value>) {
    let n = state.calls.fetch_add(1, Ordering::SeqCst);
    // Small delay so concurrent requests genuinely overlap the cache miss
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    if n < state.failures_before_success {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"reason": "upstream down"})),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({"address": address, "risk": "high", "labels": ["mixer"]})),
        )
    }
}

async fn classify_handler(
    State(state): State<UpstreamState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_prompt.lock().await = body
        .get("prompt")
        .and_then(|p| p.as_str())
        .map(str::to_string);

    (
        StatusCode::OK,
        Json(json!({"label": "Laundering", "explanation": "mock", "confidence": 0.9})),
    )
}

/// Bind an ephemeral-port mock provider and return its address plus the
/// shared call counter and prompt capture.
async fn spawn_upstream(
    failures_before_success: usize,
) -> (SocketAddr, Arc<AtomicUsize>, Arc<Mutex<Option<String>>>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let last_prompt = Arc::new(Mutex::new(None));
    let state = UpstreamState {
        calls: calls.clone(),
        failures_before_success,
        last_prompt: last_prompt.clone(),
    };

    let app = Router::new()
        .route("/intel/{address}", get(intel_handler))
        .route("/classify", post(classify_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, calls, last_prompt)
}

// ============================================================
// Helpers
// ============================================================

fn base_config() -> AppConfig {
    AppConfig {
        data_file: "unused".to_string(),
        static_dir: "unused".to_string(),
        port: 0,
        address_intel_api_key: None,
        address_intel_api_url: None,
        classifier_api_key: None,
        classifier_api_url: None,
        address_intel_timeout_secs: 10,
        classifier_timeout_secs: 15,
    }
}

fn intel_config(addr: SocketAddr) -> AppConfig {
    AppConfig {
        address_intel_api_key: Some("test-key".to_string()),
        address_intel_api_url: Some(format!("http://{addr}/intel/{{address}}")),
        ..base_config()
    }
}

fn classifier_config(addr: SocketAddr) -> AppConfig {
    AppConfig {
        classifier_api_key: Some("test-key".to_string()),
        classifier_api_url: Some(format!("http://{addr}/classify")),
        ..base_config()
    }
}

fn record(address: &str, context: Option<&str>) -> AddressRecord {
    AddressRecord {
        address: address.to_string(),
        tag: None,
        category: None,
        confidence: 3.0,
        last_seen: None,
        source: None,
        context: context.map(str::to_string),
    }
}

// ============================================================
// Enrichment client behavior
// ============================================================

#[tokio::test]
async fn test_unconfigured_providers_are_disabled() {
    let enricher = Enricher::from_config(&base_config()).unwrap();
    let rec = record("0xAAA", Some("some context"));

    let (intel, classification) = enricher.enrich(&rec).await;
    assert!(intel.is_none());
    assert!(classification.is_none());
    assert!(enricher.cache().is_empty().await);
}

#[tokio::test]
async fn test_error_then_success_then_cached() {
    let (addr, calls, _) = spawn_upstream(1).await;
    let enricher = Enricher::from_config(&intel_config(addr)).unwrap();

    // First attempt: 503 comes back as an embedded error, uncached
    let first = enricher.address_intel("0xAAA").await.unwrap();
    assert_eq!(first["error"], "addressIntel_status");
    assert_eq!(first["statusCode"], 503);
    assert!(enricher.cache().is_empty().await);

    // Second attempt retries upstream and caches the success
    let second = enricher.address_intel("0xAAA").await.unwrap();
    assert_eq!(second["risk"], "high");
    assert_eq!(enricher.cache().len().await, 1);

    // Third attempt is served from cache: no new outbound call
    let third = enricher.address_intel("0xAAA").await.unwrap();
    assert_eq!(third, second);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_upstream_yields_exception_value() {
    // Port 1 on loopback: connection refused, not a hang
    let mut config = base_config();
    config.address_intel_api_key = Some("test-key".to_string());
    config.address_intel_api_url = Some("http://127.0.0.1:1/intel/{address}".to_string());
    let enricher = Enricher::from_config(&config).unwrap();

    let result = enricher.address_intel("0xAAA").await.unwrap();
    assert_eq!(result["error"], "addressIntel_exception");
    assert!(!result["message"].as_str().unwrap().is_empty());
    assert!(enricher.cache().is_empty().await);
}

#[tokio::test]
async fn test_concurrent_misses_both_call_upstream() {
    // No single-flight: simultaneous misses on the same key both go
    // upstream, and the first insert wins without disturbing either caller.
    let (addr, calls, _) = spawn_upstream(0).await;
    let enricher = Enricher::from_config(&intel_config(addr)).unwrap();

    let (a, b) = tokio::join!(
        enricher.address_intel("0xAAA"),
        enricher.address_intel("0xAAA"),
    );
    assert_eq!(a.unwrap()["risk"], "high");
    assert_eq!(b.unwrap()["risk"], "high");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(enricher.cache().len().await, 1);
}

#[tokio::test]
async fn test_classification_keyed_by_context() {
    let (addr, calls, last_prompt) = spawn_upstream(0).await;
    let enricher = Enricher::from_config(&classifier_config(addr)).unwrap();

    let first = enricher
        .classify("reported ransomware payout wallet")
        .await
        .unwrap();
    assert_eq!(first["label"], "Laundering");

    let prompt = last_prompt.lock().await.clone().unwrap();
    assert!(prompt.contains("Scam, Drugs, Ransomware, Laundering, Fraud, Other"));
    assert!(prompt.contains("reported ransomware payout wallet"));

    // Same context → cache hit; different context → new upstream call
    enricher
        .classify("reported ransomware payout wallet")
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    enricher.classify("different context").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================
// Query service end-to-end
// ============================================================

#[tokio::test]
async fn test_detail_merges_enrichment_additively() {
    let (addr, _, _) = spawn_upstream(0).await;
    let store = AddressStore::from_records(vec![record("0xAAA111", Some("ctx"))]);
    let enricher = Enricher::from_config(&intel_config(addr)).unwrap();

    let detail = QueryService::get_address_detail(&store, &enricher, "0xaaa111")
        .await
        .unwrap();

    let body = serde_json::to_value(&detail).unwrap();
    // Base fields untouched, enrichment attached under its own key
    assert_eq!(body["address"], "0xAAA111");
    assert_eq!(body["confidence"], 3.0);
    assert_eq!(body["addressIntelEnrichment"]["risk"], "high");
    assert!(body.get("classificationEnrichment").is_none());
}

#[tokio::test]
async fn test_detail_succeeds_when_upstream_fails() {
    let mut config = base_config();
    config.address_intel_api_key = Some("test-key".to_string());
    config.address_intel_api_url = Some("http://127.0.0.1:1/intel/{address}".to_string());
    let store = AddressStore::from_records(vec![record("0xAAA111", None)]);
    let enricher = Enricher::from_config(&config).unwrap();

    let detail = QueryService::get_address_detail(&store, &enricher, "0xAAA111")
        .await
        .unwrap();
    let intel = detail.address_intel.unwrap();
    assert_eq!(intel["error"], "addressIntel_exception");
}
