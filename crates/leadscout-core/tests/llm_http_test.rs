//! HTTP-level tests for the LLM stages
//!
//! A local axum server stands in for the chat completions endpoint so the
//! status mapping, degradation codes and client metrics are exercised over
//! a real connection.

use axum::{extract::State, http::StatusCode, routing, Json, Router};
use leadscout_core::{
    CandidateScorer, CredentialProfile, HttpLLMClient, HttpQueryExpander, HttpScorer,
    LLMServiceConfig, ParsedCandidate, QueryExpander, RankedCandidate, Stage,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    hits: Arc<AtomicUsize>,
}

async fn completions(State(stub): State<Stub>) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    (stub.status, Json(stub.body))
}

/// Serve one canned response; returns the base url, hit counter and shutdown handle
async fn start_llm_server(
    status: StatusCode,
    body: Value,
) -> (String, Arc<AtomicUsize>, oneshot::Sender<()>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v1/chat/completions", routing::post(completions))
        .with_state(Stub {
            status,
            body,
            hits: hits.clone(),
        });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = rx.await;
    });
    tokio::spawn(async move {
        let _ = server.await;
    });

    (format!("http://{}", addr), hits, tx)
}

fn client_for(url: String) -> Arc<HttpLLMClient> {
    let config = LLMServiceConfig {
        url,
        api_key: Some("test-key".to_string()),
        ..Default::default()
    };
    Arc::new(HttpLLMClient::new(config).unwrap())
}

fn one_candidate() -> Vec<RankedCandidate> {
    vec![RankedCandidate::new(
        ParsedCandidate {
            name: "Dana Whitfield".into(),
            profile_url: "https://www.linkedin.com/in/dana-whitfield".into(),
            title: Some("ICU RN".into()),
            company: None,
            location: Some("Los Angeles, CA".into()),
            years_experience: Some(6),
            summary: String::new(),
        },
        CredentialProfile::default(),
    )]
}

#[tokio::test]
async fn test_rate_limited_expansion_degrades() {
    let (url, hits, shutdown) = start_llm_server(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "Rate limit reached"}}),
    )
    .await;
    let client = client_for(url);
    let expander = HttpQueryExpander::new(client.clone());

    let outcome = expander.expand("ICU nurse Los Angeles").await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.value(), "ICU nurse Los Angeles");
    let reason = outcome.reason().unwrap();
    assert_eq!(reason.stage, Stage::Expansion);
    assert_eq!(reason.code, "llm_rate_limited");

    let metrics = client.metrics();
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.total_errors, 1);
    assert_eq!(metrics.cache_hits, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_quota_exhausted_scoring_degrades() {
    let (url, hits, shutdown) = start_llm_server(
        StatusCode::PAYMENT_REQUIRED,
        json!({"error": {"message": "Insufficient credits"}}),
    )
    .await;
    let client = client_for(url);
    let scorer = HttpScorer::new(client.clone());

    let outcome = scorer.score(&one_candidate(), "ICU RN with CCRN").await;

    assert!(outcome.is_fallback());
    assert!(outcome.value().is_empty());
    let reason = outcome.reason().unwrap();
    assert_eq!(reason.stage, Stage::Scoring);
    assert_eq!(reason.code, "llm_quota_exhausted");

    let metrics = client.metrics();
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.total_errors, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_successful_expansion_is_cached() {
    let (url, hits, shutdown) = start_llm_server(
        StatusCode::OK,
        json!({"choices": [{"message": {
            "role": "assistant",
            "content": "ICU registered nurse RN CCRN Los Angeles California"
        }}]}),
    )
    .await;
    let client = client_for(url);
    let expander = HttpQueryExpander::new(client.clone());

    for _ in 0..2 {
        let outcome = expander.expand("ICU nurse Los Angeles").await;
        assert!(!outcome.is_fallback());
        assert_eq!(
            outcome.value(),
            "ICU registered nurse RN CCRN Los Angeles California"
        );
    }

    let metrics = client.metrics();
    assert_eq!(metrics.total_requests, 2);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.total_errors, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let _ = shutdown.send(());
}
