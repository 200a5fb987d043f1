/// Tool calls through the ListenHub registry
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{session, CatalogEndpoint};
use listenhub_core::tools::listenhub_registry;
use listenhub_core::Tool;
use serde_json::{json, Value};

#[tokio::test(start_paused = true)]
async fn test_slow_status_fetches_still_return_episode_id() {
    let endpoint = Arc::new(
        CatalogEndpoint::new()
            .partition("en", &[("id-123", "David")])
            .slow_flowspeech("F1", Duration::from_secs(2)),
    );
    let registry = listenhub_registry(&session(&endpoint));
    let started = tokio::time::Instant::now();

    let out = registry
        .call(
            "create_flowspeech",
            json!({"sourceType": "text", "sourceContent": "hello", "speakerId": "David"}),
        )
        .await
        .unwrap();

    // 120 polls of 5s wait plus 2s fetch, well past any fixed call timeout
    assert_eq!(started.elapsed(), Duration::from_secs(120 * 7));
    assert_eq!(endpoint.status_fetches(), 120);
    let Value::String(text) = out else {
        panic!("expected report text, got {out:?}");
    };
    assert!(text.starts_with("Task is still processing"));
    assert!(text.contains("Episode ID: F1"));
    assert!(text.contains("get_flowspeech_status"));
}

#[test]
fn test_single_request_tools_keep_call_timeout() {
    let endpoint = Arc::new(CatalogEndpoint::new());
    let registry = listenhub_registry(&session(&endpoint));
    assert_eq!(registry.call_timeout(), Duration::from_secs(60));
    let speakers = registry.get("get_speakers").unwrap();
    assert!(!speakers.polls());
}
