//! Tests for board configuration parsing and retry backoff.

use crate::board::config::{BoardConfig, ConcurrentUpdatePolicy, RetryPolicy};
use chrono::TimeDelta;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn empty_document_yields_defaults() {
    let config = BoardConfig::from_json("{}").expect("empty object should parse");
    assert_eq!(config, BoardConfig::default());
    assert!(config.optimistic_updates);
    assert_eq!(config.update_policy, ConcurrentUpdatePolicy::Queue);
}

#[rstest]
fn nested_retry_fields_fall_back_individually() {
    let config = BoardConfig::from_json(
        r#"{ "max_title_length": 40, "list_retry": { "max_attempts": 5 } }"#,
    )
    .expect("partial document should parse");

    assert_eq!(config.max_title_length, 40);
    assert_eq!(config.list_retry.max_attempts, 5);
    assert_eq!(
        config.list_retry.initial_backoff_ms,
        RetryPolicy::default().initial_backoff_ms
    );
}

#[rstest]
#[case(r#"{ "update_policy": "drop_everything" }"#)]
#[case(r#"{ "max_title_length": "long" }"#)]
#[case("not json")]
fn malformed_documents_are_rejected(#[case] json: &str) {
    assert!(BoardConfig::from_json(json).is_err());
}

#[rstest]
fn presets_differ_from_default_only_where_named() {
    let strict = BoardConfig::strict();
    assert_eq!(strict.max_title_length, 80);
    assert_eq!(strict.update_policy, ConcurrentUpdatePolicy::RejectStale);
    assert!(strict.optimistic_updates);

    let pessimistic = BoardConfig::pessimistic();
    assert!(!pessimistic.optimistic_updates);
    assert_eq!(pessimistic.update_policy, ConcurrentUpdatePolicy::Queue);
}

#[rstest]
fn due_soon_window_is_expressed_in_hours() {
    let config = BoardConfig {
        due_soon_window_hours: 48,
        ..BoardConfig::default()
    };
    assert_eq!(config.due_soon_window(), TimeDelta::hours(48));
}

#[rstest]
#[case(1, 100)]
#[case(2, 200)]
#[case(3, 400)]
#[case(5, 1_600)]
#[case(6, 2_000)]
#[case(40, 2_000)]
fn backoff_doubles_up_to_the_cap(#[case] retry: u32, #[case] expected_ms: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff_for(retry), Duration::from_millis(expected_ms));
}

#[rstest]
fn no_retry_policy_never_waits() {
    let policy = RetryPolicy::none();
    assert_eq!(policy.max_attempts, 1);
    assert_eq!(policy.backoff_for(1), Duration::ZERO);
}
