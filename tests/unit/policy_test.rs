//! Tests for policy values

use prometheus_control_flow::core::{Policy, PolicyKind, DEFAULT_CONCURRENCY};

#[test]
fn test_policy_kinds() {
    assert_eq!(Policy::Serial.kind(), PolicyKind::Serial);
    assert_eq!(Policy::AllAtOnce.kind(), PolicyKind::AllAtOnce);
    assert_eq!(Policy::batch(2).kind(), PolicyKind::Batch);
    assert_eq!(Policy::continuous(2).kind(), PolicyKind::Continuous);
}

#[test]
fn test_only_bounded_policies_carry_a_limit() {
    assert_eq!(Policy::Serial.concurrency(), None);
    assert_eq!(Policy::AllAtOnce.concurrency(), None);
    assert_eq!(Policy::batch(3).concurrency(), Some(3));
    assert!(PolicyKind::Continuous.is_bounded());
    assert!(!PolicyKind::Serial.is_bounded());
}

#[test]
fn test_default_concurrency() {
    assert_eq!(DEFAULT_CONCURRENCY, 4);
    assert_eq!(Policy::default(), Policy::continuous(DEFAULT_CONCURRENCY));
}

#[test]
fn test_policy_kind_display() {
    assert_eq!(PolicyKind::AllAtOnce.to_string(), "all_at_once");
    assert_eq!(PolicyKind::Continuous.to_string(), "continuous");
}
