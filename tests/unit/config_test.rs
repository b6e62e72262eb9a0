//! Tests for configuration validation

use prometheus_control_flow::config::PolicyConfig;
use prometheus_control_flow::core::{Policy, PolicyKind};

#[test]
fn test_policy_config_validation() {
    let valid = PolicyConfig {
        policy: PolicyKind::Continuous,
        concurrency: Some(8),
    };
    assert!(valid.validate().is_ok());
    assert_eq!(valid.to_policy().unwrap(), Policy::continuous(8));
}

#[test]
fn test_policy_config_zero_concurrency() {
    let invalid = PolicyConfig {
        policy: PolicyKind::Batch,
        concurrency: Some(0),
    };
    assert!(invalid.validate().is_err());
    assert!(invalid.to_policy().is_err());
}

#[test]
fn test_policy_config_limit_on_unbounded_policy() {
    for policy in [PolicyKind::Serial, PolicyKind::AllAtOnce] {
        let invalid = PolicyConfig {
            policy,
            concurrency: Some(4),
        };
        assert!(invalid.validate().is_err(), "{policy} accepted a limit");
    }
}

#[test]
fn test_policy_config_default_concurrency() {
    let cfg = PolicyConfig {
        policy: PolicyKind::Batch,
        concurrency: None,
    };
    assert_eq!(cfg.to_policy().unwrap(), Policy::batch(4));
}

#[test]
fn test_policy_config_from_json() {
    let json = r#"{ "policy": "continuous", "concurrency": 16 }"#;
    let config = PolicyConfig::from_json_str(json);
    assert!(config.is_ok());
    assert_eq!(config.unwrap().concurrency, Some(16));

    let serial = PolicyConfig::from_json_str(r#"{ "policy": "serial" }"#).unwrap();
    assert_eq!(serial.to_policy().unwrap(), Policy::Serial);
}

#[test]
fn test_policy_config_from_json_rejects() {
    assert!(PolicyConfig::from_json_str(r#"{ "policy": "all_at_once", "concurrency": 2 }"#).is_err());
    assert!(PolicyConfig::from_json_str(r#"{ "policy": "continuous", "concurrency": -1 }"#).is_err());
    assert!(PolicyConfig::from_json_str(r#"{ "policy": "fastest" }"#).is_err());
}

#[test]
fn test_policy_config_round_trips_policy() {
    let cfg = PolicyConfig::from(Policy::batch(3));
    assert_eq!(cfg.policy, PolicyKind::Batch);
    assert_eq!(cfg.to_policy().unwrap(), Policy::batch(3));
}

#[test]
fn test_policy_config_from_env() {
    use prometheus_control_flow::config::{CONCURRENCY_ENV, POLICY_ENV};

    std::env::set_var(POLICY_ENV, "all_at_once");
    std::env::remove_var(CONCURRENCY_ENV);
    let cfg = PolicyConfig::from_env().unwrap();
    assert_eq!(cfg.to_policy().unwrap(), Policy::AllAtOnce);

    std::env::set_var(POLICY_ENV, "batch");
    std::env::set_var(CONCURRENCY_ENV, "3");
    let cfg = PolicyConfig::from_env().unwrap();
    assert_eq!(cfg.to_policy().unwrap(), Policy::batch(3));

    std::env::set_var(CONCURRENCY_ENV, "0");
    assert!(PolicyConfig::from_env().is_err());

    std::env::remove_var(POLICY_ENV);
    std::env::remove_var(CONCURRENCY_ENV);
}
