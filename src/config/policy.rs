//! Policy configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::{Policy, PolicyKind, DEFAULT_CONCURRENCY};

/// Environment variable selecting the policy kind.
pub const POLICY_ENV: &str = "CONTROL_FLOW_POLICY";
/// Environment variable holding the concurrency limit.
pub const CONCURRENCY_ENV: &str = "CONTROL_FLOW_CONCURRENCY";

/// Policy configuration as read from JSON or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Which policy to run.
    pub policy: PolicyKind,
    /// Concurrency limit; only meaningful for `batch` and `continuous`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Continuous,
            concurrency: None,
        }
    }
}

impl From<Policy> for PolicyConfig {
    fn from(policy: Policy) -> Self {
        Self {
            policy: policy.kind(),
            concurrency: policy.concurrency(),
        }
    }
}

impl PolicyConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        match (self.policy.is_bounded(), self.concurrency) {
            (true, Some(0)) => Err(format!("{} concurrency must be greater than 0", self.policy)),
            (false, Some(_)) => Err(format!("{} does not take a concurrency limit", self.policy)),
            _ => Ok(()),
        }
    }

    /// Validate and convert into a [`Policy`]. Bounded policies without a limit
    /// get [`DEFAULT_CONCURRENCY`].
    pub fn to_policy(&self) -> Result<Policy, String> {
        self.validate()?;
        let concurrency = self.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        Ok(match self.policy {
            PolicyKind::Serial => Policy::Serial,
            PolicyKind::AllAtOnce => Policy::AllAtOnce,
            PolicyKind::Batch => Policy::Batch { concurrency },
            PolicyKind::Continuous => Policy::Continuous { concurrency },
        })
    }

    /// Parse policy configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration from the process environment, loading `.env` first if present.
    ///
    /// `CONTROL_FLOW_POLICY` defaults to `continuous`; `CONTROL_FLOW_CONCURRENCY`
    /// is optional.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let policy = match lookup(POLICY_ENV) {
            Some(raw) => serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
                .map_err(|e| format!("{POLICY_ENV}: {e}"))?,
            None => PolicyKind::Continuous,
        };
        let concurrency = lookup(CONCURRENCY_ENV)
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("{CONCURRENCY_ENV}: {e}"))
            })
            .transpose()?;

        let cfg = Self {
            policy,
            concurrency,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
