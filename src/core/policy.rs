//! Concurrency policies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Concurrency limit used by bounded policies when none is given.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Policy discriminant, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// One callback at a time.
    Serial,
    /// Every callback at once.
    AllAtOnce,
    /// Fixed-size waves separated by a barrier.
    Batch,
    /// Sliding window refilled per completion.
    Continuous,
}

impl PolicyKind {
    /// Whether this policy takes a concurrency limit.
    pub const fn is_bounded(self) -> bool {
        matches!(self, Self::Batch | Self::Continuous)
    }

    /// Stable lowercase name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::AllAtOnce => "all_at_once",
            Self::Batch => "batch",
            Self::Continuous => "continuous",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concurrency policy together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    /// Run callbacks strictly one after another.
    Serial,
    /// Dispatch every callback immediately.
    AllAtOnce,
    /// Run consecutive batches of `concurrency` callbacks, each after the previous finished.
    Batch {
        /// Batch size.
        concurrency: usize,
    },
    /// Keep up to `concurrency` callbacks in flight, refilling on every completion.
    Continuous {
        /// Window size.
        concurrency: usize,
    },
}

impl Default for Policy {
    fn default() -> Self {
        Self::Continuous {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Policy {
    /// Batch policy with the given size.
    pub const fn batch(concurrency: usize) -> Self {
        Self::Batch { concurrency }
    }

    /// Continuous policy with the given window.
    pub const fn continuous(concurrency: usize) -> Self {
        Self::Continuous { concurrency }
    }

    /// Discriminant of this policy.
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::Serial => PolicyKind::Serial,
            Self::AllAtOnce => PolicyKind::AllAtOnce,
            Self::Batch { .. } => PolicyKind::Batch,
            Self::Continuous { .. } => PolicyKind::Continuous,
        }
    }

    /// Concurrency limit, for bounded policies.
    pub const fn concurrency(&self) -> Option<usize> {
        match self {
            Self::Batch { concurrency } | Self::Continuous { concurrency } => Some(*concurrency),
            Self::Serial | Self::AllAtOnce => None,
        }
    }

    /// Reject a zero concurrency limit.
    pub fn validate(&self) -> Result<(), String> {
        match self.concurrency() {
            Some(0) => Err(format!("{} concurrency must be greater than 0", self.kind())),
            _ => Ok(()),
        }
    }
}
