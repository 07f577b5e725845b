//! Planner configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the planning driver and each search attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Wall-clock budget per search attempt
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Frontier pops allowed per attempt (0 means no limit)
    pub max_expansions: usize,
    /// Total number of attempts, including the first admissible one
    pub max_attempts: usize,
    /// Added to the per-literal penalty after every timed-out attempt
    pub penalty_step: u32,
    /// Enable structured profiling of each attempt
    pub enable_profiling: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            timeout: Duration::from_millis(5000),
            max_expansions: 0, // 0 means no limit
            max_attempts: 3,
            penalty_step: 2,
            enable_profiling: false,
        }
    }
}

impl PlannerConfig {
    /// Penalty used by the given zero-based attempt.
    ///
    /// The first attempt always runs with penalty 0 so the heuristic stays
    /// admissible; later attempts trade optimality for speed.
    pub fn penalty_for_attempt(&self, attempt: usize) -> u32 {
        self.penalty_step.saturating_mul(attempt as u32)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
