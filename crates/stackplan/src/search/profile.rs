//! Structured profiling for search attempts
//!
//! Counters are cheap and always maintained; the profile is only handed back
//! to callers when `SearchBudget::enable_profiling` is set.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::time::Duration;

fn secs(d: &Duration) -> f64 {
    d.as_secs_f64()
}

/// Profiling data collected during one search attempt.
///
/// `elapsed` is serialized as `f64` seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchProfile {
    pub elapsed: Duration,
    /// Nodes popped and expanded
    pub expanded: usize,
    /// Edges produced by the graph
    pub generated: usize,
    /// Nodes seen for the first time
    pub inserted: usize,
    /// Open nodes re-prioritized after a cheaper route was found
    pub improved: usize,
    /// Closed nodes reopened by a cheaper route
    pub reopened: usize,
    /// Popped entries discarded as stale or already closed
    pub stale_skips: usize,
    /// Largest heap size observed
    pub max_frontier: usize,
}

impl Serialize for SearchProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SearchProfile", 8)?;
        s.serialize_field("elapsed", &secs(&self.elapsed))?;
        s.serialize_field("expanded", &self.expanded)?;
        s.serialize_field("generated", &self.generated)?;
        s.serialize_field("inserted", &self.inserted)?;
        s.serialize_field("improved", &self.improved)?;
        s.serialize_field("reopened", &self.reopened)?;
        s.serialize_field("stale_skips", &self.stale_skips)?;
        s.serialize_field("max_frontier", &self.max_frontier)?;
        s.end()
    }
}
