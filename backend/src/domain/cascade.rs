//! Summary of records removed together with a deleted parent.

use serde::Serialize;

/// Counts of dependent rows removed by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub teams: u64,
    pub assignments: u64,
}

impl CascadeReport {
    /// Report for a delete that only removed assignments.
    pub const fn assignments(count: u64) -> Self {
        Self {
            teams: 0,
            assignments: count,
        }
    }
}
