use serde::{Deserialize, Serialize};

/// Stable tower identifier assigned at ingestion.
///
/// Display names are labels only; every cross-reference inside a project
/// (connections, altitude overrides, hidden set) keys off this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TowerId(pub u64);

impl TowerId {
    pub fn new(n: u64) -> Self {
        TowerId(n)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}
