use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Monotonic revision of some input state.
///
/// Revisions from [`Revision::fresh`] are unique across the process, so two
/// states that diverged from a common clone never share one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revision(pub u64);

impl Revision {
    /// A revision no other caller in this process has been given.
    pub fn fresh() -> Self {
        Revision(NEXT_REVISION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn next(self) -> Self {
        Revision(self.0.wrapping_add(1))
    }
}

/// Supersession gate for rebuilds.
///
/// Every rebuild is started with [`RevisionGate::begin`] for the input revision
/// it reads. A result is accepted only if no newer rebuild was started since;
/// stale results are dropped whole, never merged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevisionGate {
    latest_started: Option<Revision>,
    latest_accepted: Option<Revision>,
}

impl RevisionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, input: Revision) -> Revision {
        self.latest_started = Some(input);
        input
    }

    /// Returns `true` if `ticket` is still the most recent rebuild.
    pub fn accept(&mut self, ticket: Revision) -> bool {
        if self.latest_started != Some(ticket) {
            return false;
        }
        self.latest_accepted = Some(ticket);
        true
    }

    pub fn latest_accepted(&self) -> Option<Revision> {
        self.latest_accepted
    }

    pub fn is_current(&self, input: Revision) -> bool {
        self.latest_accepted == Some(input)
    }
}
