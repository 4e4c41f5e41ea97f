//! Collector lifecycle state.

use std::sync::Arc;

use healthsnap_types::{NormalizedRecord, Snapshot};
use parking_lot::RwLock;
use serde::Serialize;

/// Where the collector is in its authorize/fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Authorizing,
    Fetching,
    Ready,
}

/// The result of one completed fetch.
///
/// Immutable once published; the next fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Published {
    pub snapshot: Snapshot,
    pub record: NormalizedRecord,
}

#[derive(Debug, Default)]
struct Inner {
    phase: Phase,
    authorized: bool,
    published: Option<Arc<Published>>,
}

/// Shared, lock-protected lifecycle state.
#[derive(Debug, Default)]
pub(crate) struct CollectorState {
    inner: RwLock<Inner>,
}

impl CollectorState {
    pub fn phase(&self) -> Phase {
        self.inner.read().phase
    }

    pub fn authorized(&self) -> bool {
        self.inner.read().authorized
    }

    pub fn latest(&self) -> Option<Arc<Published>> {
        self.inner.read().published.clone()
    }

    pub fn begin_authorization(&self) {
        self.inner.write().phase = Phase::Authorizing;
    }

    /// A denial drops back to idle and withdraws any published data.
    pub fn finish_authorization(&self, granted: bool) {
        let mut inner = self.inner.write();
        inner.authorized = granted;
        if !granted {
            inner.published = None;
        }
        inner.phase = if inner.published.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        };
    }

    /// Discard the previous result and mark a fetch in flight.
    pub fn begin_fetch(&self) {
        let mut inner = self.inner.write();
        inner.published = None;
        inner.phase = Phase::Fetching;
    }

    pub fn publish(&self, snapshot: Snapshot, record: NormalizedRecord) -> Arc<Published> {
        let published = Arc::new(Published { snapshot, record });
        let mut inner = self.inner.write();
        inner.published = Some(published.clone());
        inner.phase = Phase::Ready;
        published
    }
}
