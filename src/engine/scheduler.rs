//! Pass coalescing and payload lifetime tracking.

use crate::model::PayloadHandle;
use crate::view_zone::{ViewZones, ZonePayloads};

/// Generation counter that turns many invalidations into one recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeScheduler {
    requested: u64,
    computed: u64,
}

impl RecomputeScheduler {
    /// A scheduler that owes one initial pass.
    pub fn new() -> Self {
        Self {
            requested: 1,
            computed: 0,
        }
    }

    /// Record that an input changed.
    pub fn invalidate(&mut self) {
        self.requested = self.requested.wrapping_add(1);
    }

    /// True if a pass is owed.
    pub fn is_dirty(&self) -> bool {
        self.requested != self.computed
    }

    /// Claim the owed pass. Returns false if there is nothing to do.
    pub fn begin_pass(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.computed = self.requested;
        true
    }

    /// Generation of the last pass started.
    pub fn generation(&self) -> u64 {
        self.computed
    }
}

/// Host payloads created by the current pass, released before the next one.
#[derive(Debug, Default)]
pub struct DisposableStore {
    payloads: Vec<PayloadHandle>,
}

impl DisposableStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of every payload the zones reference.
    pub fn track(&mut self, zones: &ViewZones) {
        self.payloads.extend(
            zones
                .original
                .iter()
                .chain(&zones.modified)
                .flat_map(|zone| zone.payloads()),
        );
    }

    /// Release everything tracked so far back to the host.
    pub fn clear<P: ZonePayloads + ?Sized>(&mut self, host: &mut P) {
        for payload in self.payloads.drain(..) {
            host.release_payload(payload);
        }
    }

    /// Number of payloads held.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// True if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}
