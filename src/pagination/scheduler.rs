//! Deferred page-count recompute

/// Single pending-recompute flag drained at the next frame boundary.
///
/// Repeated requests before the frame coalesce into one; there is no queue
/// and nothing to cancel.
#[derive(Debug, Default, Clone)]
pub struct FrameScheduler {
    pending: bool,
    coalesced: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a recompute on the next frame
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
            log::trace!("page refresh already pending; coalesced");
        }
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the flag, reporting whether a recompute was pending
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Requests that were folded into an already pending one
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
