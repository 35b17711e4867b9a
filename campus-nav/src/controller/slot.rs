//! Per-controller request bookkeeping: the pending debounce task, the
//! request token counter, and the disposal flag.

use tokio::task::JoinHandle;

/// Identifies one issued fetch. Only the most recent token may write state.
pub type RequestToken = u64;

#[derive(Debug, Default)]
pub struct RequestSlot {
    seq: RequestToken,
    pending: Option<JoinHandle<()>>,
    disposed: bool,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the pending debounce task, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Replace the pending debounce task, aborting the previous one.
    pub fn set_pending(&mut self, handle: JoinHandle<()>) {
        self.cancel_pending();
        self.pending = Some(handle);
    }

    /// Forget the pending handle without aborting it.
    ///
    /// Called by the debounce task itself once its timer has fired, so a
    /// later input change cannot abort the fetch that follows. The task must
    /// first check that its generation is still current.
    pub fn release_pending(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recently issued token.
    pub fn current(&self) -> RequestToken {
        self.seq
    }

    /// Issue a new token, making every earlier one stale.
    pub fn next_token(&mut self) -> RequestToken {
        self.seq += 1;
        self.seq
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        !self.disposed && token == self.seq
    }

    /// Cancel the pending task and make every in-flight fetch stale.
    pub fn invalidate(&mut self) {
        self.cancel_pending();
        self.seq += 1;
    }

    /// Invalidate permanently; no later token is ever current.
    pub fn dispose(&mut self) {
        self.invalidate();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
