use tokio::task::AbortHandle;

/// The single pending "write the cycled entry to the clipboard" task.
///
/// Each scheduled task carries the generation it was armed with. Cancelling
/// bumps the generation, so a task that already woke up and is waiting for
/// the store lock sees that it was superseded.
#[derive(Debug, Default)]
pub(crate) struct DeferredReselect {
    generation: u64,
    pending: Option<AbortHandle>,
}

impl DeferredReselect {
    /// Cancels whatever is pending and returns the generation for the next
    /// task.
    pub(crate) fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation
    }

    pub(crate) fn set_pending(&mut self, handle: AbortHandle) {
        self.pending = Some(handle);
    }

    /// Called by the task itself once the delay elapsed. `false` means it was
    /// superseded and must do nothing.
    pub(crate) fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }

    pub(crate) fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for DeferredReselect {
    fn drop(&mut self) {
        self.cancel();
    }
}
