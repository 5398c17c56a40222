use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Generation token handed out when an advisory request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

/// Holds the answer to the most recently issued request.
///
/// Responses that resolve after a newer request was issued are dropped, so
/// overlapping calls can't overwrite a fresh answer with a stale one.
#[derive(Debug)]
pub struct LatestResult<T> {
    sequencer: RequestSequencer,
    value: RwLock<Option<T>>,
}

impl<T: Clone> Default for LatestResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LatestResult<T> {
    pub fn new() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            value: RwLock::new(None),
        }
    }

    pub fn begin(&self) -> Ticket {
        self.sequencer.issue()
    }

    /// Stores `value` if `ticket` is still the newest. Returns whether it was kept.
    pub async fn settle(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = self.value.write().await;
        // Checked under the write lock so a newer settle can't slip in between.
        if !self.sequencer.is_current(ticket) {
            log::debug!("Discarding stale advisory response {:?}", ticket);
            return false;
        }
        *slot = Some(value);
        true
    }

    pub async fn get(&self) -> Option<T> {
        self.value.read().await.clone()
    }
}
