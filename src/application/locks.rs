//! Per-conversation serialization.
//!
//! Each conversation id maps to one async mutex. Handlers take it with
//! `try_acquire` and report contention instead of queueing, so a second
//! request for a conversation that is mid-finalization is rejected rather
//! than run afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationId;

/// Guard held for the duration of one operation on a conversation.
pub type ConversationGuard = OwnedMutexGuard<()>;

#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    inner: Arc<Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock for `id`, or returns `None` if it is already held.
    pub fn try_acquire(&self, id: ConversationId) -> Option<ConversationGuard> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Entries nobody holds are only referenced by the map.
            locks.retain(|key, lock| *key == id || Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.try_lock_owned().ok()
    }

    /// Drops the entry for an abandoned conversation.
    pub fn forget(&self, id: ConversationId) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Number of tracked conversations.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_while_held() {
        let locks = ConversationLocks::new();
        let id = ConversationId::new();

        let guard = locks.try_acquire(id);
        assert!(guard.is_some());
        assert!(locks.try_acquire(id).is_none());

        drop(guard);
        assert!(locks.try_acquire(id).is_some());
    }

    #[test]
    fn different_conversations_do_not_contend() {
        let locks = ConversationLocks::new();
        let _a = locks.try_acquire(ConversationId::new()).unwrap();
        assert!(locks.try_acquire(ConversationId::new()).is_some());
    }

    #[test]
    fn released_entries_are_pruned() {
        let locks = ConversationLocks::new();
        for _ in 0..10 {
            let _guard = locks.try_acquire(ConversationId::new());
        }
        let _held = locks.try_acquire(ConversationId::new()).unwrap();
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn forget_removes_entry() {
        let locks = ConversationLocks::new();
        let id = ConversationId::new();
        drop(locks.try_acquire(id));

        locks.forget(id);

        assert!(locks.is_empty());
    }
}
