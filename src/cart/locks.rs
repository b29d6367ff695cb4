use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Async mutexes keyed by username.
///
/// Holders of different keys never wait on each other. An entry is removed
/// when the last guard for it drops with nobody waiting. A waiter cancelled
/// after that point leaves an idle entry behind; idle entries are swept on
/// the next `acquire`.
#[derive(Clone, Default)]
pub struct UserLocks {
    table: LockTable,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn acquire(&self, key: &str) -> UserLockGuard {
        let lock = {
            let mut table = self.table.lock();
            // Only the table references an idle entry.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            table
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = lock.lock_owned().await;

        UserLockGuard {
            guard: Some(guard),
            key: key.to_string(),
            table: self.table.clone(),
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one key; released on drop.
pub struct UserLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    table: LockTable,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Release first so the table entry's count reflects only other holders.
        drop(self.guard.take());

        let mut table = self.table.lock();
        if let Some(lock) = table.get(&self.key) {
            if Arc::strong_count(lock) == 1 {
                table.remove(&self.key);
            }
        }
    }
}
