//! Keyed trailing-edge debouncer
//!
//! Each key has at most one pending timer. Scheduling again under the same
//! key aborts the previous timer and restarts the delay. When a timer fires
//! it hands the caller a [`Ticket`]; the owner must [`Debouncer::claim`] the
//! ticket before acting on it, which rejects tickets from timers that were
//! cancelled or superseded after they had already fired.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Proof that a scheduled delay elapsed for `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Debouncer<K> {
    pending: HashMap<K, Pending>,
    next_generation: u64,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Cancel whatever is pending under `key` and run `fire` once `delay`
    /// passes without another call for the same key.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&mut self, key: K, delay: Duration, fire: F)
    where
        F: FnOnce(Ticket<K>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel(&key);

        self.next_generation += 1;
        let generation = self.next_generation;
        let ticket = Ticket {
            key: key.clone(),
            generation,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(ticket).await;
        });
        self.pending.insert(key, Pending { generation, handle });
    }

    /// Accept a fired ticket. Returns false if the timer it came from was
    /// cancelled or replaced in the meantime.
    pub fn claim(&mut self, ticket: &Ticket<K>) -> bool {
        match self.pending.get(&ticket.key) {
            Some(p) if p.generation == ticket.generation => {
                self.pending.remove(&ticket.key);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(p) => {
                p.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, p) in self.pending.drain() {
            p.handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    #[cfg(test)]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for p in self.pending.values() {
            p.handle.abort();
        }
    }
}
