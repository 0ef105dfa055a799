//! # Cart Store
//!
//! Holds the current cart snapshot, the single source of truth for cart
//! state inside the process.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store                                           │
//! │                                                                         │
//! │  watch::Sender<Cart>   ← current snapshot                               │
//! │     • read()       clones the latest snapshot, never waits              │
//! │     • subscribe()  wakes presentation code on every commit              │
//! │                                                                         │
//! │  Mutex<()>             ← writer lock                                    │
//! │     • begin()      waits for the previous transaction to finish         │
//! │     • held from read, through transform and commit, until the           │
//! │       persistence write returns and the transaction is dropped          │
//! │                                                                         │
//! │  Mutation A: [begin ─ read ─ transform ─ commit ─ persist] drop         │
//! │  Mutation B:        waiting ...                          [begin ─ ...] │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because B cannot read before A has committed and persisted, B always
//! transforms the most recently committed cart and no update is lost.

use tokio::sync::{watch, Mutex, MutexGuard};

use gomarket_core::Cart;

/// The in-memory cart snapshot.
#[derive(Debug)]
pub struct CartStore {
    snapshot: watch::Sender<Cart>,
    writer: Mutex<()>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Cart::new());
        CartStore {
            snapshot,
            writer: Mutex::new(()),
        }
    }

    /// Returns the current snapshot.
    pub fn read(&self) -> Cart {
        self.snapshot.borrow().clone()
    }

    /// Returns a receiver notified on every commit.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.snapshot.subscribe()
    }

    /// Starts a transaction, waiting for any transaction in progress.
    ///
    /// Only the cart service commits, so this stays crate-private.
    pub(crate) async fn begin(&self) -> CartTransaction<'_> {
        let guard = self.writer.lock().await;
        CartTransaction {
            store: self,
            current: self.read(),
            _guard: guard,
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive read-transform-commit access to a [`CartStore`].
///
/// Dropping the transaction releases the writer lock.
#[derive(Debug)]
pub(crate) struct CartTransaction<'a> {
    store: &'a CartStore,
    current: Cart,
    _guard: MutexGuard<'a, ()>,
}

impl CartTransaction<'_> {
    /// The snapshot this transaction reads and transforms.
    pub(crate) fn current(&self) -> &Cart {
        &self.current
    }

    /// Atomically replaces the store's snapshot.
    pub(crate) fn commit(&mut self, next: Cart) {
        self.store.snapshot.send_replace(next.clone());
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_core::NewLineItem;

    fn shoe() -> NewLineItem {
        NewLineItem::new("1", "Shoe", "u", 100.0)
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let store = CartStore::new();
        assert!(store.read().is_empty());
    }

    #[tokio::test]
    async fn test_commit_replaces_snapshot() {
        let store = CartStore::new();
        let mut receiver = store.subscribe();

        {
            let mut tx = store.begin().await;
            let next = tx.current().add_to_cart(&shoe()).unwrap();
            tx.commit(next);
            assert_eq!(tx.current().len(), 1);
        }

        assert_eq!(store.read().get("1").map(|i| i.quantity), Some(1));
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn test_read_does_not_wait_for_writer() {
        let store = CartStore::new();
        let mut tx = store.begin().await;
        tx.commit(Cart::new().add_to_cart(&shoe()).unwrap());

        // Writer lock still held here
        assert_eq!(store.read().len(), 1);
    }

    #[tokio::test]
    async fn test_transactions_are_serialized() {
        let store = CartStore::new();
        let first = store.begin().await;

        assert!(store.writer.try_lock().is_err());
        drop(first);
        assert!(store.writer.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_transaction_reads_latest_commit() {
        let store = CartStore::new();

        {
            let mut tx = store.begin().await;
            tx.commit(tx.current().add_to_cart(&shoe()).unwrap());
        }

        let tx = store.begin().await;
        assert_eq!(tx.current().get("1").map(|i| i.quantity), Some(1));
    }
}
