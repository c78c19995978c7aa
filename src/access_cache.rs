//! Single-slot memory of the most recently matched node.
//!
//! The cache never owns a node. It stores an arena key, and a read only
//! trusts it after the key resolves to a live node whose stored hash and key
//! both match the lookup. A stale key (its node was released) is dropped on
//! the first read that notices it.

use crate::chain_table::{ChainTable, NodeKey};
use core::borrow::Borrow;
use core::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct AccessCache {
    slot: Cell<Option<NodeKey>>,
}

impl AccessCache {
    pub(crate) const fn new() -> Self {
        Self {
            slot: Cell::new(None),
        }
    }

    #[inline]
    pub(crate) fn remember(&self, k: NodeKey) {
        self.slot.set(Some(k));
    }

    #[inline]
    pub(crate) fn forget(&self) {
        self.slot.set(None);
    }

    #[cfg(test)]
    pub(crate) fn peek(&self) -> Option<NodeKey> {
        self.slot.get()
    }

    /// Returns the cached node when it holds `q` under `hash`.
    pub(crate) fn hit<K, V, Q, const N: usize>(
        &self,
        table: &ChainTable<K, V, N>,
        hash: u64,
        q: &Q,
    ) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let k = self.slot.get()?;
        let Some(node) = table.node(k) else {
            self.forget();
            return None;
        };
        (node.hash == hash && node.key.borrow() == q).then_some(k)
    }
}
