//! ChainTable: fixed array of collision chains over a generational arena.
//!
//! Nodes live in a `SlotMap`; a bucket head or a node's `next` field is the
//! only link to any given node, so every node belongs to exactly one chain.
//! The table never calls `K: Hash`; callers pass the precomputed hash.

use slotmap::{DefaultKey, SlotMap};

/// Arena key of a node. Stale keys fail to resolve rather than alias.
pub(crate) type NodeKey = DefaultKey;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
    next: Option<NodeKey>,
}

pub(crate) struct ChainTable<K, V, const N: usize> {
    heads: [Option<NodeKey>; N],
    nodes: SlotMap<NodeKey, Node<K, V>>,
}

impl<K, V, const N: usize> ChainTable<K, V, N> {
    const NONZERO_BUCKETS: () = assert!(N > 0, "ChainTable needs at least one bucket");

    pub(crate) fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_BUCKETS;
        Self {
            heads: [None; N],
            nodes: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn bucket_for(hash: u64) -> usize {
        (hash % N as u64) as usize
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, k: NodeKey) -> Option<&Node<K, V>> {
        self.nodes.get(k)
    }

    /// Walks the chain for `hash` and returns the first node whose stored
    /// hash equals `hash` and whose key satisfies `eq`.
    pub(crate) fn find<F>(&self, hash: u64, mut eq: F) -> Option<NodeKey>
    where
        F: FnMut(&K) -> bool,
    {
        let mut cur = self.heads[Self::bucket_for(hash)];
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if node.hash == hash && eq(&node.key) {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Force-insert: links a new node at the head of its chain without
    /// checking for an equal key. Callers guarantee the key is absent.
    pub(crate) fn push_front(&mut self, hash: u64, key: K, value: V) -> NodeKey {
        let bucket = Self::bucket_for(hash);
        let next = self.heads[bucket];
        let k = self.nodes.insert(Node {
            hash,
            key,
            value,
            next,
        });
        self.heads[bucket] = Some(k);
        k
    }

    /// Value of a node obtained from `find`/`push_front` on this table.
    pub(crate) fn value_mut(&mut self, k: NodeKey) -> &mut V {
        &mut self.nodes[k].value
    }

    pub(crate) fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            nodes: &self.nodes,
            cur: self.heads.get(bucket).copied().flatten(),
        }
    }

    pub(crate) fn chain_len(&self, bucket: usize) -> Option<usize> {
        (bucket < N).then(|| self.chain(bucket).count())
    }

    /// Detaches and drops every node, one chain head at a time. Returns the
    /// number of nodes released.
    pub(crate) fn clear(&mut self) -> usize {
        let mut released = 0;
        for head in self.heads.iter_mut() {
            let mut cur = head.take();
            while let Some(k) = cur {
                cur = self.nodes.remove(k).and_then(|node| node.next);
                released += 1;
            }
        }
        debug_assert!(self.nodes.is_empty(), "node not linked from any bucket");
        released
    }
}

/// Head-to-tail walk over one chain.
pub(crate) struct Chain<'a, K, V> {
    nodes: &'a SlotMap<NodeKey, Node<K, V>>,
    cur: Option<NodeKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = &'a Node<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        Some(node)
    }
}
