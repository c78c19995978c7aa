//! ChainedMap: fixed-bucket separately-chained map with a last-access cache.

use crate::access_cache::AccessCache;
use crate::chain_table::{ChainTable, NodeKey};
use crate::probe_guard::ProbeGuard;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket count used when `N` is not given.
pub const DEFAULT_BUCKETS: usize = 16;

#[derive(Debug, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

/// Hash map with `N` fixed buckets, each a singly-linked chain.
///
/// The bucket count never changes: chains grow without bound and every
/// operation is O(length of one chain). The most recently matched or
/// inserted entry is remembered, so repeated access to one key skips the
/// chain walk.
///
/// Lookups take `&self` but still move the access cache, which lives in a
/// `Cell`. The map is therefore `!Sync`; share it between threads behind a
/// single `Mutex` that covers reads as well as writes.
pub struct ChainedMap<K, V, const N: usize = DEFAULT_BUCKETS, S = DefaultHashBuilder> {
    hasher: S,
    table: ChainTable<K, V, N>,
    cache: AccessCache,
    guard: ProbeGuard,
}

impl<K, V, const N: usize> ChainedMap<K, V, N>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V, const N: usize, S> Default for ChainedMap<K, V, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, const N: usize, S> ChainedMap<K, V, N, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: ChainTable::new(),
            cache: AccessCache::new(),
            guard: ProbeGuard::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        N
    }

    /// Index of the bucket whose chain holds (or would hold) `q`.
    pub fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        let _g = self.guard.enter("bucket_of");
        ChainTable::<K, V, N>::bucket_for(self.make_hash(q))
    }

    /// Number of entries chained in `bucket`, or `None` if `bucket >= N`.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.table.chain_len(bucket)
    }

    // Cache first, then the chain walk. Only a hit moves the cache.
    fn lookup<Q>(&self, hash: u64, q: &Q) -> Option<NodeKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if let Some(k) = self.cache.hit(&self.table, hash, q) {
            return Some(k);
        }
        let k = self.table.find(hash, |key| key.borrow() == q)?;
        self.cache.remember(k);
        Some(k)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("contains_key");
        self.lookup(self.make_hash(q), q).is_some()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("find");
        let k = self.lookup(self.make_hash(q), q)?;
        self.table.node(k).map(|node| &node.value)
    }

    pub fn find_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("find_mut");
        let k = self.lookup(self.make_hash(q), q)?;
        Some(self.table.value_mut(k))
    }

    /// Inserts `key -> value`, overwriting in place if `key` is present.
    /// Returns the previous value. New entries go to the head of their chain.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.guard.enter("insert");
        let hash = self.make_hash(&key);
        if let Some(k) = self.lookup(hash, &key) {
            return Some(core::mem::replace(self.table.value_mut(k), value));
        }
        let k = self.table.push_front(hash, key, value);
        self.cache.remember(k);
        None
    }

    /// Inserts only if `key` is absent. On a duplicate the stored value is
    /// kept, `value` is dropped, and the cache moves to the existing entry.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError> {
        let _g = self.guard.enter("try_insert");
        let hash = self.make_hash(&key);
        if self.lookup(hash, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let k = self.table.push_front(hash, key, value);
        self.cache.remember(k);
        Ok(self.table.value_mut(k))
    }

    /// Returns the value for `key`, inserting `default()` first if absent.
    /// `default` runs only when an entry is created.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _g = self.guard.enter("get_or_insert_with");
        let hash = self.make_hash(&key);
        let k = match self.lookup(hash, &key) {
            Some(k) => k,
            None => {
                let k = self.table.push_front(hash, key, default());
                self.cache.remember(k);
                k
            }
        };
        self.table.value_mut(k)
    }

    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Drops every entry, chain by chain, and empties the access cache.
    pub fn clear(&mut self) {
        let _g = self.guard.enter("clear");
        self.cache.forget();
        self.table.clear();
    }

    /// Replaces the contents of `self` with copies of `other`'s entries.
    ///
    /// `other` is walked bucket by bucket, each chain head to tail, and every
    /// pair is pushed onto the head of its chain in a fresh table, so entries
    /// sharing a chain come out in reverse order. Hashes are recomputed with
    /// `self`'s hasher. The old table is released only after the copy is
    /// complete; a panicking `Clone` or `Hash` leaves `self` untouched.
    pub fn assign_from(&mut self, other: &Self)
    where
        K: Clone,
        V: Clone,
    {
        let _g = self.guard.enter("assign_from");
        let mut fresh: ChainTable<K, V, N> = ChainTable::new();
        for bucket in 0..N {
            for node in other.table.chain(bucket) {
                let hash = self.make_hash(&node.key);
                fresh.push_front(hash, node.key.clone(), node.value.clone());
            }
        }
        self.cache.forget();
        let mut old = core::mem::replace(&mut self.table, fresh);
        old.clear();
    }

    #[cfg(test)]
    pub(crate) fn cached_key(&self) -> Option<&K> {
        self.cache
            .peek()
            .and_then(|k| self.table.node(k))
            .map(|node| &node.key)
    }

    #[cfg(test)]
    pub(crate) fn chain_keys(&self, bucket: usize) -> Vec<&K> {
        self.table.chain(bucket).map(|node| &node.key).collect()
    }
}

impl<K, V, const N: usize, S> Clone for ChainedMap<K, V, N, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut m = Self::with_hasher(self.hasher.clone());
        m.assign_from(self);
        m
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source);
    }
}

impl<K, Q, V, const N: usize, S> Index<&Q> for ChainedMap<K, V, N, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is not present.
    fn index(&self, q: &Q) -> &V {
        match self.find(q) {
            Some(v) => v,
            None => panic!("key not present in ChainedMap"),
        }
    }
}

impl<K, V, const N: usize, S> Extend<(K, V)> for ChainedMap<K, V, N, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize, S> FromIterator<(K, V)> for ChainedMap<K, V, N, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.extend(iter);
        m
    }
}
