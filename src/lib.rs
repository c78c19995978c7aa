//! chained-map: a fixed-bucket, separately-chained hash map that remembers
//! the last entry it touched.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small map whose invariants can each be checked in one place:
//!   collision handling, hash/key disambiguation, the cached-node side
//!   channel, and node ownership across copy and teardown.
//! - Layers:
//!   - ChainTable<K, V, N>: structural layer. `N` bucket heads over a
//!     generational arena of nodes; each node stores its precomputed hash
//!     and the link to the next node of its chain. Head insertion, chain
//!     walk, iterative release.
//!   - AccessCache: one weak arena key naming the most recently matched or
//!     inserted node. Never owns a node and is checked before it is trusted.
//!   - ChainedMap<K, V, N, S>: public API. Hashes keys with `S`, consults the
//!     cache, falls back to the chain walk, and keeps the cache in step.
//!
//! Constraints
//! - Bucket count is the const generic `N` (default 16) and never changes;
//!   there is no load factor and no rehash. `N == 0` fails to compile.
//! - A lookup hit requires the stored hash to equal the query hash and the
//!   stored key to equal the query key.
//! - Every node is linked from exactly one bucket head or predecessor, and
//!   sits in bucket `hash mod N`.
//! - No per-key removal. Nodes are released only by `clear`, by copy
//!   assignment replacing the table, or by dropping the map.
//!
//! Access cache
//! - Set by every successful lookup and every insertion; left alone by a
//!   miss; emptied by `clear` and by copy assignment.
//! - A read trusts the cache only when it is set, its key resolves to a live
//!   node, and that node holds the requested hash and key. Generational
//!   keys mean a stale entry can never alias a node that reused its slot.
//! - Lookups take `&self`, so the cache sits in a `Cell`. `ChainedMap` is
//!   `Send` but not `Sync`: concurrent use needs one external lock around
//!   every call, reads included.
//!
//! Copy assignment
//! - `assign_from` (and `Clone`) walks the source bucket by bucket, each
//!   chain head to tail, and force-inserts every pair at the head of its
//!   chain in a fresh table. Entries that share a chain come out in reverse
//!   order. The fresh table replaces the old one only once it is complete.
//!
//! Reentrancy
//! - User code (`Hash`, `Eq`, `Clone`, `Default`) runs mid-operation. A
//!   debug-only guard panics if such code re-enters the same map. Release
//!   builds compile the guard away.
//!
//! Notes and non-goals
//! - No iteration, no removal, no resizing, no persistence.
//! - Allocation failure aborts, as with the standard collections.

mod access_cache;
mod chain_table;
mod chained_map;
mod chained_map_proptest;
mod probe_guard;

// Public surface
pub use chained_map::{ChainedMap, InsertError, DEFAULT_BUCKETS};
