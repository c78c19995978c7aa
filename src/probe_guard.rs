//! Debug-only probe guard.
//!
//! Map operations call user code (`K: Hash`, `K: Eq`, `K: Clone`,
//! `V: Clone`) while walking a chain. Because lookups take `&self`, such code
//! could reach the map again through a shared reference and move the access
//! cache underneath the outer walk. In debug builds the guard records which
//! operation is probing and panics, naming both operations, on a nested
//! entry. In release builds it is zero-sized and does nothing.

#[cfg(debug_assertions)]
use core::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Marks `op` as probing until the returned `Probe` is dropped.
    #[inline]
    #[allow(clippy::needless_return)]
    pub(crate) fn enter(&self, op: &'static str) -> Probe<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.replace(Some(op)) {
                panic!("ChainedMap::{op} re-entered the map during ChainedMap::{outer}");
            }
            return Probe { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Probe {
                _owner: core::marker::PhantomData,
            };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

/// RAII marker returned by `ProbeGuard::enter`.
pub(crate) struct Probe<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _owner: core::marker::PhantomData<&'a ProbeGuard>,
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProbeGuard;

    #[test]
    fn sequential_probes_are_fine() {
        let g = ProbeGuard::new();
        {
            let _p = g.enter("insert");
        }
        let _p = g.enter("find");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn probe_is_released_on_drop() {
        let g = ProbeGuard::new();
        {
            let _p = g.enter("contains_key");
            assert_eq!(g.active(), Some("contains_key"));
        }
        assert_eq!(g.active(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_probe_panics_with_both_names() {
        let g = ProbeGuard::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = g.enter("insert");
            let _inner = g.enter("find");
        }));
        let err = res.expect_err("nested probe must panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("find"), "message: {msg}");
        assert!(msg.contains("insert"), "message: {msg}");
        // The outer probe unwound and released the guard.
        assert_eq!(g.active(), None);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_probe_is_noop_in_release() {
        let g = ProbeGuard::new();
        let _outer = g.enter("insert");
        let _inner = g.enter("find");
    }
}
