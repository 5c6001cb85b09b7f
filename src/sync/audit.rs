use std::sync::atomic::{AtomicUsize, Ordering};

use super::RawLock;

/// Wraps a lock and panics the moment two callers hold it at once.
///
/// Also counts successful acquisitions, so a run can check that a lock was actually contended for.
#[derive(Debug)]
pub struct Audited<L> {
    inner: L,
    holders: AtomicUsize,
    acquisitions: AtomicUsize,
}

impl<L: RawLock> Audited<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            holders: AtomicUsize::new(0),
            acquisitions: AtomicUsize::new(0),
        }
    }
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
    pub fn is_held(&self) -> bool {
        self.holders.load(Ordering::SeqCst) != 0
    }
    fn enter(&self) {
        let before = self.holders.fetch_add(1, Ordering::SeqCst);
        assert_eq!(before, 0, "lock {} acquired while already held", self.inner.id());
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<L: RawLock> RawLock for Audited<L> {
    fn id(&self) -> usize {
        self.inner.id()
    }
    fn acquire(&self) {
        self.inner.acquire();
        self.enter();
    }
    fn try_acquire(&self) -> bool {
        let ok = self.inner.try_acquire();
        if ok {
            self.enter();
        }
        ok
    }
    fn release(&self) {
        // Leave before the inner lock lets the next holder in
        let before = self.holders.fetch_sub(1, Ordering::SeqCst);
        assert_eq!(before, 1, "lock {} released while not held", self.inner.id());
        self.inner.release();
    }
}

#[cfg(test)]
mod tests {
    use crate::sync::{audit::Audited, fork::Fork, RawLock};

    #[test]
    fn counts_acquisitions() {
        let lock = Audited::new(Fork::new(1));
        lock.acquire();
        assert!(lock.is_held());
        assert!(!lock.try_acquire());
        lock.release();
        assert!(lock.try_acquire());
        lock.release();
        assert_eq!(lock.acquisitions(), 2);
        assert!(!lock.is_held());
    }

    // A broken lock that always grants ownership
    struct Sieve;
    impl RawLock for Sieve {
        fn id(&self) -> usize {
            9
        }
        fn acquire(&self) {}
        fn try_acquire(&self) -> bool {
            true
        }
        fn release(&self) {}
    }

    #[test]
    #[should_panic(expected = "lock 9 acquired while already held")]
    fn catches_double_acquire() {
        let lock = Audited::new(Sieve);
        lock.acquire();
        lock.try_acquire();
    }

    #[test]
    #[should_panic(expected = "lock 9 released while not held")]
    fn catches_stray_release() {
        Audited::new(Sieve).release();
    }
}
