use std::sync::atomic::{AtomicBool, Ordering};

use super::RawLock;

/// A test-and-test-and-set lock identified by its seat on the table.
#[derive(Debug)]
pub struct Fork {
    id: usize,
    held: AtomicBool,
}
impl Fork {
    // Spinning past this point only burns the quantum of whoever holds the fork
    const SPINS_BEFORE_YIELD: u32 = 64;

    pub fn new(id: usize) -> Self {
        Self {
            id,
            held: AtomicBool::new(false),
        }
    }
    /// `n` forks with ids `0..n` in ring order.
    pub fn ring(n: usize) -> Vec<Fork> {
        (0..n).map(Fork::new).collect()
    }
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

impl RawLock for Fork {
    fn id(&self) -> usize {
        self.id
    }
    fn acquire(&self) {
        let mut spins = 0;
        while !self.try_acquire() {
            if spins < Fork::SPINS_BEFORE_YIELD {
                spins += 1;
                std::hint::spin_loop()
            } else {
                std::thread::yield_now()
            }
        }
    }
    fn try_acquire(&self) -> bool {
        // Read first so contended forks don't bounce the cache line on every attempt
        !self.held.load(Ordering::Relaxed)
            && self
                .held
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
    }
    fn release(&self) {
        let was_held = self.held.swap(false, Ordering::Release);
        assert!(was_held, "fork {} released while nobody held it", self.id);
    }
}
