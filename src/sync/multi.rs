//! Taking any number of locks at once, for when two forks are not enough.

use super::RawLock;

/// Holds every lock passed to [`lock_all`] or [`lock_all_ordered`], releasing them when dropped.
#[must_use = "the locks are released as soon as the guard is dropped"]
pub struct AllGuard<'a, L: RawLock> {
    locks: Vec<&'a L>,
}

impl<L: RawLock> AllGuard<'_, L> {
    pub fn len(&self) -> usize {
        self.locks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<L: RawLock> Drop for AllGuard<'_, L> {
    fn drop(&mut self) {
        self.locks.iter().rev().for_each(|l| l.release());
    }
}

/// Polite acquisition of many locks.
///
/// Blocks on one lock and only *tries* the rest, going round cyclically. The first lock that
/// cannot be taken makes us give back everything we hold, yield, and then block on that very
/// lock, so we never sleep while holding anything someone else is waiting for.
pub fn lock_all<'a, L: RawLock>(locks: &[&'a L]) -> AllGuard<'a, L> {
    assert_distinct(locks);
    let count = locks.len();
    let mut start = 0;
    while count > 0 {
        locks[start].acquire();
        match try_rest(locks, start) {
            None => break,
            Some(busy) => {
                std::thread::yield_now();
                start = busy;
            }
        }
    }
    AllGuard {
        locks: locks.to_vec(),
    }
}

// Tries every lock after `start` (which is held). On failure releases all held and returns the
// index of the busy lock.
fn try_rest<L: RawLock>(locks: &[&L], start: usize) -> Option<usize> {
    let count = locks.len();
    let mut i = (start + 1) % count;
    while i != start {
        if !locks[i].try_acquire() {
            let mut j = start;
            while j != i {
                locks[j].release();
                j = (j + 1) % count;
            }
            return Some(i);
        }
        i = (i + 1) % count;
    }
    None
}

/// Acquires all locks in increasing `id()` order, blocking on each.
///
/// Deadlock free as long as everyone sharing these locks uses the same order.
pub fn lock_all_ordered<'a, L: RawLock>(locks: &[&'a L]) -> AllGuard<'a, L> {
    assert_distinct(locks);
    let mut sorted = locks.to_vec();
    sorted.sort_by_key(|l| l.id());
    sorted.iter().for_each(|l| l.acquire());
    AllGuard { locks: sorted }
}

// Taking a lock we already hold would never return
fn assert_distinct<L: RawLock>(locks: &[&L]) {
    let mut ids = locks.iter().map(|l| l.id()).collect::<Vec<_>>();
    ids.sort_unstable();
    assert!(
        ids.windows(2).all(|w| w[0] != w[1]),
        "cannot hold the same lock twice"
    );
}
