pub mod audit;
pub mod fork;
pub mod multi;

/// Two-phase exclusive lock.
///
/// Unlike `std::sync::Mutex`, acquiring does not hand out a guard: a holder may keep the lock
/// across several logical steps and gives it back with an explicit `release()`. Wrap a held lock
/// in a [`LockGuard`] when it must be released on every exit path.
///
/// The requirements are
/// 1. Mutual Exclusion - at most one holder at any instant.
/// 2. No re-entrancy - acquiring a lock you already hold never returns.
/// 3. Stable identity - `id()` never changes, and locks that may be held together have distinct ids.
pub trait RawLock {
    fn id(&self) -> usize;
    /// Blocks until the caller owns the lock.
    fn acquire(&self);
    /// Never blocks. Returns whether the caller now owns the lock.
    fn try_acquire(&self) -> bool;
    /// Only the current holder may release; anything else is a bug and panics.
    fn release(&self);
}

/// Releases a held lock when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, L: RawLock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: RawLock + ?Sized> LockGuard<'a, L> {
    pub fn acquire(lock: &'a L) -> Self {
        lock.acquire();
        Self { lock }
    }
    // Caller must already hold `lock`
    pub fn adopt(lock: &'a L) -> Self {
        Self { lock }
    }
}

impl<L: RawLock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.release()
    }
}
