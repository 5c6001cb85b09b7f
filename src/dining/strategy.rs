use std::fmt;

use crate::sync::RawLock;

/// How a philosopher picks up two forks.
///
/// Every variant takes two locks the caller does not hold, and returns only once the caller holds
/// both. None of them returns holding just one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Block on one fork, try the other; if it is taken put the first back, yield, and retry
    /// starting from the fork that was busy.
    SmartAndPolite,
    /// `SmartAndPolite` without the yield.
    Smart,
    /// Block on the first fork and never let go of it, spinning on the second.
    ///
    /// Two neighbours that each grabbed the fork the other needs spin forever. That is kept on
    /// purpose as the baseline the other strategies are measured against.
    Persistent,
    /// Always block on the fork with the smaller id first. The only variant that cannot deadlock.
    Ordered,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartAndPolite,
        Strategy::Smart,
        Strategy::Persistent,
        Strategy::Ordered,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::SmartAndPolite => "SmartAndPolite",
            Strategy::Smart => "Smart",
            Strategy::Persistent => "Persistent",
            Strategy::Ordered => "Ordered",
        }
    }

    /// Acquires both `first` and `second`. They must be distinct locks, neither held by the caller.
    pub fn lock<L: RawLock + ?Sized>(self, first: &L, second: &L) {
        match self {
            Strategy::SmartAndPolite => alternate(first, second, std::thread::yield_now),
            Strategy::Smart => alternate(first, second, || {}),
            Strategy::Persistent => persist(first, second),
            Strategy::Ordered => ordered(first, second),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn alternate<L: RawLock + ?Sized, F: Fn()>(first: &L, second: &L, relax: F) {
    loop {
        if block_then_try(first, second) {
            return;
        }
        relax();
        if block_then_try(second, first) {
            return;
        }
        relax();
    }
}

// Either both are held on return (true) or neither is (false)
fn block_then_try<L: RawLock + ?Sized>(a: &L, b: &L) -> bool {
    a.acquire();
    if b.try_acquire() {
        true
    } else {
        a.release();
        false
    }
}

fn persist<L: RawLock + ?Sized>(first: &L, second: &L) {
    first.acquire();
    while !second.try_acquire() {
        std::hint::spin_loop()
    }
}

fn ordered<L: RawLock + ?Sized>(first: &L, second: &L) {
    let (lo, hi) = if first.id() < second.id() {
        (first, second)
    } else {
        (second, first)
    };
    lo.acquire();
    hi.acquire();
}
