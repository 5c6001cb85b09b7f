use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::Strategy;
use crate::config::Config;
use crate::sync::{LockGuard, RawLock};

/// A diner seated between two forks, eating until full.
pub struct Philosopher<'a, L: ?Sized> {
    seat: usize,
    left: &'a L,
    right: &'a L,
    strategy: Strategy,
    rng: StdRng,
    meal_ms: RangeInclusive<u64>,
    full: Duration,
    meals: Meals,
}

/// What a philosopher ate, as returned by [`Philosopher::dine`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meals {
    pub count: usize,
    pub eaten: Duration,
    pub shortest: Option<Duration>,
}

impl Meals {
    fn record(&mut self, meal: Duration) {
        self.count += 1;
        self.eaten += meal;
        self.shortest = Some(self.shortest.map_or(meal, |s| s.min(meal)));
    }
}

impl<'a, L: RawLock + ?Sized> Philosopher<'a, L> {
    pub fn new(seat: usize, left: &'a L, right: &'a L, strategy: Strategy, config: &Config) -> Self {
        Self::with_rng(seat, left, right, strategy, config, StdRng::from_entropy())
    }

    /// Same as `new`, but every coin flip and meal is reproducible from `seed`.
    pub fn with_seed(
        seat: usize,
        left: &'a L,
        right: &'a L,
        strategy: Strategy,
        config: &Config,
        seed: u64,
    ) -> Self {
        Self::with_rng(seat, left, right, strategy, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        seat: usize,
        left: &'a L,
        right: &'a L,
        strategy: Strategy,
        config: &Config,
        rng: StdRng,
    ) -> Self {
        Self {
            seat,
            left,
            right,
            strategy,
            rng,
            meal_ms: config.meal_ms.clone(),
            full: config.full,
            meals: Meals::default(),
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn is_full(&self) -> bool {
        self.meals.eaten >= self.full
    }

    /// Eats until full.
    pub fn dine(mut self) -> Meals {
        while !self.is_full() {
            self.eat();
        }
        trace!(
            "philosopher {} full after {} meals ({:?} shortest)",
            self.seat,
            self.meals.count,
            self.meals.shortest
        );
        self.meals
    }

    fn eat(&mut self) {
        let (first, second) = if self.flip_coin() {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        };
        let meal = self.eat_duration();

        self.strategy.lock(first, second);
        let _first = LockGuard::adopt(first);
        let _second = LockGuard::adopt(second);
        chew(meal);
        self.meals.record(meal);
    }

    fn flip_coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    // Never more than what is left, so the last meal lands exactly on `full`
    fn eat_duration(&mut self) -> Duration {
        let meal = Duration::from_millis(self.rng.gen_range(self.meal_ms.clone()));
        meal.min(self.full - self.meals.eaten)
    }
}

// Busy on purpose: sleeping would hand the core to a neighbour and flatter the strategy
fn chew(meal: Duration) {
    let end = Instant::now() + meal;
    while Instant::now() < end {
        std::hint::spin_loop()
    }
}
