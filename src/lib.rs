//! Dining philosophers as a benchmark for two-lock acquisition strategies.
//!
//! N philosophers sit around a table with one fork between each pair of neighbours. Every
//! philosopher needs both adjacent forks to eat, and keeps eating until a fixed appetite is met.
//! How long the whole table takes to finish, as N grows, shows how a [`Strategy`] for grabbing two
//! locks copes with contention.

pub mod bench;
pub mod config;
pub mod dining;
pub mod sync;

pub use config::Config;
pub use dining::{Meals, Philosopher, Strategy};
