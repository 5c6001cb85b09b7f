pub mod philosopher;
pub mod strategy;

pub use philosopher::{Meals, Philosopher};
pub use strategy::Strategy;
