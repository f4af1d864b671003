#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod model;
pub mod scoring;
pub mod time;

pub use controller::DifficultyController;
pub use error::Error;
pub use scoring::{GradeBand, ScoreResult};
pub use time::Clock;
