//! The sequential mission loop.

mod runner;

pub use runner::{MissionOutcome, MissionRunner};
