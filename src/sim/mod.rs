//! Simulated world and behaviors for demos and integration tests.
//!
//! Real deployments replace this module with hardware-backed perception
//! and actuation; everything here stays behind the same
//! [`crate::planning::BehaviorImpl`] boundary the core plans against.

mod behaviors;
mod world;

pub use behaviors::{
    sim_behavior_registry, AssessBehavior, ExploreBehavior, ExploreBehaviorConfig, GotoBehavior,
};
pub use world::SimWorld;
