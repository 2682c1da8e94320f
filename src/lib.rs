#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

//! Situational-graph exploration core.
//!
//! Agents incrementally build a typed graph of visited waypoints,
//! unexplored frontiers, and perceived world objects, and use that graph
//! every simulation step to decide what to do next:
//! - frontier sampling over an occupancy raster (`grid`)
//! - the typed graph with capability-filtered shortest paths (`graph`)
//! - utility-greedy task allocation and stepwise plan execution (`planning`)
//! - the sequential mission loop tying it all together (`mission`)
//!
//! The `sim` module provides the simulated world and behaviors used by the
//! demo binary and the integration tests; real deployments supply their
//! own [`planning::BehaviorImpl`] implementations.

pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod grid;
pub mod mission;
pub mod planning;
pub mod sim;

pub use agent::Agent;
pub use config::{GridConfig, MissionConfig, OccupancyPolicy, SamplerConfig};
pub use error::{Error, Result};
pub use events::{EventSink, MissionEvent};
pub use graph::{Behavior, Capability, NodeId, NodeKind, SituationalGraph, Task};
pub use grid::{FrontierSampler, LocalGrid};
pub use mission::{MissionOutcome, MissionRunner};
pub use planning::{BehaviorRegistry, Plan, Planner, TaskAllocator};

/// World position in meters.
pub type Point = (f64, f64);

/// Raster cell index as `(row, col)`. Signed so that line rasterization
/// and sampling offsets can range outside a grid before bounds checks.
pub type CellIndex = (i64, i64);
