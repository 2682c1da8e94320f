//! Task allocation, plan generation, and stepwise plan execution.

mod allocator;
mod behavior;
mod planner;

pub use allocator::TaskAllocator;
pub use behavior::{BehaviorImpl, BehaviorRegistry, ExecutionResult};
pub use planner::{Plan, Planner};
