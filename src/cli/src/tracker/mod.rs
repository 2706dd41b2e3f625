//! Locates the running action of a pipeline execution and streams its build logs.

pub mod current_state;
pub mod log_follower;
pub mod log_group;
pub mod project;
pub mod session;

pub use current_state::{current_state, ActivePosition, CurrentState};
pub use log_follower::LogFollower;
pub use session::{resolve_execution, ExecutionSelector, TraceOutcome, TraceSession, TraceSettings};
