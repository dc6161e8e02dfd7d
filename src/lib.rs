//! Exact sub-tick collision simulation for billiard balls on a bounded
//! rectangular table.
//!
//! The engine advances the world in fixed ticks. Within a tick every ball
//! moves along a straight [`collision::segment::PathSegment`]; collision times are
//! found by exact root-finding (no fixed small-step integration), queued
//! earliest-first, and resolved one at a time with the whole system's
//! clock moving to each event. Fast balls therefore never tunnel through
//! cushions or each other, regardless of speed.
//!
//! Rendering, input and game rules live outside this crate: consumers
//! read ball state after [`CollisionEngine::advance`] and may set
//! velocities or deactivate balls between ticks.

pub mod ball;
pub mod collision;
pub mod config;
pub mod rack;

pub use ball::Ball;
pub use collision::CollisionEngine;
pub use config::{ConfigError, TableConfig, TuningConfig};
