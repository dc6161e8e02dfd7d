pub mod engine;
pub mod event;
pub mod segment;

pub use engine::CollisionEngine;
