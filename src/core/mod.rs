pub mod world;
pub mod config;
pub mod storage;
pub mod events;
mod island;

pub use self::world::PhysicsWorld;
pub use self::config::SimulationConfig;
pub use self::storage::{BodyStorage, JointStorage, Storage};
pub use self::events::{BodyEvent, CollisionEvent, EventQueue};
pub use self::island::Island;

use crate::math::Vector2;

/// A unique identifier for a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// A unique identifier for a joint in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) u32);

/// Timing data for one solver substep
#[derive(Debug, Clone, Copy)]
pub struct SolverStep {
    /// Duration of the substep in seconds
    pub dt: f32,

    /// Inverse of the substep duration (0 for a zero-length step)
    pub inv_dt: f32,
}

impl SolverStep {
    /// Creates solver timing data for the given time step
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            inv_dt: if dt > 0.0 { 1.0 / dt } else { 0.0 },
        }
    }
}

/// Step-scoped context handed to collision filters.
///
/// Carries the world's update counter so per-step caches can tell a
/// repeated query within one step from a query in a new step. Created by
/// the world at the start of every substep; never stored across steps.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Number of the current update, advanced once per substep
    pub update_count: u64,
}

/// A contact point between two bodies
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// The position of the contact point in world space
    pub position: Vector2,

    /// The normal of the contact surface
    pub normal: Vector2,

    /// The penetration depth of the contact
    pub penetration: f32,
}
