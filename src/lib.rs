pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod decomposition;
pub mod collision;
pub mod joints;
pub mod logics;
pub mod ignorers;
pub mod backend;

/// Re-export common types for easier usage
pub use crate::backend::{BackendRegistry, PhysicsClient};
pub use crate::bodies::{Material, RigidBody, RigidBodyHandle, RigidBodyType};
pub use crate::core::{BodyHandle, JointHandle, PhysicsWorld, SimulationConfig};
pub use crate::math::Vector2;

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Invalid operation: {0}")]
        InvalidOperation(String),

        #[error("Degenerate joint: {0}")]
        DegenerateJoint(String),

        #[error("Degenerate geometry: {0}")]
        DegenerateGeometry(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Unsupported operation: {0}")]
        Unsupported(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
