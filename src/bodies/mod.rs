mod rigid_body;
mod material;
mod body_type;

pub use self::rigid_body::{RigidBody, RigidBodyHandle};
pub use self::material::Material;
pub use self::body_type::RigidBodyType;

use crate::math::Vector2;

/// Types of forces that can be applied to a body
#[derive(Debug, Clone, Copy)]
pub enum ForceType {
    /// Force applied at the center of mass
    Force(Vector2),

    /// Force applied at a specific point (can cause torque)
    ForceAtPoint {
        /// The force to apply
        force: Vector2,

        /// The point to apply the force at, in world space
        point: Vector2,
    },

    /// Torque that causes angular acceleration
    Torque(f32),

    /// Impulse applied at the center of mass (instantaneous change in velocity)
    Impulse(Vector2),

    /// Impulse applied at a specific point (can cause angular velocity change)
    ImpulseAtPoint {
        /// The impulse to apply
        impulse: Vector2,

        /// The point to apply the impulse at, in world space
        point: Vector2,
    },

    /// Angular impulse (instantaneous change in angular velocity)
    AngularImpulse(f32),
}

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct BodyFlags: u32 {
            /// Body can go to sleep when inactive
            const CAN_SLEEP = 0x01;

            /// Body is currently sleeping
            const SLEEPING = 0x02;

            /// Body has infinite mass and doesn't respond to forces
            const KINEMATIC = 0x04;

            /// Body is affected by gravity
            const AFFECTED_BY_GRAVITY = 0x08;

            /// Body is skipped by global physics logics and one-way filters
            const IGNORES_PHYSICS_LOGICS = 0x10;

            /// Body only participates in the broad phase (no contact response)
            const BROAD_PHASE_ONLY = 0x20;

            /// Body generates collision events
            const GENERATE_COLLISION_EVENTS = 0x40;
        }
    }
}
