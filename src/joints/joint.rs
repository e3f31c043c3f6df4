use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, SolverStep};
use crate::math::Vector2;
use crate::Result;
use std::any::Any;

/// Default Baumgarte bias factor for joints
pub const DEFAULT_BIAS_FACTOR: f32 = 0.2;

/// Base trait for bilateral velocity/position constraints between bodies.
///
/// A joint references one or two bodies; a joint with a single body is
/// anchored against the world. The world recomputes the transient solver
/// state of every joint each step via [`Joint::init_velocity_constraints`]
/// before running the velocity and position iterations.
pub trait Joint: Send + Sync + 'static {
    /// Returns the type name of the joint
    fn joint_type(&self) -> &'static str;

    /// Returns the bodies involved in the joint
    fn get_bodies(&self) -> &[BodyHandle];

    /// Checks if the joint involves a specific body
    fn involves_body(&self, body: BodyHandle) -> bool {
        self.get_bodies().contains(&body)
    }

    /// Returns the world-space anchor on the first body
    fn world_anchor_a(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2>;

    /// Returns the world-space anchor on the second body (or the world
    /// pivot for a world-anchored joint)
    fn world_anchor_b(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2>;

    /// Sets the world-space anchor on the first body.
    ///
    /// Joint types whose anchors are derived from body state reject this
    /// with an invalid-operation error instead of silently ignoring it.
    fn set_world_anchor_a(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        anchor: Vector2,
    ) -> Result<()>;

    /// Sets the world-space anchor on the second body
    fn set_world_anchor_b(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        anchor: Vector2,
    ) -> Result<()>;

    /// Recomputes the joint's transient solver state for this step.
    ///
    /// Fails with a degenerate-joint error when the constraint cannot be
    /// solved, e.g. when every endpoint is immovable.
    fn init_velocity_constraints(
        &mut self,
        step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> Result<()>;

    /// Applies one velocity-constraint iteration, mutating body velocities
    fn solve_velocity_constraints(&mut self, step: &SolverStep, bodies: &mut BodyStorage<RigidBody>);

    /// Applies one position-correction iteration.
    ///
    /// Returns true when the positional error is within tolerance (or the
    /// joint kind performs no position correction at all).
    fn solve_position_constraints(
        &mut self,
        step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> bool;

    /// Returns the reaction force on the second body.
    ///
    /// Joint kinds that do not track their reaction may report zero.
    fn reaction_force(&self, inv_dt: f32) -> Vector2 {
        let _ = inv_dt;
        Vector2::zero()
    }

    /// Returns the reaction torque on the second body
    fn reaction_torque(&self, inv_dt: f32) -> f32 {
        let _ = inv_dt;
        0.0
    }

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
