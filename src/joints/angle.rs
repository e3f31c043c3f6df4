use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, SolverStep};
use crate::error::PhysicsError;
use crate::joints::{Joint, DEFAULT_BIAS_FACTOR};
use crate::math::Vector2;
use crate::Result;
use std::any::Any;

/// A joint that maintains a fixed angle between two bodies.
///
/// The constraint drives `angle_b - angle_a` toward the target angle with
/// a Baumgarte-stabilized velocity bias; no separate position correction
/// is performed.
pub struct AngleJoint {
    /// The first body in the joint
    body_a: BodyHandle,

    /// The second body in the joint
    body_b: BodyHandle,

    /// The bodies involved in the joint (cached for quick lookup)
    bodies: [BodyHandle; 2],

    /// The desired angle between the bodies
    target_angle: f32,

    /// The bias factor of the Baumgarte stabilization
    bias_factor: f32,

    /// The softness of the joint (0 is rigid)
    softness: f32,

    /// The maximum impulse magnitude applied per solve call
    max_impulse: f32,

    /// Velocity bias recomputed each step
    bias: f32,

    /// Angular error recomputed each step
    joint_error: f32,

    /// Effective mass factor recomputed each step
    mass_factor: f32,

    /// Whether the bodies must be woken before the next solve
    wake_pending: bool,
}

impl AngleJoint {
    /// Creates a new angle joint between two bodies with a zero target angle
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            bodies: [body_a, body_b],
            target_angle: 0.0,
            bias_factor: DEFAULT_BIAS_FACTOR,
            softness: 0.0,
            max_impulse: f32::MAX,
            bias: 0.0,
            joint_error: 0.0,
            mass_factor: 0.0,
            wake_pending: false,
        }
    }

    /// Returns the desired angle between the bodies
    pub fn get_target_angle(&self) -> f32 {
        self.target_angle
    }

    /// Sets the desired angle between the bodies.
    ///
    /// Changing the target wakes both bodies so the constraint is honored
    /// on the next step.
    pub fn set_target_angle(&mut self, angle: f32) {
        if angle != self.target_angle {
            self.target_angle = angle;
            self.wake_pending = true;
        }
    }

    /// Returns the bias factor
    pub fn get_bias_factor(&self) -> f32 {
        self.bias_factor
    }

    /// Sets the bias factor
    pub fn set_bias_factor(&mut self, bias_factor: f32) {
        self.bias_factor = bias_factor;
    }

    /// Returns the softness of the joint
    pub fn get_softness(&self) -> f32 {
        self.softness
    }

    /// Sets the softness of the joint
    pub fn set_softness(&mut self, softness: f32) {
        self.softness = softness;
    }

    /// Returns the maximum impulse magnitude
    pub fn get_max_impulse(&self) -> f32 {
        self.max_impulse
    }

    /// Sets the maximum impulse magnitude
    pub fn set_max_impulse(&mut self, max_impulse: f32) {
        self.max_impulse = max_impulse.max(0.0);
    }

    /// Returns the angular error computed by the last step
    pub fn get_joint_error(&self) -> f32 {
        self.joint_error
    }
}

impl Joint for AngleJoint {
    fn joint_type(&self) -> &'static str {
        "Angle"
    }

    fn get_bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn world_anchor_a(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2> {
        Ok(bodies.get_body(self.body_a)?.get_position())
    }

    fn world_anchor_b(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2> {
        Ok(bodies.get_body(self.body_b)?.get_position())
    }

    fn set_world_anchor_a(
        &mut self,
        _bodies: &BodyStorage<RigidBody>,
        _anchor: Vector2,
    ) -> Result<()> {
        Err(PhysicsError::InvalidOperation(
            "The world anchors of an angle joint are derived from the body positions".to_string(),
        ))
    }

    fn set_world_anchor_b(
        &mut self,
        _bodies: &BodyStorage<RigidBody>,
        _anchor: Vector2,
    ) -> Result<()> {
        Err(PhysicsError::InvalidOperation(
            "The world anchors of an angle joint are derived from the body positions".to_string(),
        ))
    }

    fn init_velocity_constraints(
        &mut self,
        step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> Result<()> {
        if self.wake_pending {
            self.wake_pending = false;
            bodies.get_body_mut(self.body_a)?.wake_up();
            bodies.get_body_mut(self.body_b)?.wake_up();
        }

        let (angle_a, inv_inertia_a) = {
            let body = bodies.get_body(self.body_a)?;
            (body.get_angle(), body.get_inverse_inertia())
        };
        let (angle_b, inv_inertia_b) = {
            let body = bodies.get_body(self.body_b)?;
            (body.get_angle(), body.get_inverse_inertia())
        };

        let k = inv_inertia_a + inv_inertia_b;
        if k <= crate::math::EPSILON {
            return Err(PhysicsError::DegenerateJoint(
                "Both endpoints of an angle joint have infinite inertia".to_string(),
            ));
        }

        self.joint_error = angle_b - angle_a - self.target_angle;
        self.bias = -self.bias_factor * step.inv_dt * self.joint_error;
        self.mass_factor = (1.0 - self.softness) / k;

        Ok(())
    }

    fn solve_velocity_constraints(
        &mut self,
        _step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) {
        let (body_a, body_b) = match bodies.get_body_pair_mut(self.body_a, self.body_b) {
            Ok(pair) => pair,
            Err(_) => return,
        };

        // A fully sleeping pair is left untouched so it can stay asleep
        if body_a.is_sleeping() && body_b.is_sleeping() {
            return;
        }

        let p = (self.bias - body_b.get_angular_velocity() + body_a.get_angular_velocity())
            * self.mass_factor;
        let clamped = p.signum() * p.abs().min(self.max_impulse);

        let w_a = body_a.get_angular_velocity() - body_a.get_inverse_inertia() * clamped;
        let w_b = body_b.get_angular_velocity() + body_b.get_inverse_inertia() * clamped;

        body_a.set_angular_velocity(w_a);
        body_b.set_angular_velocity(w_b);
    }

    fn solve_position_constraints(
        &mut self,
        _step: &SolverStep,
        _bodies: &mut BodyStorage<RigidBody>,
    ) -> bool {
        // The velocity bias already re-converges the angle
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
