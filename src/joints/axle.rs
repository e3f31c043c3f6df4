use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, SolverStep};
use crate::error::PhysicsError;
use crate::joints::{Joint, DEFAULT_BIAS_FACTOR};
use crate::math::Vector2;
use crate::Result;
use nalgebra::Matrix2;
use std::any::Any;

/// Positional error below which the axle pivot is considered converged
const POSITION_TOLERANCE: f32 = 0.005;

/// Correction factor applied by the position solver
const POSITION_BETA: f32 = 0.2;

/// A revolute joint pinning two bodies together at a pivot point.
///
/// The bodies stay attached at the pivot but are free to rotate around
/// it. Without a second body the pivot is a fixed world point. An
/// optional motor drives the relative angular velocity; its impulse is
/// clamped by the maximum motor torque independently of the point
/// constraint and combined additively in the same solve pass.
pub struct AxleJoint {
    /// The first body in the joint
    body_a: BodyHandle,

    /// The second body (absent for a world-anchored joint)
    body_b: Option<BodyHandle>,

    /// The bodies involved in the joint (cached for quick lookup)
    bodies: Vec<BodyHandle>,

    /// Anchor on the first body in its local space
    local_anchor_a: Vector2,

    /// Anchor on the second body in its local space, or the fixed world
    /// pivot when there is no second body
    local_anchor_b: Vector2,

    /// The bias factor of the Baumgarte stabilization
    bias_factor: f32,

    /// The softness of the joint (0 is rigid)
    softness: f32,

    /// The maximum point-constraint impulse magnitude per solve call
    max_impulse: f32,

    /// Axis along which the constraint acts; `Vector2::one()` keeps both
    /// axes constrained
    axis: Vector2,

    /// Whether the motor is enabled
    motor_enabled: bool,

    /// The target relative angular velocity of the motor
    motor_speed: f32,

    /// The maximum torque the motor can apply
    max_motor_torque: f32,

    /// Lever arm on the first body, recomputed each step
    r_a: Vector2,

    /// Lever arm on the second body, recomputed each step
    r_b: Vector2,

    /// Inverted effective mass of the point constraint, recomputed each step
    inv_k: Matrix2<f32>,

    /// Velocity bias of the point constraint, recomputed each step
    bias: Vector2,

    /// Effective mass of the motor constraint, recomputed each step
    motor_mass: f32,

    /// Point-constraint impulse accumulated within the current step
    accumulated_impulse: Vector2,

    /// Motor impulse accumulated within the current step
    motor_impulse: f32,

    /// Whether the bodies must be woken before the next solve
    wake_pending: bool,
}

impl AxleJoint {
    /// Creates a new axle joint between two bodies at a world pivot point
    pub fn new(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        pivot: Vector2,
    ) -> Result<Self> {
        let local_anchor_a = bodies
            .get_body(body_a)?
            .get_transform()
            .inverse_transform_point(pivot);
        let local_anchor_b = bodies
            .get_body(body_b)?
            .get_transform()
            .inverse_transform_point(pivot);

        Ok(Self {
            body_a,
            body_b: Some(body_b),
            bodies: vec![body_a, body_b],
            local_anchor_a,
            local_anchor_b,
            bias_factor: DEFAULT_BIAS_FACTOR,
            softness: 0.0,
            max_impulse: f32::MAX,
            axis: Vector2::one(),
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
            r_a: Vector2::zero(),
            r_b: Vector2::zero(),
            inv_k: Matrix2::zeros(),
            bias: Vector2::zero(),
            motor_mass: 0.0,
            accumulated_impulse: Vector2::zero(),
            motor_impulse: 0.0,
            wake_pending: false,
        })
    }

    /// Creates a new axle joint binding a body to a fixed world point
    pub fn new_world_anchored(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        pivot: Vector2,
    ) -> Result<Self> {
        let local_anchor_a = bodies
            .get_body(body_a)?
            .get_transform()
            .inverse_transform_point(pivot);

        Ok(Self {
            body_a,
            body_b: None,
            bodies: vec![body_a],
            local_anchor_a,
            local_anchor_b: pivot,
            bias_factor: DEFAULT_BIAS_FACTOR,
            softness: 0.0,
            max_impulse: f32::MAX,
            axis: Vector2::one(),
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
            r_a: Vector2::zero(),
            r_b: Vector2::zero(),
            inv_k: Matrix2::zeros(),
            bias: Vector2::zero(),
            motor_mass: 0.0,
            accumulated_impulse: Vector2::zero(),
            motor_impulse: 0.0,
            wake_pending: false,
        })
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
        self.softness = softness.max(0.0);
    }

    /// Returns the maximum point-constraint impulse magnitude
    pub fn get_max_impulse(&self) -> f32 {
        self.max_impulse
    }

    /// Sets the maximum point-constraint impulse magnitude
    pub fn set_max_impulse(&mut self, max_impulse: f32) {
        self.max_impulse = max_impulse.max(0.0);
    }

    /// Returns the constraint axis
    pub fn get_axis(&self) -> Vector2 {
        self.axis
    }

    /// Sets the constraint axis.
    ///
    /// `Vector2::one()` (the default) constrains the pivot on both axes;
    /// a unit axis restricts the correction to that direction.
    pub fn set_axis(&mut self, axis: Vector2) {
        self.axis = axis;
        self.wake_pending = true;
    }

    /// Enables the motor with the given target speed and maximum torque
    pub fn enable_motor(&mut self, motor_speed: f32, max_motor_torque: f32) {
        self.motor_enabled = true;
        self.motor_speed = motor_speed;
        self.max_motor_torque = max_motor_torque.max(0.0);
        self.wake_pending = true;
    }

    /// Disables the motor
    pub fn disable_motor(&mut self) {
        self.motor_enabled = false;
    }

    /// Returns whether the motor is enabled
    pub fn is_motor_enabled(&self) -> bool {
        self.motor_enabled
    }

    /// Returns the target speed of the motor
    pub fn get_motor_speed(&self) -> f32 {
        self.motor_speed
    }

    /// Sets the target speed of the motor
    pub fn set_motor_speed(&mut self, motor_speed: f32) {
        self.motor_speed = motor_speed;
        self.wake_pending = true;
    }

    /// Returns the maximum torque of the motor
    pub fn get_max_motor_torque(&self) -> f32 {
        self.max_motor_torque
    }

    /// Sets the maximum torque of the motor
    pub fn set_max_motor_torque(&mut self, max_motor_torque: f32) {
        self.max_motor_torque = max_motor_torque.max(0.0);
    }

    /// Reads position-phase state of the second endpoint, treating an
    /// absent body as an immovable anchor at the world pivot
    fn endpoint_b(
        &self,
        bodies: &BodyStorage<RigidBody>,
    ) -> Result<(Vector2, Vector2, f32, f32)> {
        match self.body_b {
            Some(handle) => {
                let body = bodies.get_body(handle)?;
                let r_b = body
                    .get_transform()
                    .rotation
                    .rotate_vector(self.local_anchor_b);
                Ok((
                    body.get_position() + r_b,
                    r_b,
                    body.get_inverse_mass(),
                    body.get_inverse_inertia(),
                ))
            }
            None => Ok((self.local_anchor_b, Vector2::zero(), 0.0, 0.0)),
        }
    }
}

impl Joint for AxleJoint {
    fn joint_type(&self) -> &'static str {
        "Axle"
    }

    fn get_bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn world_anchor_a(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2> {
        Ok(bodies
            .get_body(self.body_a)?
            .get_transform()
            .transform_point(self.local_anchor_a))
    }

    fn world_anchor_b(&self, bodies: &BodyStorage<RigidBody>) -> Result<Vector2> {
        match self.body_b {
            Some(handle) => Ok(bodies
                .get_body(handle)?
                .get_transform()
                .transform_point(self.local_anchor_b)),
            None => Ok(self.local_anchor_b),
        }
    }

    fn set_world_anchor_a(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        anchor: Vector2,
    ) -> Result<()> {
        self.local_anchor_a = bodies
            .get_body(self.body_a)?
            .get_transform()
            .inverse_transform_point(anchor);
        self.wake_pending = true;
        Ok(())
    }

    fn set_world_anchor_b(
        &mut self,
        bodies: &BodyStorage<RigidBody>,
        anchor: Vector2,
    ) -> Result<()> {
        match self.body_b {
            Some(handle) => {
                self.local_anchor_b = bodies
                    .get_body(handle)?
                    .get_transform()
                    .inverse_transform_point(anchor);
            }
            None => {
                self.local_anchor_b = anchor;
            }
        }
        self.wake_pending = true;
        Ok(())
    }

    fn init_velocity_constraints(
        &mut self,
        step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> Result<()> {
        if self.wake_pending {
            self.wake_pending = false;
            bodies.get_body_mut(self.body_a)?.wake_up();
            if let Some(handle) = self.body_b {
                bodies.get_body_mut(handle)?.wake_up();
            }
        }

        let (pos_a, r_a, inv_mass_a, inv_inertia_a) = {
            let body = bodies.get_body(self.body_a)?;
            let r_a = body
                .get_transform()
                .rotation
                .rotate_vector(self.local_anchor_a);
            (
                body.get_position(),
                r_a,
                body.get_inverse_mass(),
                body.get_inverse_inertia(),
            )
        };
        let (pivot_b, r_b, inv_mass_b, inv_inertia_b) = self.endpoint_b(bodies)?;

        self.r_a = r_a;
        self.r_b = r_b;

        // Effective mass of the point constraint, softness on the diagonal
        let k11 = inv_mass_a
            + inv_mass_b
            + inv_inertia_a * r_a.y * r_a.y
            + inv_inertia_b * r_b.y * r_b.y
            + self.softness;
        let k12 = -inv_inertia_a * r_a.x * r_a.y - inv_inertia_b * r_b.x * r_b.y;
        let k22 = inv_mass_a
            + inv_mass_b
            + inv_inertia_a * r_a.x * r_a.x
            + inv_inertia_b * r_b.x * r_b.x
            + self.softness;

        let k = Matrix2::new(k11, k12, k12, k22);
        self.inv_k = k.try_inverse().ok_or_else(|| {
            PhysicsError::DegenerateJoint(
                "Every endpoint of an axle joint is immovable".to_string(),
            )
        })?;

        let error = pivot_b - (pos_a + r_a);
        self.bias = error * (self.bias_factor * step.inv_dt);

        let k_motor = inv_inertia_a + inv_inertia_b;
        self.motor_mass = if k_motor > crate::math::EPSILON {
            1.0 / k_motor
        } else {
            0.0
        };

        self.accumulated_impulse = Vector2::zero();
        self.motor_impulse = 0.0;

        Ok(())
    }

    fn solve_velocity_constraints(
        &mut self,
        step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) {
        // A fully sleeping constraint is left untouched so it can stay asleep
        let sleeping_a = match bodies.get_body(self.body_a) {
            Ok(body) => body.is_sleeping(),
            Err(_) => return,
        };
        let sleeping_b = match self.body_b {
            Some(handle) => match bodies.get_body(handle) {
                Ok(body) => body.is_sleeping(),
                Err(_) => return,
            },
            None => true,
        };
        if sleeping_a && sleeping_b {
            return;
        }

        let (inv_mass_a, inv_inertia_a) = match bodies.get_body(self.body_a) {
            Ok(body) => (body.get_inverse_mass(), body.get_inverse_inertia()),
            Err(_) => return,
        };
        let (inv_mass_b, inv_inertia_b) = match self.body_b {
            Some(handle) => match bodies.get_body(handle) {
                Ok(body) => (body.get_inverse_mass(), body.get_inverse_inertia()),
                Err(_) => return,
            },
            None => (0.0, 0.0),
        };

        let (mut vel_a, mut w_a) = {
            let body = match bodies.get_body(self.body_a) {
                Ok(body) => body,
                Err(_) => return,
            };
            (body.get_linear_velocity(), body.get_angular_velocity())
        };
        let (mut vel_b, mut w_b) = match self.body_b {
            Some(handle) => match bodies.get_body(handle) {
                Ok(body) => (body.get_linear_velocity(), body.get_angular_velocity()),
                Err(_) => return,
            },
            None => (Vector2::zero(), 0.0),
        };

        // Motor impulse, clamped independently of the point constraint
        if self.motor_enabled && self.motor_mass > 0.0 {
            let c_dot = w_b - w_a - self.motor_speed;
            let lambda = -self.motor_mass * c_dot;

            let max = self.max_motor_torque * step.dt;
            let old = self.motor_impulse;
            self.motor_impulse = crate::math::clamp(old + lambda, -max, max);
            let applied = self.motor_impulse - old;

            w_a -= inv_inertia_a * applied;
            w_b += inv_inertia_b * applied;
        }

        // Point constraint impulse
        let vel_rel = vel_b + Vector2::cross_scalar(w_b, self.r_b)
            - vel_a
            - Vector2::cross_scalar(w_a, self.r_a);
        let rhs = -(vel_rel + self.bias);

        let mut p: Vector2 = (self.inv_k * nalgebra::Vector2::from(rhs)).into();

        if self.axis != Vector2::one() {
            let n = self.axis.normalize();
            p = n * p.dot(&n);
        }

        let magnitude = p.length();
        if magnitude > self.max_impulse {
            p *= self.max_impulse / magnitude;
        }

        self.accumulated_impulse += p;

        vel_a -= p * inv_mass_a;
        w_a -= inv_inertia_a * self.r_a.cross(&p);
        vel_b += p * inv_mass_b;
        w_b += inv_inertia_b * self.r_b.cross(&p);

        if let Ok(body) = bodies.get_body_mut(self.body_a) {
            body.set_linear_velocity(vel_a);
            body.set_angular_velocity(w_a);
        }
        if let Some(handle) = self.body_b {
            if let Ok(body) = bodies.get_body_mut(handle) {
                body.set_linear_velocity(vel_b);
                body.set_angular_velocity(w_b);
            }
        }
    }

    fn solve_position_constraints(
        &mut self,
        _step: &SolverStep,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> bool {
        let (pos_a, angle_a, r_a, inv_mass_a, inv_inertia_a) = {
            let body = match bodies.get_body(self.body_a) {
                Ok(body) => body,
                Err(_) => return true,
            };
            let r_a = body
                .get_transform()
                .rotation
                .rotate_vector(self.local_anchor_a);
            (
                body.get_position(),
                body.get_angle(),
                r_a,
                body.get_inverse_mass(),
                body.get_inverse_inertia(),
            )
        };
        let (pivot_b, r_b, inv_mass_b, inv_inertia_b) = match self.endpoint_b(bodies) {
            Ok(state) => state,
            Err(_) => return true,
        };

        let error = pivot_b - (pos_a + r_a);
        if error.length() < POSITION_TOLERANCE {
            return true;
        }

        let k11 = inv_mass_a
            + inv_mass_b
            + inv_inertia_a * r_a.y * r_a.y
            + inv_inertia_b * r_b.y * r_b.y;
        let k12 = -inv_inertia_a * r_a.x * r_a.y - inv_inertia_b * r_b.x * r_b.y;
        let k22 = inv_mass_a
            + inv_mass_b
            + inv_inertia_a * r_a.x * r_a.x
            + inv_inertia_b * r_b.x * r_b.x;

        let k = Matrix2::new(k11, k12, k12, k22);
        let inv_k = match k.try_inverse() {
            Some(inv_k) => inv_k,
            None => return true,
        };

        let p: Vector2 = (inv_k * nalgebra::Vector2::from(error * POSITION_BETA)).into();

        if let Ok(body) = bodies.get_body_mut(self.body_a) {
            body.set_position(pos_a + p * inv_mass_a);
            body.set_angle(angle_a + inv_inertia_a * r_a.cross(&p));
        }
        if let Some(handle) = self.body_b {
            if let Ok(body) = bodies.get_body_mut(handle) {
                let pos_b = body.get_position();
                let angle_b = body.get_angle();
                body.set_position(pos_b - p * inv_mass_b);
                body.set_angle(angle_b - inv_inertia_b * r_b.cross(&p));
            }
        }

        false
    }

    fn reaction_force(&self, inv_dt: f32) -> Vector2 {
        self.accumulated_impulse * inv_dt
    }

    fn reaction_torque(&self, inv_dt: f32) -> f32 {
        self.motor_impulse * inv_dt
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
