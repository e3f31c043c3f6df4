use crate::bodies::{body_flags::BodyFlags, ForceType, Material, RigidBodyType};
use crate::collision::CollisionCategory;
use crate::core::BodyHandle;
use crate::logics::LogicCategory;
use crate::math::{Aabb, Rot2, Transform, Vector2};
use crate::shapes::Shape;

use std::sync::Arc;

/// Type alias for a handle to a rigid body
pub type RigidBodyHandle = BodyHandle;

/// A rigid body for 2D physics simulation
pub struct RigidBody {
    /// The body's transform in world space
    transform: Transform,

    /// The body's linear velocity
    linear_velocity: Vector2,

    /// The body's angular velocity in radians per second
    angular_velocity: f32,

    /// The body's material properties
    material: Material,

    /// The body's collision shape
    shape: Option<Arc<dyn Shape>>,

    /// The body's type (dynamic, kinematic, or static)
    body_type: RigidBodyType,

    /// The body's mass
    mass: f32,

    /// Inverse of the body's mass (0 for infinite mass)
    inv_mass: f32,

    /// The body's moment of inertia about its center of mass
    inertia: f32,

    /// Inverse of the body's moment of inertia (0 for infinite inertia)
    inv_inertia: f32,

    /// The body's linear damping
    linear_damping: f32,

    /// The body's angular damping
    angular_damping: f32,

    /// The body's flags
    flags: BodyFlags,

    /// How long the body has been "inactive" (for sleeping)
    sleeping_time: f32,

    /// Forces to be applied in the next integration step
    forces: Vec<ForceType>,

    /// Collision categories this body belongs to
    collision_category: CollisionCategory,

    /// Collision categories this body collides with
    collision_mask: CollisionCategory,

    /// Categories of physics logics this body ignores
    logic_ignore_mask: LogicCategory,

    /// Index of the solver island the body belongs to.
    ///
    /// Assigned by the island build of the current step and meaningless
    /// outside of it.
    island_index: Option<u32>,
}

impl RigidBody {
    /// Creates a new rigid body with the given shape and transform
    pub fn new(shape: Arc<dyn Shape>, transform: Transform, body_type: RigidBodyType) -> Self {
        let mut body = Self {
            transform,
            linear_velocity: Vector2::zero(),
            angular_velocity: 0.0,
            material: Material::default(),
            shape: Some(shape),
            body_type,
            mass: 1.0,
            inv_mass: 1.0,
            inertia: 1.0,
            inv_inertia: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            flags: BodyFlags::CAN_SLEEP
                | BodyFlags::AFFECTED_BY_GRAVITY
                | BodyFlags::GENERATE_COLLISION_EVENTS,
            sleeping_time: 0.0,
            forces: Vec::new(),
            collision_category: CollisionCategory::GROUP1,
            collision_mask: CollisionCategory::ALL,
            logic_ignore_mask: LogicCategory::empty(),
            island_index: None,
        };

        body.update_mass_properties();

        body
    }

    /// Creates a new dynamic rigid body with the given shape and position
    pub fn new_dynamic(shape: Arc<dyn Shape>, position: Vector2) -> Self {
        Self::new(shape, Transform::from_position(position), RigidBodyType::Dynamic)
    }

    /// Creates a new kinematic rigid body with the given shape and position
    pub fn new_kinematic(shape: Arc<dyn Shape>, position: Vector2) -> Self {
        let mut body = Self::new(
            shape,
            Transform::from_position(position),
            RigidBodyType::Kinematic,
        );

        body.flags.insert(BodyFlags::KINEMATIC);

        body
    }

    /// Creates a new static rigid body with the given shape and position
    pub fn new_static(shape: Arc<dyn Shape>, position: Vector2) -> Self {
        Self::new(shape, Transform::from_position(position), RigidBodyType::Static)
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Sets the body's transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector2 {
        self.transform.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector2) {
        self.transform.position = position;
    }

    /// Returns the body's orientation angle in radians
    pub fn get_angle(&self) -> f32 {
        self.transform.angle()
    }

    /// Sets the body's orientation angle in radians
    pub fn set_angle(&mut self, angle: f32) {
        self.transform.set_angle(angle);
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector2 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector2) {
        self.linear_velocity = velocity;
        self.wake_up();
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: f32) {
        self.angular_velocity = velocity;
        self.wake_up();
    }

    /// Returns the body's material
    pub fn get_material(&self) -> &Material {
        &self.material
    }

    /// Sets the body's material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
        self.update_mass_properties();
    }

    /// Returns a reference to the body's shape
    pub fn get_shape(&self) -> Option<&Arc<dyn Shape>> {
        self.shape.as_ref()
    }

    /// Sets the body's shape
    pub fn set_shape(&mut self, shape: Arc<dyn Shape>) {
        self.shape = Some(shape);
        self.update_mass_properties();
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass (and inverse mass).
    ///
    /// An infinite mass makes the body immovable: its inverse mass is
    /// exactly zero and it no longer responds to forces or impulses.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;

        if self.body_type == RigidBodyType::Dynamic && mass.is_finite() && mass > 0.0 {
            self.inv_mass = 1.0 / mass;
        } else {
            self.inv_mass = 0.0;
        }
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the body's moment of inertia
    pub fn get_inertia(&self) -> f32 {
        self.inertia
    }

    /// Sets the body's moment of inertia (and its inverse)
    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = inertia;

        if self.body_type == RigidBodyType::Dynamic && inertia.is_finite() && inertia > 0.0 {
            self.inv_inertia = 1.0 / inertia;
        } else {
            self.inv_inertia = 0.0;
        }
    }

    /// Returns the body's inverse moment of inertia
    pub fn get_inverse_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Returns the body type
    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Sets the body type and updates mass properties accordingly
    pub fn set_body_type(&mut self, body_type: RigidBodyType) {
        self.body_type = body_type;
        self.update_mass_properties();

        if body_type != RigidBodyType::Dynamic {
            self.linear_velocity = Vector2::zero();
            self.angular_velocity = 0.0;
            self.forces.clear();
        }
    }

    /// Sets the body's linear damping
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    /// Returns the body's linear damping
    pub fn get_linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Sets the body's angular damping
    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.max(0.0);
    }

    /// Returns the body's angular damping
    pub fn get_angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Returns the collision categories this body belongs to
    pub fn get_collision_category(&self) -> CollisionCategory {
        self.collision_category
    }

    /// Sets the collision categories this body belongs to
    pub fn set_collision_category(&mut self, category: CollisionCategory) {
        self.collision_category = category;
    }

    /// Returns the collision categories this body collides with
    pub fn get_collision_mask(&self) -> CollisionCategory {
        self.collision_mask
    }

    /// Sets the collision categories this body collides with
    pub fn set_collision_mask(&mut self, mask: CollisionCategory) {
        self.collision_mask = mask;
    }

    /// Returns the categories of physics logics this body ignores
    pub fn get_logic_ignore_mask(&self) -> LogicCategory {
        self.logic_ignore_mask
    }

    /// Sets the categories of physics logics this body ignores
    pub fn set_logic_ignore_mask(&mut self, mask: LogicCategory) {
        self.logic_ignore_mask = mask;
    }

    /// Returns the island index assigned by the current solve pass
    pub fn get_island_index(&self) -> Option<u32> {
        self.island_index
    }

    /// Assigns the island index for the current solve pass
    pub(crate) fn set_island_index(&mut self, index: Option<u32>) {
        self.island_index = index;
    }

    /// Returns whether the body is sleeping
    pub fn is_sleeping(&self) -> bool {
        self.flags.contains(BodyFlags::SLEEPING)
    }

    /// Puts the body to sleep
    pub fn put_to_sleep(&mut self) {
        if self.body_type == RigidBodyType::Dynamic && !self.is_sleeping() {
            self.flags.insert(BodyFlags::SLEEPING);
            self.linear_velocity = Vector2::zero();
            self.angular_velocity = 0.0;
            self.forces.clear();
        }
    }

    /// Wakes up the body
    pub fn wake_up(&mut self) {
        if self.is_sleeping() {
            self.flags.remove(BodyFlags::SLEEPING);
            self.sleeping_time = 0.0;
        }
    }

    /// Returns whether the body can sleep
    pub fn can_sleep(&self) -> bool {
        self.flags.contains(BodyFlags::CAN_SLEEP)
    }

    /// Sets whether the body can sleep
    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        if can_sleep {
            self.flags.insert(BodyFlags::CAN_SLEEP);
        } else {
            self.flags.remove(BodyFlags::CAN_SLEEP);
            self.wake_up();
        }
    }

    /// Returns whether the body is affected by gravity
    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    /// Sets whether the body is affected by gravity
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        if affected {
            self.flags.insert(BodyFlags::AFFECTED_BY_GRAVITY);
        } else {
            self.flags.remove(BodyFlags::AFFECTED_BY_GRAVITY);
        }
    }

    /// Returns whether the body is skipped by global physics logics
    pub fn ignores_physics_logics(&self) -> bool {
        self.flags.contains(BodyFlags::IGNORES_PHYSICS_LOGICS)
    }

    /// Sets whether the body is skipped by global physics logics
    pub fn set_ignores_physics_logics(&mut self, ignores: bool) {
        if ignores {
            self.flags.insert(BodyFlags::IGNORES_PHYSICS_LOGICS);
        } else {
            self.flags.remove(BodyFlags::IGNORES_PHYSICS_LOGICS);
        }
    }

    /// Returns whether the body only participates in the broad phase
    pub fn is_broad_phase_only(&self) -> bool {
        self.flags.contains(BodyFlags::BROAD_PHASE_ONLY)
    }

    /// Sets whether the body only participates in the broad phase
    pub fn set_broad_phase_only(&mut self, broad_phase_only: bool) {
        if broad_phase_only {
            self.flags.insert(BodyFlags::BROAD_PHASE_ONLY);
        } else {
            self.flags.remove(BodyFlags::BROAD_PHASE_ONLY);
        }
    }

    /// Returns whether the body generates collision events
    pub fn generates_collision_events(&self) -> bool {
        self.flags.contains(BodyFlags::GENERATE_COLLISION_EVENTS)
    }

    /// Sets whether the body generates collision events
    pub fn set_generates_collision_events(&mut self, generates: bool) {
        if generates {
            self.flags.insert(BodyFlags::GENERATE_COLLISION_EVENTS);
        } else {
            self.flags.remove(BodyFlags::GENERATE_COLLISION_EVENTS);
        }
    }

    /// Returns the time the body has been inactive
    pub fn get_sleeping_time(&self) -> f32 {
        self.sleeping_time
    }

    /// Sets the time the body has been inactive
    pub fn set_sleeping_time(&mut self, time: f32) {
        self.sleeping_time = time;
    }

    /// Returns the body's bounds in world space
    pub fn world_bounds(&self) -> Aabb {
        match &self.shape {
            Some(shape) => shape.world_bounds(&self.transform),
            None => Aabb::new(self.transform.position, self.transform.position),
        }
    }

    /// Returns the body's bounds evaluated in the given direction frame
    pub fn bounds_in_frame(&self, frame: &Rot2) -> Aabb {
        match &self.shape {
            Some(shape) => shape.bounds_in_frame(frame, &self.transform),
            None => {
                let p = frame.rotate_vector(self.transform.position);
                Aabb::new(p, p)
            }
        }
    }

    /// Updates the body's mass properties based on its shape and material
    pub fn update_mass_properties(&mut self) {
        self.mass = 1.0;
        self.inv_mass = 1.0;
        self.inertia = 1.0;
        self.inv_inertia = 1.0;

        if let Some(shape) = &self.shape {
            if self.body_type == RigidBodyType::Dynamic {
                self.mass = shape.area() * self.material.density;

                if self.mass > 0.0 {
                    self.inv_mass = 1.0 / self.mass;
                } else {
                    self.inv_mass = 0.0;
                }

                self.inertia = shape.moment_of_inertia(self.mass);

                if self.inertia > 0.0 {
                    self.inv_inertia = 1.0 / self.inertia;
                } else {
                    self.inv_inertia = 0.0;
                }
            } else {
                // Non-dynamic bodies have infinite mass and zero inverse mass/inertia
                self.mass = 0.0;
                self.inv_mass = 0.0;
                self.inertia = 0.0;
                self.inv_inertia = 0.0;
            }
        }
    }

    /// Applies a force to the body
    pub fn apply_force(&mut self, force: Vector2) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::Force(force));
        }
    }

    /// Applies a force at a specific point
    pub fn apply_force_at_point(&mut self, force: Vector2, point: Vector2) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::ForceAtPoint { force, point });
        }
    }

    /// Applies a torque to the body
    pub fn apply_torque(&mut self, torque: f32) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::Torque(torque));
        }
    }

    /// Applies an impulse to the body
    pub fn apply_impulse(&mut self, impulse: Vector2) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::Impulse(impulse));
        }
    }

    /// Applies an impulse at a specific point
    pub fn apply_impulse_at_point(&mut self, impulse: Vector2, point: Vector2) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::ImpulseAtPoint { impulse, point });
        }
    }

    /// Applies an angular impulse to the body
    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        if self.body_type == RigidBodyType::Dynamic {
            if self.is_sleeping() {
                self.wake_up();
            }
            self.forces.push(ForceType::AngularImpulse(impulse));
        }
    }

    /// Applies damping to the body's velocities
    pub fn apply_damping(&mut self, linear_damping: f32, angular_damping: f32) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }

        let linear_factor = 1.0 - (self.linear_damping + linear_damping).clamp(0.0, 1.0);
        self.linear_velocity *= linear_factor;

        let angular_factor = 1.0 - (self.angular_damping + angular_damping).clamp(0.0, 1.0);
        self.angular_velocity *= angular_factor;
    }

    /// Integrates accumulated forces to update velocities
    pub fn integrate_forces(&mut self, dt: f32) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }

        for force in &self.forces {
            match force {
                ForceType::Force(force) => {
                    self.linear_velocity += *force * self.inv_mass * dt;
                }
                ForceType::ForceAtPoint { force, point } => {
                    self.linear_velocity += *force * self.inv_mass * dt;

                    // τ = r × F
                    let r = *point - self.transform.position;
                    let torque = r.cross(force);
                    self.angular_velocity += torque * self.inv_inertia * dt;
                }
                ForceType::Torque(torque) => {
                    self.angular_velocity += torque * self.inv_inertia * dt;
                }
                ForceType::Impulse(impulse) => {
                    self.linear_velocity += *impulse * self.inv_mass;
                }
                ForceType::ImpulseAtPoint { impulse, point } => {
                    self.linear_velocity += *impulse * self.inv_mass;

                    let r = *point - self.transform.position;
                    self.angular_velocity += r.cross(impulse) * self.inv_inertia;
                }
                ForceType::AngularImpulse(impulse) => {
                    self.angular_velocity += impulse * self.inv_inertia;
                }
            }
        }

        self.forces.clear();
    }

    /// Integrates velocities to update the position and orientation
    pub fn integrate_velocity(&mut self, dt: f32) {
        if self.body_type != RigidBodyType::Dynamic || self.is_sleeping() {
            return;
        }

        self.transform.position += self.linear_velocity * dt;

        if self.angular_velocity != 0.0 {
            let angle = self.transform.angle() + self.angular_velocity * dt;
            self.transform.set_angle(angle);
        }
    }
}
