use crate::bodies::RigidBody;
use crate::logics::{LogicCategory, PhysicsLogic};
use crate::math::Vector2;
use std::any::Any;

/// A logic that applies a constant gravity acceleration to bodies
#[derive(Debug, Clone)]
pub struct GravityLogic {
    /// The gravity acceleration vector
    gravity: Vector2,

    /// The category of the logic
    category: LogicCategory,

    /// Whether the logic is enabled
    enabled: bool,
}

impl GravityLogic {
    /// Creates a new gravity logic with the given acceleration
    pub fn new(gravity: Vector2) -> Self {
        Self {
            gravity,
            category: LogicCategory::CAT01,
            enabled: true,
        }
    }

    /// Creates a new gravity logic with Earth-like gravity (-9.81 in y direction)
    pub fn new_earth_gravity() -> Self {
        Self::new(Vector2::new(0.0, -9.81))
    }

    /// Gets the current gravity acceleration
    pub fn get_gravity(&self) -> Vector2 {
        self.gravity
    }

    /// Sets the gravity acceleration vector
    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.gravity = gravity;
    }

    /// Sets the category of the logic
    pub fn set_category(&mut self, category: LogicCategory) {
        self.category = category;
    }
}

impl PhysicsLogic for GravityLogic {
    fn logic_type(&self) -> &'static str {
        "Gravity"
    }

    fn category(&self) -> LogicCategory {
        self.category
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn extra_check(&self, body: &RigidBody) -> bool {
        body.is_affected_by_gravity()
    }

    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        // Immovable bodies cannot accelerate
        if body.get_inverse_mass() == 0.0 {
            return;
        }

        // F = m * g
        let force = self.gravity * body.get_mass();
        body.apply_force(force);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A logic that pulls bodies toward a point with inverse-square falloff
#[derive(Debug, Clone)]
pub struct PointGravityLogic {
    /// The position of the gravity source
    position: Vector2,

    /// The strength of the gravity source
    strength: f32,

    /// The category of the logic
    category: LogicCategory,

    /// Whether the logic is enabled
    enabled: bool,
}

impl PointGravityLogic {
    /// Creates a new point gravity logic
    pub fn new(position: Vector2, strength: f32) -> Self {
        Self {
            position,
            strength,
            category: LogicCategory::CAT01,
            enabled: true,
        }
    }

    /// Gets the position of the gravity source
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the position of the gravity source
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Gets the strength of the gravity source
    pub fn get_strength(&self) -> f32 {
        self.strength
    }

    /// Sets the strength of the gravity source
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// Sets the category of the logic
    pub fn set_category(&mut self, category: LogicCategory) {
        self.category = category;
    }
}

impl PhysicsLogic for PointGravityLogic {
    fn logic_type(&self) -> &'static str {
        "PointGravity"
    }

    fn category(&self) -> LogicCategory {
        self.category
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn extra_check(&self, body: &RigidBody) -> bool {
        body.is_affected_by_gravity()
    }

    fn apply(&mut self, body: &mut RigidBody, _dt: f32) {
        if body.get_inverse_mass() == 0.0 {
            return;
        }

        let to_source = self.position - body.get_position();
        let distance_sq = to_source.length_squared();
        if distance_sq <= crate::math::EPSILON {
            return;
        }

        let distance = distance_sq.sqrt();
        let direction = to_source / distance;
        let force = direction * (self.strength * body.get_mass() / distance_sq);
        body.apply_force(force);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
