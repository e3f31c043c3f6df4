use crate::backend::client::{build_shape, BodyShape, PhysicsClient};
use crate::bodies::{RigidBody, RigidBodyType};
use crate::core::{BodyHandle, BodyStorage, JointHandle, Storage};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::shapes::Shape;
use crate::Result;
use std::sync::Arc;

/// A minimal reference backend: gravity and integration only.
///
/// Joints are not supported; every joint operation reports an
/// unsupported-operation error at the call site.
pub struct MinimalClient {
    /// All bodies of the backend
    bodies: BodyStorage<RigidBody>,

    /// The gravity acceleration
    gravity: Vector2,
}

impl MinimalClient {
    /// Creates a new minimal backend with zero gravity
    pub fn new() -> Self {
        Self {
            bodies: BodyStorage::new(),
            gravity: Vector2::zero(),
        }
    }

    fn unsupported() -> PhysicsError {
        PhysicsError::Unsupported(
            "Joints are not implemented in the minimal backend".to_string(),
        )
    }
}

impl Default for MinimalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsClient for MinimalClient {
    fn backend_name(&self) -> &'static str {
        "minimal"
    }

    fn get_gravity(&self) -> Vector2 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vector2) {
        self.gravity = gravity;
    }

    fn create_body(&mut self, width: f32, height: f32, shape: BodyShape) -> Result<BodyHandle> {
        let shape = build_shape(width, height, shape)?;
        let body = RigidBody::new_dynamic(shape, Vector2::zero());
        Ok(self.bodies.add(body))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies.remove(handle).map(|_| ()).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }

    fn create_axle_joint(
        &mut self,
        _body_a: BodyHandle,
        _body_b: Option<BodyHandle>,
        _pivot: Vector2,
    ) -> Result<JointHandle> {
        Err(Self::unsupported())
    }

    fn create_angle_joint(
        &mut self,
        _body_a: BodyHandle,
        _body_b: BodyHandle,
        _target_angle: f32,
    ) -> Result<JointHandle> {
        Err(Self::unsupported())
    }

    fn remove_joint(&mut self, _handle: JointHandle) -> Result<()> {
        Err(Self::unsupported())
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        let gravity = self.gravity;

        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() != RigidBodyType::Dynamic {
                continue;
            }

            if body.is_affected_by_gravity() && !body.ignores_physics_logics() {
                let force = gravity * body.get_mass();
                body.apply_force(force);
            }

            body.integrate_forces(dt);
            body.integrate_velocity(dt);
        }

        Ok(())
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn get_position(&self, handle: BodyHandle) -> Result<Vector2> {
        Ok(self.bodies.get_body(handle)?.get_position())
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vector2) -> Result<()> {
        self.bodies.get_body_mut(handle)?.set_position(position);
        Ok(())
    }

    fn get_velocity(&self, handle: BodyHandle) -> Result<Vector2> {
        Ok(self.bodies.get_body(handle)?.get_linear_velocity())
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()> {
        self.bodies
            .get_body_mut(handle)?
            .set_linear_velocity(velocity);
        Ok(())
    }

    fn get_mass(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.bodies.get_body(handle)?.get_mass())
    }

    fn set_mass(&mut self, handle: BodyHandle, mass: f32) -> Result<()> {
        self.bodies.get_body_mut(handle)?.set_mass(mass);
        Ok(())
    }

    fn get_shape(&self, handle: BodyHandle) -> Result<Arc<dyn Shape>> {
        self.bodies
            .get_body(handle)?
            .get_shape()
            .cloned()
            .ok_or_else(|| {
                PhysicsError::ResourceNotFound("Body has no collision shape".to_string())
            })
    }
}
