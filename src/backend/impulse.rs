use crate::backend::client::{build_shape, BodyShape, PhysicsClient};
use crate::bodies::RigidBody;
use crate::core::{BodyHandle, JointHandle, PhysicsWorld};
use crate::joints::{AngleJoint, AxleJoint};
use crate::logics::{GravityLogic, PhysicsLogic};
use crate::math::Vector2;
use crate::shapes::Shape;
use crate::Result;
use std::sync::Arc;

/// The full constraint-solver backend over [`PhysicsWorld`]
pub struct ImpulseClient {
    /// The solver world
    world: PhysicsWorld,

    /// Registration index of the backend's gravity logic
    gravity_logic: usize,
}

impl ImpulseClient {
    /// Creates a new backend with zero gravity
    pub fn new() -> Self {
        let mut world = PhysicsWorld::new();
        let gravity_logic = world.add_logic(Box::new(GravityLogic::new(Vector2::zero())));

        Self {
            world,
            gravity_logic,
        }
    }

    /// Returns a reference to the underlying world
    pub fn get_world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Returns a mutable reference to the underlying world
    pub fn get_world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    fn gravity_logic(&self) -> Option<&GravityLogic> {
        self.world
            .get_logic(self.gravity_logic)
            .and_then(|l| l.as_any().downcast_ref::<GravityLogic>())
    }

    fn gravity_logic_mut(&mut self) -> Option<&mut GravityLogic> {
        self.world
            .get_logic_mut(self.gravity_logic)
            .and_then(|l| l.as_any_mut().downcast_mut::<GravityLogic>())
    }
}

impl Default for ImpulseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsClient for ImpulseClient {
    fn backend_name(&self) -> &'static str {
        "impulse"
    }

    fn get_gravity(&self) -> Vector2 {
        self.gravity_logic()
            .map(|l| l.get_gravity())
            .unwrap_or_else(Vector2::zero)
    }

    fn set_gravity(&mut self, gravity: Vector2) {
        if let Some(logic) = self.gravity_logic_mut() {
            logic.set_gravity(gravity);
        }
    }

    fn create_body(&mut self, width: f32, height: f32, shape: BodyShape) -> Result<BodyHandle> {
        let shape = build_shape(width, height, shape)?;
        let body = RigidBody::new_dynamic(shape, Vector2::zero());
        Ok(self.world.add_body(body))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.world.remove_body(handle).map(|_| ())
    }

    fn create_axle_joint(
        &mut self,
        body_a: BodyHandle,
        body_b: Option<BodyHandle>,
        pivot: Vector2,
    ) -> Result<JointHandle> {
        let joint = match body_b {
            Some(body_b) => AxleJoint::new(self.world.get_bodies(), body_a, body_b, pivot)?,
            None => AxleJoint::new_world_anchored(self.world.get_bodies(), body_a, pivot)?,
        };

        Ok(self.world.add_joint(Box::new(joint)))
    }

    fn create_angle_joint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        target_angle: f32,
    ) -> Result<JointHandle> {
        // Validate the handles up front so a stale one fails here, not
        // during the next step
        self.world.get_body(body_a)?;
        self.world.get_body(body_b)?;

        let mut joint = AngleJoint::new(body_a, body_b);
        joint.set_target_angle(target_angle);

        Ok(self.world.add_joint(Box::new(joint)))
    }

    fn remove_joint(&mut self, handle: JointHandle) -> Result<()> {
        self.world.remove_joint(handle).map(|_| ())
    }

    fn update(&mut self, dt: f32) -> Result<()> {
        self.world.step(dt)
    }

    fn clear(&mut self) {
        self.world.clear();
        self.gravity_logic = self
            .world
            .add_logic(Box::new(GravityLogic::new(Vector2::zero())));
    }

    fn get_position(&self, handle: BodyHandle) -> Result<Vector2> {
        Ok(self.world.get_body(handle)?.get_position())
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vector2) -> Result<()> {
        self.world.get_body_mut(handle)?.set_position(position);
        Ok(())
    }

    fn get_velocity(&self, handle: BodyHandle) -> Result<Vector2> {
        Ok(self.world.get_body(handle)?.get_linear_velocity())
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()> {
        self.world.get_body_mut(handle)?.set_linear_velocity(velocity);
        Ok(())
    }

    fn get_mass(&self, handle: BodyHandle) -> Result<f32> {
        Ok(self.world.get_body(handle)?.get_mass())
    }

    fn set_mass(&mut self, handle: BodyHandle, mass: f32) -> Result<()> {
        self.world.get_body_mut(handle)?.set_mass(mass);
        Ok(())
    }

    fn get_shape(&self, handle: BodyHandle) -> Result<Arc<dyn Shape>> {
        self.world
            .get_body(handle)?
            .get_shape()
            .cloned()
            .ok_or_else(|| {
                crate::error::PhysicsError::ResourceNotFound(
                    "Body has no collision shape".to_string(),
                )
            })
    }
}
