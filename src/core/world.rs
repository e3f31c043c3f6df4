use crate::bodies::{RigidBody, RigidBodyType};
use crate::collision;
use crate::core::events::{BodyEvent, BodyEventType};
use crate::core::island::IslandBuilder;
use crate::core::{
    BodyHandle, BodyStorage, EventQueue, Island, JointHandle, JointStorage, SimulationConfig,
    SolverStep, StepContext, Storage,
};
use crate::ignorers::{self, Ignorer, IgnorerMap};
use crate::joints::Joint;
use crate::logics::{self, PhysicsLogic};
use crate::math::Transform;
use crate::Result;
use log::{debug, warn};
use std::collections::HashSet;

/// The main physics world that owns all bodies, joints, logics and
/// ignorers, and drives the per-step solver pipeline.
///
/// Within one step the pipeline order is load-bearing: logics apply
/// before constraint solving, which applies before integration, which
/// applies before position correction.
pub struct PhysicsWorld {
    /// All rigid bodies in the world
    bodies: BodyStorage<RigidBody>,

    /// All joints in the world
    joints: JointStorage<Box<dyn Joint>>,

    /// All physics logics, applied in registration order
    logics: Vec<Box<dyn PhysicsLogic>>,

    /// Collision ignorers attached to bodies
    ignorers: IgnorerMap,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Queue of physics events
    events: EventQueue,

    /// The total elapsed simulation time
    time: f32,

    /// Number of completed substeps, used to scope per-step caches
    update_count: u64,

    /// Pairs that overlapped in the previous step
    active_pairs: HashSet<(BodyHandle, BodyHandle)>,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            joints: JointStorage::new(),
            logics: Vec::new(),
            ignorers: IgnorerMap::new(),
            config,
            events: EventQueue::new(),
            time: 0.0,
            update_count: 0,
            active_pairs: HashSet::new(),
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the simulation configuration
    pub fn get_config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Returns the step context of the current update.
    ///
    /// Filter queries outside of a step use this context; its counter
    /// advances once per substep.
    pub fn step_context(&self) -> StepContext {
        StepContext {
            update_count: self.update_count,
        }
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.add(body);
        debug!("Added body {:?}", handle);

        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Added,
            body: handle,
        });

        handle
    }

    /// Removes a rigid body from the world.
    ///
    /// Joints referencing the body and the body's ignorer are removed
    /// with it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        // Ensure the handle is alive before tearing anything down
        self.bodies.get_body(handle)?;

        let joint_handles: Vec<JointHandle> = self
            .joints
            .iter()
            .filter_map(|(j_handle, joint)| {
                if joint.involves_body(handle) {
                    Some(j_handle)
                } else {
                    None
                }
            })
            .collect();

        for j_handle in joint_handles {
            let _ = self.remove_joint(j_handle);
        }

        self.ignorers.remove(&handle);
        self.active_pairs
            .retain(|&(a, b)| a != handle && b != handle);

        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Removed,
            body: handle,
        });

        debug!("Removed body {:?}", handle);
        Ok(self.bodies.remove(handle).expect("body checked above"))
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Returns a reference to the body storage
    pub fn get_bodies(&self) -> &BodyStorage<RigidBody> {
        &self.bodies
    }

    /// Gets the transform of a rigid body
    pub fn get_transform(&self, handle: BodyHandle) -> Result<Transform> {
        Ok(self.bodies.get_body(handle)?.get_transform())
    }

    /// Sets the transform of a rigid body and wakes it
    pub fn set_transform(&mut self, handle: BodyHandle, transform: Transform) -> Result<()> {
        let body = self.bodies.get_body_mut(handle)?;
        body.set_transform(transform);

        if body.is_sleeping() {
            body.wake_up();

            self.events.add_body_event(BodyEvent {
                event_type: BodyEventType::Awake,
                body: handle,
            });
        }

        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::TransformChanged,
            body: handle,
        });

        Ok(())
    }

    /// Adds a joint to the world and returns its handle.
    ///
    /// The bodies involved in the joint are woken.
    pub fn add_joint(&mut self, joint: Box<dyn Joint>) -> JointHandle {
        for &body_handle in joint.get_bodies() {
            if let Ok(body) = self.bodies.get_body_mut(body_handle) {
                if body.is_sleeping() {
                    body.wake_up();

                    self.events.add_body_event(BodyEvent {
                        event_type: BodyEventType::Awake,
                        body: body_handle,
                    });
                }
            }
        }

        let handle = self.joints.add(joint);
        debug!("Added joint {:?}", handle);
        handle
    }

    /// Removes a joint from the world, waking the bodies it connected
    pub fn remove_joint(&mut self, handle: JointHandle) -> Result<Box<dyn Joint>> {
        let joint = self.joints.get_joint(handle)?;

        let body_handles: Vec<BodyHandle> = joint.get_bodies().to_vec();
        for body_handle in body_handles {
            if let Ok(body) = self.bodies.get_body_mut(body_handle) {
                if body.is_sleeping() {
                    body.wake_up();

                    self.events.add_body_event(BodyEvent {
                        event_type: BodyEventType::Awake,
                        body: body_handle,
                    });
                }
            }
        }

        debug!("Removed joint {:?}", handle);
        Ok(self.joints.remove(handle).expect("joint checked above"))
    }

    /// Gets a reference to a joint by its handle
    pub fn get_joint(&self, handle: JointHandle) -> Result<&Box<dyn Joint>> {
        self.joints.get_joint(handle)
    }

    /// Gets a mutable reference to a joint by its handle
    pub fn get_joint_mut(&mut self, handle: JointHandle) -> Result<&mut Box<dyn Joint>> {
        self.joints.get_joint_mut(handle)
    }

    /// Adds a physics logic and returns its registration index
    pub fn add_logic(&mut self, logic: Box<dyn PhysicsLogic>) -> usize {
        debug!("Added logic {:?}", logic.logic_type());
        self.logics.push(logic);
        self.logics.len() - 1
    }

    /// Removes a physics logic by its registration index
    pub fn remove_logic(&mut self, index: usize) -> Option<Box<dyn PhysicsLogic>> {
        if index < self.logics.len() {
            Some(self.logics.remove(index))
        } else {
            None
        }
    }

    /// Returns a logic by its registration index
    pub fn get_logic(&self, index: usize) -> Option<&dyn PhysicsLogic> {
        self.logics.get(index).map(|l| l.as_ref())
    }

    /// Returns a mutable logic by its registration index
    pub fn get_logic_mut(&mut self, index: usize) -> Option<&mut (dyn PhysicsLogic + 'static)> {
        self.logics.get_mut(index).map(|l| l.as_mut())
    }

    /// Returns the number of registered logics
    pub fn logic_count(&self) -> usize {
        self.logics.len()
    }

    /// Attaches a collision ignorer to a body, replacing any previous one
    pub fn set_ignorer(&mut self, handle: BodyHandle, ignorer: Box<dyn Ignorer>) -> Result<()> {
        self.bodies.get_body(handle)?;
        self.ignorers.insert(handle, ignorer);
        Ok(())
    }

    /// Removes the collision ignorer of a body
    pub fn remove_ignorer(&mut self, handle: BodyHandle) -> Option<Box<dyn Ignorer>> {
        self.ignorers.remove(&handle)
    }

    /// Returns the collision ignorer of a body
    pub fn get_ignorer(&self, handle: BodyHandle) -> Option<&dyn Ignorer> {
        self.ignorers.get(&handle).map(|i| i.as_ref())
    }

    /// Returns a mutable reference to the collision ignorer of a body
    pub fn get_ignorer_mut(&mut self, handle: BodyHandle) -> Option<&mut (dyn Ignorer + 'static)> {
        self.ignorers.get_mut(&handle).map(|i| i.as_mut())
    }

    /// Returns whether two bodies may collide under the current ignorers
    pub fn can_collide(&mut self, a: BodyHandle, b: BodyHandle) -> bool {
        let ctx = self.step_context();
        ignorers::can_collide(&self.bodies, &mut self.ignorers, a, b, &ctx)
    }

    /// Runs the physics simulation for the given time step.
    ///
    /// The step is divided into substeps no longer than the configured
    /// fixed time step. Errors (e.g. a degenerate joint configuration)
    /// abort the step and must be treated as fatal to it.
    pub fn step(&mut self, time_step: f32) -> Result<()> {
        self.events.clear();

        let fixed_step = self.config.time_step;
        let max_steps = self.config.max_substeps;

        let mut remaining_time = time_step;
        let mut steps = 0;

        while remaining_time > 0.0 && steps < max_steps {
            let dt = fixed_step.min(remaining_time);

            self.step_simulation(dt)?;

            remaining_time -= dt;
            steps += 1;
        }

        self.time += time_step;
        Ok(())
    }

    /// Performs a single substep of the physics simulation
    fn step_simulation(&mut self, dt: f32) -> Result<()> {
        self.update_count += 1;
        let ctx = StepContext {
            update_count: self.update_count,
        };
        let step = SolverStep::new(dt);

        // Joints with a destroyed endpoint are invalid and must go before
        // the constraint build
        let stale: Vec<JointHandle> = self
            .joints
            .iter()
            .filter(|(_, joint)| {
                joint
                    .get_bodies()
                    .iter()
                    .any(|&b| self.bodies.get(b).is_none())
            })
            .map(|(handle, _)| handle)
            .collect();
        for handle in stale {
            warn!("Removing joint {:?} with a destroyed endpoint body", handle);
            self.joints.remove(handle);
        }

        // Apply physics logics
        for logic in self.logics.iter_mut() {
            if !logic.is_enabled() {
                continue;
            }

            logic.update(dt);

            for (_, body) in self.bodies.iter_mut() {
                if body.is_sleeping() {
                    continue;
                }
                if !logics::is_active_on(&**logic, body) {
                    continue;
                }
                logic.apply(body, dt);
            }
        }

        // Integrate forces to update velocities
        let linear_damping = self.config.linear_damping;
        let angular_damping = self.config.angular_damping;
        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() == RigidBodyType::Static || body.is_sleeping() {
                continue;
            }

            body.apply_damping(linear_damping, angular_damping);
            body.integrate_forces(dt);
        }

        // Build islands and assign the transient island indices
        let islands = self.build_islands();

        // Refresh joint solver state and run the velocity iterations
        for (_, joint) in self.joints.iter_mut() {
            joint.init_velocity_constraints(&step, &mut self.bodies)?;
        }
        for _ in 0..self.config.velocity_iterations {
            for (_, joint) in self.joints.iter_mut() {
                joint.solve_velocity_constraints(&step, &mut self.bodies);
            }
        }

        // Integrate velocities to update positions
        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() == RigidBodyType::Static || body.is_sleeping() {
                continue;
            }

            body.integrate_velocity(dt);
        }

        // Detect collisions through the ignorer chain
        collision::detect_collisions(
            &self.bodies,
            &mut self.ignorers,
            &ctx,
            &mut self.active_pairs,
            &mut self.events,
        );

        // Resolve remaining position error
        for _ in 0..self.config.position_iterations {
            let mut converged = true;
            for (_, joint) in self.joints.iter_mut() {
                converged &= joint.solve_position_constraints(&step, &mut self.bodies);
            }
            if converged {
                break;
            }
        }

        // Handle sleeping per island
        if self.config.allow_sleeping {
            self.update_sleeping(&islands, dt);
        }

        // Island indices are only valid during the solve pass
        for (_, body) in self.bodies.iter_mut() {
            body.set_island_index(None);
        }

        Ok(())
    }

    /// Builds islands of connected bodies and joints
    fn build_islands(&mut self) -> Vec<Island> {
        let mut builder = IslandBuilder::new();

        for (handle, joint) in self.joints.iter() {
            let joint_bodies = joint.get_bodies();
            match joint_bodies.len() {
                2 => builder.add_connection(joint_bodies[0], joint_bodies[1], handle),
                1 => builder.add_anchored_joint(joint_bodies[0], handle),
                _ => {}
            }
        }

        for (handle, body) in self.bodies.iter() {
            if body.get_body_type() == RigidBodyType::Dynamic {
                builder.add_single_body(handle);
            }
        }

        let (islands, body_to_island) = builder.build();

        for (handle, index) in body_to_island {
            if let Ok(body) = self.bodies.get_body_mut(handle) {
                body.set_island_index(Some(index));
            }
        }

        islands
    }

    /// Puts islands of slow bodies to sleep and tracks inactivity time
    fn update_sleeping(&mut self, islands: &[Island], dt: f32) {
        let linear_threshold_sq = self.config.linear_sleep_threshold.powi(2);
        let angular_threshold = self.config.angular_sleep_threshold;

        for island in islands {
            let mut can_sleep = true;
            let mut min_sleeping_time = f32::MAX;

            for &handle in &island.bodies {
                if let Some(body) = self.bodies.get(handle) {
                    if body.get_body_type() != RigidBodyType::Dynamic {
                        continue;
                    }

                    if !body.can_sleep()
                        || body.get_linear_velocity().length_squared() > linear_threshold_sq
                        || body.get_angular_velocity().abs() > angular_threshold
                    {
                        can_sleep = false;
                        break;
                    }

                    min_sleeping_time = min_sleeping_time.min(body.get_sleeping_time());
                }
            }

            if can_sleep {
                let new_time = if min_sleeping_time == f32::MAX {
                    dt
                } else {
                    min_sleeping_time + dt
                };

                if new_time >= self.config.sleep_time_threshold {
                    for &handle in &island.bodies {
                        if let Ok(body) = self.bodies.get_body_mut(handle) {
                            if body.get_body_type() == RigidBodyType::Dynamic
                                && !body.is_sleeping()
                            {
                                body.put_to_sleep();

                                self.events.add_body_event(BodyEvent {
                                    event_type: BodyEventType::Sleep,
                                    body: handle,
                                });
                            }
                        }
                    }
                } else {
                    for &handle in &island.bodies {
                        if let Ok(body) = self.bodies.get_body_mut(handle) {
                            if body.get_body_type() == RigidBodyType::Dynamic {
                                body.set_sleeping_time(new_time);
                            }
                        }
                    }
                }
            } else {
                for &handle in &island.bodies {
                    if let Ok(body) = self.bodies.get_body_mut(handle) {
                        if body.get_body_type() == RigidBodyType::Dynamic {
                            body.set_sleeping_time(0.0);
                        }
                    }
                }
            }
        }
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Clears the world of all bodies, joints, logics and ignorers
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.joints.clear();
        self.logics.clear();
        self.ignorers.clear();
        self.events.clear();
        self.active_pairs.clear();
        self.time = 0.0;
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of joints in the world
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
