use impulse2d::joints::{AxleJoint, Joint};
use impulse2d::logics::GravityLogic;
use impulse2d::shapes::Circle;
use impulse2d::{PhysicsWorld, RigidBody, Vector2};
use std::sync::Arc;

fn dynamic_ball(position: Vector2) -> RigidBody {
    RigidBody::new_dynamic(Arc::new(Circle::new(0.5)), position)
}

#[test]
fn world_anchored_axle_holds_the_pivot_distance() {
    let mut world = PhysicsWorld::new();
    world.add_logic(Box::new(GravityLogic::new(Vector2::new(0.0, -10.0))));

    let body = world.add_body(dynamic_ball(Vector2::new(1.0, 0.0)));
    let joint = AxleJoint::new_world_anchored(world.get_bodies(), body, Vector2::zero()).unwrap();
    let joint = world.add_joint(Box::new(joint));

    let dt = 1.0 / 60.0;
    for _ in 0..180 {
        world.step(dt).unwrap();
    }

    // The pendulum swings, but its anchor stays at the world pivot
    let anchor = world
        .get_joint(joint)
        .unwrap()
        .world_anchor_a(world.get_bodies())
        .unwrap();
    assert!(
        anchor.length() < 0.1,
        "anchor drifted to {} after 3 seconds",
        anchor
    );

    // And the body actually moved under gravity
    let position = world.get_body(body).unwrap().get_position();
    assert!(position.y < -0.1);
}

#[test]
fn axle_motor_drives_the_relative_angular_velocity() {
    let mut world = PhysicsWorld::new();

    let anchor = world.add_body(RigidBody::new_static(
        Arc::new(Circle::new(0.5)),
        Vector2::zero(),
    ));
    let wheel = world.add_body(dynamic_ball(Vector2::zero()));

    let mut joint = AxleJoint::new(world.get_bodies(), anchor, wheel, Vector2::zero()).unwrap();
    joint.enable_motor(5.0, 1000.0);
    world.add_joint(Box::new(joint));

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        world.step(dt).unwrap();
    }

    let angular_velocity = world.get_body(wheel).unwrap().get_angular_velocity();
    assert!(
        (angular_velocity - 5.0).abs() < 0.1,
        "motor reached {} rad/s",
        angular_velocity
    );
}

#[test]
fn axle_motor_torque_limits_the_spin_up() {
    let mut world = PhysicsWorld::new();

    let anchor = world.add_body(RigidBody::new_static(
        Arc::new(Circle::new(0.5)),
        Vector2::zero(),
    ));
    let wheel = world.add_body(dynamic_ball(Vector2::zero()));

    let max_motor_torque = 0.01;
    let mut joint = AxleJoint::new(world.get_bodies(), anchor, wheel, Vector2::zero()).unwrap();
    joint.enable_motor(100.0, max_motor_torque);
    world.add_joint(Box::new(joint));

    let dt = 1.0 / 60.0;
    let inv_inertia = world.get_body(wheel).unwrap().get_inverse_inertia();

    world.step(dt).unwrap();

    // Per substep the motor impulse is clamped to max torque times dt
    let angular_velocity = world.get_body(wheel).unwrap().get_angular_velocity();
    assert!(angular_velocity.abs() <= inv_inertia * max_motor_torque * dt * 1.0001);
    assert!(angular_velocity.abs() > 0.0);
}

#[test]
fn axle_anchors_are_settable() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(2.0, 0.0)));

    let mut joint = AxleJoint::new(world.get_bodies(), a, b, Vector2::new(1.0, 0.0)).unwrap();
    assert_eq!(
        joint.world_anchor_a(world.get_bodies()).unwrap(),
        Vector2::new(1.0, 0.0)
    );

    joint
        .set_world_anchor_a(world.get_bodies(), Vector2::new(0.5, 0.0))
        .unwrap();
    assert_eq!(
        joint.world_anchor_a(world.get_bodies()).unwrap(),
        Vector2::new(0.5, 0.0)
    );
}
