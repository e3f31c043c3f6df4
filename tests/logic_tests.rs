use approx::assert_relative_eq;
use impulse2d::logics::{is_active_on, GravityLogic, LogicCategory, PhysicsLogic, PointGravityLogic};
use impulse2d::shapes::Circle;
use impulse2d::{PhysicsWorld, RigidBody, Vector2};
use std::sync::Arc;

fn dynamic_ball(position: Vector2) -> RigidBody {
    RigidBody::new_dynamic(Arc::new(Circle::new(0.5)), position)
}

#[test]
fn category_mask_gates_logic_activity() {
    let mut logic = GravityLogic::new(Vector2::new(0.0, -9.81));
    logic.set_category(LogicCategory::CAT03);

    let mut ignoring_body = dynamic_ball(Vector2::zero());
    ignoring_body.set_logic_ignore_mask(LogicCategory::CAT03);
    assert!(!is_active_on(&logic, &ignoring_body));

    let plain_body = dynamic_ball(Vector2::zero());
    assert!(is_active_on(&logic, &plain_body));

    // Ignoring a different category leaves the logic active
    let mut other_mask_body = dynamic_ball(Vector2::zero());
    other_mask_body.set_logic_ignore_mask(LogicCategory::CAT04 | LogicCategory::CAT07);
    assert!(is_active_on(&logic, &other_mask_body));
}

#[test]
fn logic_exempt_bodies_are_never_active() {
    let logic = GravityLogic::new(Vector2::new(0.0, -9.81));

    let mut body = dynamic_ball(Vector2::zero());
    body.set_ignores_physics_logics(true);
    assert!(!is_active_on(&logic, &body));
}

#[test]
fn gravity_scales_with_the_time_delta() {
    let mut world = PhysicsWorld::new();
    world.add_logic(Box::new(GravityLogic::new(Vector2::new(0.0, -9.81))));

    let body = world.add_body(dynamic_ball(Vector2::zero()));

    let dt = 1.0 / 60.0;
    world.step(dt).unwrap();

    let velocity = world.get_body(body).unwrap().get_linear_velocity();
    assert_relative_eq!(velocity.y, -9.81 * dt, max_relative = 1e-4);
    assert_relative_eq!(velocity.x, 0.0);
}

#[test]
fn disabling_a_logic_makes_it_a_no_op_without_unregistering() {
    let mut world = PhysicsWorld::new();
    let index = world.add_logic(Box::new(GravityLogic::new(Vector2::new(0.0, -9.81))));

    let body = world.add_body(dynamic_ball(Vector2::zero()));

    world.get_logic_mut(index).unwrap().set_enabled(false);
    world.step(1.0 / 60.0).unwrap();

    assert_eq!(
        world.get_body(body).unwrap().get_linear_velocity(),
        Vector2::zero()
    );
    assert_eq!(world.logic_count(), 1);

    // Re-enabling is cheap: the next step applies the effect again
    world.get_logic_mut(index).unwrap().set_enabled(true);
    world.step(1.0 / 60.0).unwrap();

    assert!(world.get_body(body).unwrap().get_linear_velocity().y < 0.0);
}

#[test]
fn gravity_respects_the_per_body_flag() {
    let mut world = PhysicsWorld::new();
    world.add_logic(Box::new(GravityLogic::new(Vector2::new(0.0, -9.81))));

    let mut floating_body = dynamic_ball(Vector2::zero());
    floating_body.set_affected_by_gravity(false);
    let floating = world.add_body(floating_body);

    let falling = world.add_body(dynamic_ball(Vector2::new(100.0, 0.0)));

    world.step(1.0 / 60.0).unwrap();

    assert_eq!(
        world.get_body(floating).unwrap().get_linear_velocity(),
        Vector2::zero()
    );
    assert!(world.get_body(falling).unwrap().get_linear_velocity().y < 0.0);
}

#[test]
fn point_gravity_pulls_toward_the_source() {
    let mut world = PhysicsWorld::new();
    world.add_logic(Box::new(PointGravityLogic::new(
        Vector2::new(10.0, 0.0),
        100.0,
    )));

    let body = world.add_body(dynamic_ball(Vector2::zero()));

    world.step(1.0 / 60.0).unwrap();

    let velocity = world.get_body(body).unwrap().get_linear_velocity();
    assert!(velocity.x > 0.0);
    assert_relative_eq!(velocity.y, 0.0);
}
