use impulse2d::core::events::{BodyEventType, CollisionEventType};
use impulse2d::ignorers::GroupIgnorer;
use impulse2d::joints::AngleJoint;
use impulse2d::shapes::Circle;
use impulse2d::{PhysicsWorld, RigidBody, Vector2};
use std::sync::Arc;

fn dynamic_ball(position: Vector2) -> RigidBody {
    RigidBody::new_dynamic(Arc::new(Circle::new(0.5)), position)
}

#[test]
fn removing_a_body_removes_its_joints() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(5.0, 0.0)));
    world.add_joint(Box::new(AngleJoint::new(a, b)));

    assert_eq!(world.joint_count(), 1);

    world.remove_body(b).unwrap();

    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.body_count(), 1);

    // The next step must run cleanly without the stale pair
    world.step(1.0 / 60.0).unwrap();
}

#[test]
fn idle_bodies_fall_asleep_and_wake_on_velocity_change() {
    let mut world = PhysicsWorld::new();

    let body = world.add_body(dynamic_ball(Vector2::zero()));

    let dt = 1.0 / 60.0;
    for _ in 0..90 {
        world.step(dt).unwrap();
    }

    assert!(world.get_body(body).unwrap().is_sleeping());

    world
        .get_body_mut(body)
        .unwrap()
        .set_linear_velocity(Vector2::new(1.0, 0.0));

    assert!(!world.get_body(body).unwrap().is_sleeping());
}

#[test]
fn sleep_can_be_disabled_per_body() {
    let mut world = PhysicsWorld::new();

    let mut restless_body = dynamic_ball(Vector2::zero());
    restless_body.set_can_sleep(false);
    let body = world.add_body(restless_body);

    let dt = 1.0 / 60.0;
    for _ in 0..120 {
        world.step(dt).unwrap();
    }

    assert!(!world.get_body(body).unwrap().is_sleeping());
}

#[test]
fn overlapping_bodies_emit_collision_events() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(0.5, 0.0)));

    world.step(1.0 / 60.0).unwrap();

    let begins = world
        .get_events()
        .get_collision_events_of_type(CollisionEventType::Begin);
    assert_eq!(begins.len(), 1);
    let event = begins[0];
    assert!(event.body_a == a || event.body_b == a);
    assert!(event.body_a == b || event.body_b == b);
    assert!(!event.contacts.is_empty());

    // The persisting overlap is reported as such on the next step
    world.step(1.0 / 60.0).unwrap();
    let persists = world
        .get_events()
        .get_collision_events_of_type(CollisionEventType::Persist);
    assert_eq!(persists.len(), 1);
}

#[test]
fn collision_events_respect_the_ignorer_chain() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(0.5, 0.0)));

    world
        .set_ignorer(a, Box::new(GroupIgnorer::with_groups(&[1]).unwrap()))
        .unwrap();
    world
        .set_ignorer(b, Box::new(GroupIgnorer::with_groups(&[1]).unwrap()))
        .unwrap();

    world.step(1.0 / 60.0).unwrap();

    assert!(!world.get_events().has_collision_events());
}

#[test]
fn collision_category_masks_gate_the_pair() {
    use impulse2d::collision::CollisionCategory;

    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(0.5, 0.0)));

    {
        let body = world.get_body_mut(a).unwrap();
        body.set_collision_category(CollisionCategory::GROUP2);
        body.set_collision_mask(CollisionCategory::GROUP3);
    }
    {
        let body = world.get_body_mut(b).unwrap();
        body.set_collision_category(CollisionCategory::GROUP2);
        body.set_collision_mask(CollisionCategory::GROUP3);
    }

    // Each body's mask excludes the other's category
    world.step(1.0 / 60.0).unwrap();
    assert!(!world.get_events().has_collision_events());

    // Widening one mask is not enough; the gate needs both directions
    world
        .get_body_mut(a)
        .unwrap()
        .set_collision_mask(CollisionCategory::ALL);
    world.step(1.0 / 60.0).unwrap();
    assert!(!world.get_events().has_collision_events());

    world
        .get_body_mut(b)
        .unwrap()
        .set_collision_mask(CollisionCategory::ALL);
    world.step(1.0 / 60.0).unwrap();
    assert!(world.get_events().has_collision_events());
}

#[test]
fn separating_bodies_emit_an_end_event() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(0.5, 0.0)));

    world.step(1.0 / 60.0).unwrap();
    assert!(world.get_events().has_collision_events());

    // Teleport one body far away; the overlap ends
    world
        .get_body_mut(b)
        .unwrap()
        .set_position(Vector2::new(100.0, 0.0));
    world.step(1.0 / 60.0).unwrap();

    let ends = world
        .get_events()
        .get_collision_events_of_type(CollisionEventType::End);
    assert_eq!(ends.len(), 1);
}

#[test]
fn body_lifecycle_events_are_reported() {
    let mut world = PhysicsWorld::new();

    let body = world.add_body(dynamic_ball(Vector2::zero()));
    assert_eq!(
        world
            .get_events()
            .get_body_events_of_type(BodyEventType::Added)
            .len(),
        1
    );

    world.remove_body(body).unwrap();
    assert_eq!(
        world
            .get_events()
            .get_body_events_of_type(BodyEventType::Removed)
            .len(),
        1
    );
}

#[test]
fn island_indices_are_transient() {
    let mut world = PhysicsWorld::new();

    let a = world.add_body(dynamic_ball(Vector2::zero()));
    let b = world.add_body(dynamic_ball(Vector2::new(5.0, 0.0)));
    world.add_joint(Box::new(AngleJoint::new(a, b)));

    world.step(1.0 / 60.0).unwrap();

    // Outside of a solve pass the indices are cleared
    assert_eq!(world.get_body(a).unwrap().get_island_index(), None);
    assert_eq!(world.get_body(b).unwrap().get_island_index(), None);
}

#[test]
fn infinite_mass_makes_a_body_immovable() {
    let mut world = PhysicsWorld::new();
    world.add_logic(Box::new(impulse2d::logics::GravityLogic::new(
        Vector2::new(0.0, -9.81),
    )));

    let body = world.add_body(dynamic_ball(Vector2::zero()));
    world.get_body_mut(body).unwrap().set_mass(f32::INFINITY);

    assert_eq!(world.get_body(body).unwrap().get_inverse_mass(), 0.0);

    for _ in 0..30 {
        world.step(1.0 / 60.0).unwrap();
    }

    assert_eq!(
        world.get_body(body).unwrap().get_linear_velocity(),
        Vector2::zero()
    );
}
