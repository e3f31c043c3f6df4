use approx::assert_relative_eq;
use impulse2d::backend::{BackendRegistry, BodyShape, PhysicsClient};
use impulse2d::error::PhysicsError;
use impulse2d::shapes::Shape;
use impulse2d::Vector2;

#[test]
fn registry_resolves_registered_backends() {
    let registry = BackendRegistry::with_default_backends();

    let mut names = registry.backend_names();
    names.sort_unstable();
    assert_eq!(names, vec!["impulse", "minimal"]);

    let client = registry.create("impulse").unwrap();
    assert_eq!(client.backend_name(), "impulse");

    let client = registry.create("minimal").unwrap();
    assert_eq!(client.backend_name(), "minimal");
}

#[test]
fn registry_rejects_unknown_backends() {
    let registry = BackendRegistry::with_default_backends();
    let result = registry.create("quantum");
    assert!(matches!(result, Err(PhysicsError::ResourceNotFound(_))));
}

#[test]
fn minimal_backend_reports_joints_as_unsupported() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("minimal").unwrap();

    let a = client.create_body(1.0, 1.0, BodyShape::Circle).unwrap();
    let b = client.create_body(1.0, 1.0, BodyShape::Circle).unwrap();

    let result = client.create_axle_joint(a, Some(b), Vector2::zero());
    assert!(matches!(result, Err(PhysicsError::Unsupported(_))));

    let result = client.create_angle_joint(a, b, 0.0);
    assert!(matches!(result, Err(PhysicsError::Unsupported(_))));
}

#[test]
fn minimal_backend_integrates_gravity() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("minimal").unwrap();

    client.set_gravity(Vector2::new(0.0, -10.0));
    let body = client.create_body(1.0, 1.0, BodyShape::Circle).unwrap();

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        client.update(dt).unwrap();
    }

    let velocity = client.get_velocity(body).unwrap();
    assert_relative_eq!(velocity.y, -10.0, max_relative = 1e-3);
    assert!(client.get_position(body).unwrap().y < 0.0);
}

#[test]
fn impulse_backend_simulates_falling_bodies() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("impulse").unwrap();

    client.set_gravity(Vector2::new(0.0, -10.0));
    assert_eq!(client.get_gravity(), Vector2::new(0.0, -10.0));

    let body = client.create_body(1.0, 1.0, BodyShape::Rectangle).unwrap();
    client.set_position(body, Vector2::new(0.0, 50.0)).unwrap();

    let dt = 1.0 / 60.0;
    for _ in 0..60 {
        client.update(dt).unwrap();
    }

    let position = client.get_position(body).unwrap();
    assert!(position.y < 50.0);

    let velocity = client.get_velocity(body).unwrap();
    assert_relative_eq!(velocity.y, -10.0, max_relative = 1e-3);
}

#[test]
fn impulse_backend_supports_joints() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("impulse").unwrap();

    let a = client.create_body(1.0, 1.0, BodyShape::Circle).unwrap();
    let b = client.create_body(1.0, 1.0, BodyShape::Circle).unwrap();
    client.set_position(b, Vector2::new(5.0, 0.0)).unwrap();

    let joint = client.create_angle_joint(a, b, 0.3).unwrap();

    let dt = 1.0 / 60.0;
    for _ in 0..240 {
        client.update(dt).unwrap();
    }

    client.remove_joint(joint).unwrap();

    // A destroyed endpoint is rejected at joint creation
    client.remove_body(b).unwrap();
    let result = client.create_angle_joint(a, b, 0.0);
    assert!(matches!(result, Err(PhysicsError::ResourceNotFound(_))));
}

#[test]
fn concave_outlines_become_compound_shapes() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("impulse").unwrap();

    let l_shape = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(2.0, 0.0),
        Vector2::new(2.0, 1.0),
        Vector2::new(1.0, 1.0),
        Vector2::new(1.0, 2.0),
        Vector2::new(0.0, 2.0),
    ];

    let body = client
        .create_body(2.0, 2.0, BodyShape::Polygon(l_shape))
        .unwrap();

    let shape = client.get_shape(body).unwrap();
    assert_eq!(shape.shape_type(), "Compound");
    assert!(shape.area() > 0.0);

    let mass = client.get_mass(body).unwrap();
    assert_relative_eq!(mass, 3.0, max_relative = 1e-3);
}

#[test]
fn holed_outlines_lose_the_hole_area() {
    let registry = BackendRegistry::with_default_backends();
    let mut client = registry.create("impulse").unwrap();

    let outer = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(10.0, 0.0),
        Vector2::new(10.0, 10.0),
        Vector2::new(0.0, 10.0),
    ];
    let hole = vec![
        Vector2::new(4.0, 4.0),
        Vector2::new(6.0, 4.0),
        Vector2::new(6.0, 6.0),
        Vector2::new(4.0, 6.0),
    ];

    let body = client
        .create_body(
            10.0,
            10.0,
            BodyShape::PolygonWithHoles {
                outer,
                holes: vec![hole],
            },
        )
        .unwrap();

    let shape = client.get_shape(body).unwrap();
    assert_relative_eq!(shape.area(), 96.0, max_relative = 1e-3);
}
