use approx::assert_relative_eq;
use impulse2d::decomposition::{convex_partition, triangulate, triangulate_with_holes};
use impulse2d::error::PhysicsError;
use impulse2d::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn polygon_area(vertices: &[Vector2]) -> f32 {
    let n = vertices.len();
    let mut area2 = 0.0;
    for i in 0..n {
        area2 += vertices[i].cross(&vertices[(i + 1) % n]);
    }
    (area2 * 0.5).abs()
}

fn triangle_area(t: &[Vector2; 3]) -> f32 {
    ((t[1] - t[0]).cross(&(t[2] - t[0])) * 0.5).abs()
}

fn triangle_centroid(t: &[Vector2; 3]) -> Vector2 {
    (t[0] + t[1] + t[2]) / 3.0
}

fn point_in_polygon(point: Vector2, vertices: &[Vector2]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = vertices[i];
        let pj = vertices[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn regular_polygon(n: usize, radius: f32) -> Vec<Vector2> {
    (0..n)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / n as f32;
            Vector2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

#[test]
fn convex_polygon_yields_n_minus_2_triangles_covering_its_area() {
    for n in [3usize, 4, 5, 8, 12, 20] {
        let polygon = regular_polygon(n, 5.0);
        let triangles = triangulate(&polygon).unwrap();

        assert_eq!(triangles.len(), n - 2, "wrong count for n = {}", n);

        let total: f32 = triangles.iter().map(triangle_area).sum();
        assert_relative_eq!(total, polygon_area(&polygon), max_relative = 1e-4);

        for triangle in &triangles {
            assert!(triangle_area(triangle) > 1e-6, "degenerate triangle");
            assert!(point_in_polygon(triangle_centroid(triangle), &polygon));
        }
    }
}

#[test]
fn winding_order_does_not_matter() {
    let mut square = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(4.0, 0.0),
        Vector2::new(4.0, 4.0),
        Vector2::new(0.0, 4.0),
    ];

    let ccw = triangulate(&square).unwrap();
    square.reverse();
    let cw = triangulate(&square).unwrap();

    assert_eq!(ccw.len(), 2);
    assert_eq!(cw.len(), 2);

    let ccw_area: f32 = ccw.iter().map(triangle_area).sum();
    let cw_area: f32 = cw.iter().map(triangle_area).sum();
    assert_relative_eq!(ccw_area, 16.0, max_relative = 1e-5);
    assert_relative_eq!(cw_area, 16.0, max_relative = 1e-5);
}

#[test]
fn concave_polygon_is_fully_covered() {
    // An L shape: a 2x2 square with a 1x1 corner missing
    let l_shape = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(2.0, 0.0),
        Vector2::new(2.0, 1.0),
        Vector2::new(1.0, 1.0),
        Vector2::new(1.0, 2.0),
        Vector2::new(0.0, 2.0),
    ];

    let triangles = triangulate(&l_shape).unwrap();

    assert_eq!(triangles.len(), l_shape.len() - 2);

    let total: f32 = triangles.iter().map(triangle_area).sum();
    assert_relative_eq!(total, 3.0, max_relative = 1e-5);

    for triangle in &triangles {
        assert!(point_in_polygon(triangle_centroid(triangle), &l_shape));
    }
}

#[test]
fn holed_polygon_excludes_the_hole() {
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

    let triangles = triangulate_with_holes(&outer, &[hole.clone()]).unwrap();

    let total: f32 = triangles.iter().map(triangle_area).sum();
    assert_relative_eq!(total, 96.0, max_relative = 1e-4);

    for triangle in &triangles {
        let centroid = triangle_centroid(triangle);
        assert!(point_in_polygon(centroid, &outer));
        assert!(!point_in_polygon(centroid, &hole));
    }
}

#[test]
fn random_convex_polygons_triangulate_cleanly() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        let n = rng.gen_range(4..16);
        let radius_x = rng.gen_range(1.0..20.0);
        let radius_y = rng.gen_range(1.0..20.0);

        // Points on an ellipse in angular order are always convex
        let polygon: Vec<Vector2> = (0..n)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / n as f32;
                Vector2::new(radius_x * angle.cos(), radius_y * angle.sin())
            })
            .collect();

        let triangles = triangulate(&polygon).unwrap();

        assert_eq!(triangles.len(), n - 2);

        let total: f32 = triangles.iter().map(triangle_area).sum();
        assert_relative_eq!(total, polygon_area(&polygon), max_relative = 1e-3);
    }
}

#[test]
fn degenerate_inputs_are_rejected() {
    // Too few points
    let result = triangulate(&[Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)]);
    assert!(matches!(result, Err(PhysicsError::DegenerateGeometry(_))));

    // A repeated consecutive point
    let result = triangulate(&[
        Vector2::new(0.0, 0.0),
        Vector2::new(4.0, 0.0),
        Vector2::new(4.0, 0.0),
        Vector2::new(4.0, 4.0),
    ]);
    assert!(matches!(result, Err(PhysicsError::DegenerateGeometry(_))));

    // Exactly collinear consecutive points
    let result = triangulate(&[
        Vector2::new(0.0, 0.0),
        Vector2::new(2.0, 0.0),
        Vector2::new(4.0, 0.0),
        Vector2::new(4.0, 4.0),
    ]);
    assert!(matches!(result, Err(PhysicsError::DegenerateGeometry(_))));
}

#[test]
fn convex_partition_returns_triangle_vertex_lists() {
    let square = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(2.0, 0.0),
        Vector2::new(2.0, 2.0),
        Vector2::new(0.0, 2.0),
    ];

    let pieces = convex_partition(&square).unwrap();

    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert_eq!(piece.len(), 3);
    }
}
