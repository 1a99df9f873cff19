use blockscape_geom::{Aabb, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_arithmetic() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    assert!(vec3_approx_eq(a + b, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq((a + b) - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
    assert!(vec3_approx_eq((a * 2.0) / 2.0, a, 1e-6));
}

#[test]
fn vec3_floor_min_max() {
    let v = Vec3::new(1.7, -0.2, 3.0);
    assert_eq!(v.floor(), Vec3::new(1.0, -1.0, 3.0));
    let w = Vec3::new(0.0, 5.0, 3.5);
    assert_eq!(v.min(w), Vec3::new(0.0, -0.2, 3.0));
    assert_eq!(v.max(w), Vec3::new(1.7, 5.0, 3.5));
}

#[test]
fn quarter_turn_maps_axes() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    assert_eq!(x.rotate_y_quarters(1), Vec3::new(0.0, 0.0, -1.0));
    assert_eq!(x.rotate_y_quarters(2), Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(x.rotate_y_quarters(3), Vec3::new(0.0, 0.0, 1.0));
    let z = Vec3::new(0.0, 0.0, 1.0);
    assert_eq!(z.rotate_y_quarters(1), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(Vec3::UP.rotate_y_quarters(3), Vec3::UP);
}

#[test]
fn aabb_queries() {
    let a = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 4.0, 4.0));
    let b = Aabb::new(Vec3::new(2.0, -1.0, 3.0), Vec3::new(6.0, 1.0, 8.0));
    assert!(a.intersects(&b));
    let i = a.intersection(&b).unwrap();
    assert_eq!(i, Aabb::new(Vec3::new(2.0, 0.0, 3.0), Vec3::new(4.0, 1.0, 4.0)));
    let far = b.translated(Vec3::new(10.0, 0.0, 0.0));
    assert!(a.intersection(&far).is_none());
    assert!(a.contains_point(Vec3::new(4.0, 0.0, 2.0)));
    assert!(!a.contains_point(Vec3::new(4.1, 0.0, 2.0)));
    assert_eq!(a.center(), Vec3::splat(2.0));
    assert_eq!(a.extents(), Vec3::splat(4.0));
}
