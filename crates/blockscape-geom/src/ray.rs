use crate::{Aabb, Vec3};

const TRIANGLE_EPSILON: f32 = 1e-7;

/// A half-line. `direction` does not have to be normalized; distances returned by the
/// intersection tests are in multiples of `direction`'s length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub const fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.position + self.direction * t
    }

    /// Slab test. Returns the entry distance (0 when the origin is inside the box),
    /// or `None` if the ray misses or the box lies behind the origin.
    ///
    /// A zero direction component never crosses that axis' slabs: the ray hits only if
    /// the origin already lies between them.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = self.position.axis(axis);
            let d = self.direction.axis(axis);
            let lo = aabb.min.axis(axis);
            let hi = aabb.max.axis(axis);
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    /// Double-sided Möller–Trumbore. Returns the hit distance along the ray.
    pub fn intersects_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.position - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv_det;
        if t < 0.0 { None } else { Some(t) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn ray_hits_box_from_outside() {
        let r = Ray::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(r.intersects_aabb(&unit_box()), Some(2.0));
    }

    #[test]
    fn ray_inside_box_enters_at_zero() {
        let r = Ray::new(Vec3::splat(0.5), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(r.intersects_aabb(&unit_box()), Some(0.0));
    }

    #[test]
    fn zero_component_outside_slab_misses() {
        let r = Ray::new(Vec3::new(-2.0, 5.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(r.intersects_aabb(&unit_box()), None);
    }

    #[test]
    fn box_behind_origin_misses() {
        let r = Ray::new(Vec3::new(3.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(r.intersects_aabb(&unit_box()), None);
    }

    #[test]
    fn triangle_hit_and_miss() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        let down = Ray::new(Vec3::new(0.25, 1.0, 0.25), Vec3::new(0.0, -1.0, 0.0));
        let t = down.intersects_triangle(a, b, c).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        let off = Ray::new(Vec3::new(0.9, 1.0, 0.9), Vec3::new(0.0, -1.0, 0.0));
        assert!(off.intersects_triangle(a, b, c).is_none());
        let parallel = Ray::new(Vec3::new(0.25, 1.0, 0.25), Vec3::new(1.0, 0.0, 0.0));
        assert!(parallel.intersects_triangle(a, b, c).is_none());
    }
}
