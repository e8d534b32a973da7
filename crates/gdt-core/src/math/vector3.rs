use super::Cross;

/// Three-component float vector.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector!(Vector3f, 3, x: 0, y: 1, z: 2);

impl Vector3f {
    pub const ZERO: Vector3f = Vector3f::splat(0.0);
    pub const ONE: Vector3f = Vector3f::splat(1.0);
    pub const UP: Vector3f = Vector3f::new(0.0, 1.0, 0.0);

    #[inline]
    pub fn cross(self, rhs: Vector3f) -> Vector3f {
        Vector3f::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl Cross for Vector3f {
    fn cross(self, rhs: Self) -> Self {
        Vector3f::cross(self, rhs)
    }
}

impl std::ops::Mul<Vector3f> for f32 {
    type Output = Vector3f;
    #[inline]
    fn mul(self, rhs: Vector3f) -> Vector3f {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{cross, dot, normalize, NORMALIZE_EPSILON};

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn cross_of_basis_vectors() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(cross(x, y), Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn cross_is_anticommutative() {
        let a = Vector3f::new(1.5, -2.0, 0.25);
        let b = Vector3f::new(-3.0, 4.0, 7.0);
        assert_eq!(cross(a, b), -cross(b, a));
    }

    #[test]
    fn dot_is_commutative() {
        let a = Vector3f::new(1.5, -2.0, 0.25);
        let b = Vector3f::new(-3.0, 4.0, 7.0);
        assert_eq!(dot(a, b), dot(b, a));
        assert_eq!(dot(a, b), -4.5 - 8.0 + 1.75);
    }

    #[test]
    fn normalize_has_unit_length() {
        for v in [
            Vector3f::new(1.0, 2.0, 3.0),
            Vector3f::new(-0.01, 0.0, 0.02),
            Vector3f::new(1e3, -1e3, 5.0),
        ] {
            assert!(approx_eq(normalize(v).length(), 1.0));
        }
    }

    #[test]
    fn normalize_near_zero_gives_zero() {
        let mut v = Vector3f::splat(NORMALIZE_EPSILON / 10.0);
        v.normalize();
        assert_eq!(v, Vector3f::ZERO);
        assert_eq!(normalize(Vector3f::ZERO), Vector3f::ZERO);
        assert!(!normalize(Vector3f::ZERO).x.is_nan());
    }

    #[test]
    fn equality_is_exact() {
        let a = Vector3f::new(0.1, 0.2, 0.3);
        let b = Vector3f::new(0.1, 0.2, 0.3 + f32::EPSILON);
        assert_ne!(a, b);
    }

    #[test]
    fn indexing_reads_and_writes() {
        let mut v = Vector3f::new(1.0, 2.0, 3.0);
        v[1] = 5.0;
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 5.0);
        assert_eq!(v.get(2), Ok(3.0));
        assert!(v.get(3).is_err());
        *v.get_mut(0).unwrap() = -1.0;
        assert_eq!(v.x, -1.0);
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(Vector3f::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }
}
