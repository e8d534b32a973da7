use super::{Cross, Vector3f};

/// Four-component float vector, usually a homogeneous coordinate.
///
/// The default value is the origin point `(0, 0, 0, 1)`. Arithmetic, `dot`
/// and `length` cover all four components.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector4f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector!(Vector4f, 4, x: 0, y: 1, z: 2, w: 3);

impl Default for Vector4f {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl Vector4f {
    pub const ZERO: Vector4f = Vector4f::splat(0.0);
    pub const ONE: Vector4f = Vector4f::splat(1.0);
    pub const UP: Vector4f = Vector4f::new(0.0, 1.0, 0.0, 0.0);

    /// Homogeneous coordinate from a 3D vector: `w = 1` for points,
    /// `w = 0` for directions.
    #[inline]
    pub const fn from_vec3(v: Vector3f, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// `(xyz, xyz, xyz, w)`.
    #[inline]
    pub const fn splat_w(xyz: f32, w: f32) -> Self {
        Self::new(xyz, xyz, xyz, w)
    }

    #[inline]
    pub const fn xyz(self) -> Vector3f {
        Vector3f::new(self.x, self.y, self.z)
    }

    /// Cross product of the xyz parts; `w` is taken from `self`.
    #[inline]
    pub fn cross(self, rhs: Vector4f) -> Vector4f {
        Self::from_vec3(self.xyz().cross(rhs.xyz()), self.w)
    }
}

impl Cross for Vector4f {
    fn cross(self, rhs: Self) -> Self {
        Vector4f::cross(self, rhs)
    }
}

impl From<(Vector3f, f32)> for Vector4f {
    fn from((v, w): (Vector3f, f32)) -> Self {
        Self::from_vec3(v, w)
    }
}

impl std::ops::Mul<Vector4f> for f32 {
    type Output = Vector4f;
    #[inline]
    fn mul(self, rhs: Vector4f) -> Vector4f {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::cross;

    #[test]
    fn default_is_the_origin_point() {
        assert_eq!(Vector4f::default(), Vector4f::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn homogeneous_construction() {
        let v = Vector4f::from_vec3(Vector3f::new(1.0, 2.0, 3.0), 0.0);
        assert_eq!(v, Vector4f::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(Vector4f::from((v.xyz(), 1.0)).w, 1.0);
        assert_eq!(Vector4f::splat_w(2.0, 1.0), Vector4f::new(2.0, 2.0, 2.0, 1.0));
    }

    #[test]
    fn cross_keeps_left_w() {
        let a = Vector4f::new(1.0, 0.0, 0.0, 7.0);
        let b = Vector4f::new(0.0, 1.0, 0.0, 3.0);
        assert_eq!(cross(a, b), Vector4f::new(0.0, 0.0, 1.0, 7.0));
    }

    #[test]
    fn normalize_covers_all_components() {
        let v = Vector4f::new(1.0, 1.0, 1.0, 1.0).normalized();
        assert_eq!(v, Vector4f::splat(0.5));
    }

    #[test]
    fn out_of_range_component() {
        let mut v = Vector4f::default();
        assert!(v.get(4).is_err());
        assert!(v.get_mut(usize::MAX).is_err());
        assert_eq!(v[3], 1.0);
    }
}
