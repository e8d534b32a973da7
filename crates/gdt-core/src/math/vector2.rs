/// Two-component float vector.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

impl_vector!(Vector2f, 2, x: 0, y: 1);

impl Vector2f {
    pub const ZERO: Vector2f = Vector2f::splat(0.0);
    pub const ONE: Vector2f = Vector2f::splat(1.0);
}

impl std::ops::Mul<Vector2f> for f32 {
    type Output = Vector2f;
    #[inline]
    fn mul(self, rhs: Vector2f) -> Vector2f {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(Vector2f::default(), Vector2f::ZERO);
    }

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Vector2f::new(1.0, 2.0);
        let b = Vector2f::new(4.0, 8.0);
        assert_eq!(a + b, Vector2f::new(5.0, 10.0));
        assert_eq!(b - a, Vector2f::new(3.0, 6.0));
        assert_eq!(a * b, Vector2f::new(4.0, 16.0));
        assert_eq!(b / a, Vector2f::new(4.0, 4.0));
        assert_eq!(a + 1.0, Vector2f::new(2.0, 3.0));
        assert_eq!(2.0 * a, Vector2f::new(2.0, 4.0));
        assert_eq!(-a, Vector2f::new(-1.0, -2.0));
    }

    #[test]
    fn compound_assignment() {
        let mut v = Vector2f::new(1.0, 1.0);
        v += Vector2f::new(1.0, 2.0);
        v *= 2.0;
        v -= 1.0;
        v /= Vector2f::new(3.0, 5.0);
        assert_eq!(v, Vector2f::new(1.0, 1.0));
    }

    #[test]
    fn length_and_normalize() {
        let mut v = Vector2f::new(3.0, 4.0);
        assert_eq!(v.sqr_magnitude(), 25.0);
        assert_eq!(v.length(), 5.0);
        v.normalize();
        assert_eq!(v, Vector2f::new(0.6, 0.8));
    }

    #[test]
    fn set_overwrites_components() {
        let mut v = Vector2f::ZERO;
        v.set(7.0, -3.0);
        assert_eq!(v.to_array(), [7.0, -3.0]);
    }

    #[test]
    #[should_panic(expected = "only [0-1] are defined")]
    fn index_past_y_panics() {
        let v = Vector2f::ONE;
        let _ = v[2];
    }
}
