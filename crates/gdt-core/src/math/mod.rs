//! Linear algebra kernel.
//!
//! Single-precision vectors and a column-major 4x4 matrix, laid out so they
//! can be handed to the graphics device as contiguous float blocks.
//!
//! Equality on every type here is exact float comparison. Callers that need
//! tolerance compare components themselves.

use thiserror::Error;

/// Vectors whose length is at or below this value normalize to zero.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

pub const PI: f32 = std::f32::consts::PI;
pub const TWO_PI: f32 = 2.0 * std::f32::consts::PI;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Attempting to access component {index} of {type_name}, only [0-{max}] are defined")]
    IndexOutOfRange {
        type_name: &'static str,
        index: usize,
        max: usize,
    },

    #[error("Matrix is singular (determinant is zero), its inverse is undefined")]
    SingularMatrix,
}

/// Operations shared by [`Vector2f`], [`Vector3f`] and [`Vector4f`], so the
/// free functions below work on any of them.
pub trait FloatVector:
    Copy
    + PartialEq
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<f32, Output = Self>
{
    fn dot(self, rhs: Self) -> f32;
    fn length(self) -> f32;
    fn normalized(self) -> Self;
    fn powf(self, exponent: f32) -> Self;
    fn min_element(self) -> f32;
    fn max_element(self) -> f32;
}

/// Vector types with a cross product. [`Vector4f`] crosses its xyz part and
/// keeps the left operand's `w`.
pub trait Cross {
    fn cross(self, rhs: Self) -> Self;
}

// Operator and accessor boilerplate common to all vector types. Each field is
// paired with its index so `[]` and `get` agree on the component order.
macro_rules! impl_vector {
    ($ty:ident, $len:literal, $($field:ident : $idx:literal),+) => {
        impl $ty {
            pub const LEN: usize = $len;

            #[inline]
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Broadcast one value to every component.
            #[inline]
            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            #[inline]
            pub fn set(&mut self, $($field: f32),+) {
                $(self.$field = $field;)+
            }

            #[inline]
            pub fn sqr_magnitude(self) -> f32 {
                0.0 $(+ self.$field * self.$field)+
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.sqr_magnitude().sqrt()
            }

            /// Normalize in place. A vector no longer than
            /// [`NORMALIZE_EPSILON`](crate::math::NORMALIZE_EPSILON) becomes
            /// the zero vector instead of NaN.
            pub fn normalize(&mut self) -> &mut Self {
                let len = self.length();
                if len <= $crate::math::NORMALIZE_EPSILON {
                    *self = Self::splat(0.0);
                } else {
                    $(self.$field /= len;)+
                }
                self
            }

            #[inline]
            pub fn normalized(self) -> Self {
                let mut v = self;
                v.normalize();
                v
            }

            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            #[inline]
            pub fn powf(self, exponent: f32) -> Self {
                Self { $($field: self.$field.powf(exponent)),+ }
            }

            #[inline]
            pub fn min_element(self) -> f32 {
                self.to_array().into_iter().fold(f32::INFINITY, f32::min)
            }

            #[inline]
            pub fn max_element(self) -> f32 {
                self.to_array().into_iter().fold(f32::NEG_INFINITY, f32::max)
            }

            #[inline]
            pub fn to_array(self) -> [f32; $len] {
                [$(self.$field),+]
            }

            pub fn get(&self, index: usize) -> Result<f32, $crate::math::MathError> {
                match index {
                    $($idx => Ok(self.$field),)+
                    _ => Err(Self::out_of_range(index)),
                }
            }

            pub fn get_mut(&mut self, index: usize) -> Result<&mut f32, $crate::math::MathError> {
                match index {
                    $($idx => Ok(&mut self.$field),)+
                    _ => Err(Self::out_of_range(index)),
                }
            }

            fn out_of_range(index: usize) -> $crate::math::MathError {
                $crate::math::MathError::IndexOutOfRange {
                    type_name: stringify!($ty),
                    index,
                    max: $len - 1,
                }
            }
        }

        impl $crate::math::FloatVector for $ty {
            fn dot(self, rhs: Self) -> f32 {
                $ty::dot(self, rhs)
            }
            fn length(self) -> f32 {
                $ty::length(self)
            }
            fn normalized(self) -> Self {
                $ty::normalized(self)
            }
            fn powf(self, exponent: f32) -> Self {
                $ty::powf(self, exponent)
            }
            fn min_element(self) -> f32 {
                $ty::min_element(self)
            }
            fn max_element(self) -> f32 {
                $ty::max_element(self)
            }
        }

        impl From<[f32; $len]> for $ty {
            fn from(a: [f32; $len]) -> Self {
                Self { $($field: a[$idx]),+ }
            }
        }

        impl From<$ty> for [f32; $len] {
            fn from(v: $ty) -> Self {
                v.to_array()
            }
        }

        impl std::ops::Index<usize> for $ty {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("{}", Self::out_of_range(index)),
                }
            }
        }

        impl std::ops::IndexMut<usize> for $ty {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{}", Self::out_of_range(index)),
                }
            }
        }

        impl std::ops::Neg for $ty {
            type Output = $ty;
            #[inline]
            fn neg(self) -> $ty {
                Self { $($field: -self.$field),+ }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let parts = [$(self.$field.to_string()),+];
                write!(f, "({})", parts.join(", "))
            }
        }

        impl_vector!(@binop $ty, Add, add, AddAssign, add_assign, +, $($field),+);
        impl_vector!(@binop $ty, Sub, sub, SubAssign, sub_assign, -, $($field),+);
        impl_vector!(@binop $ty, Mul, mul, MulAssign, mul_assign, *, $($field),+);
        impl_vector!(@binop $ty, Div, div, DivAssign, div_assign, /, $($field),+);
    };

    (@binop $ty:ident, $op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $sym:tt, $($field:ident),+) => {
        impl std::ops::$op for $ty {
            type Output = $ty;
            #[inline]
            fn $method(self, rhs: $ty) -> $ty {
                Self { $($field: self.$field $sym rhs.$field),+ }
            }
        }

        impl std::ops::$op<f32> for $ty {
            type Output = $ty;
            #[inline]
            fn $method(self, rhs: f32) -> $ty {
                Self { $($field: self.$field $sym rhs),+ }
            }
        }

        impl std::ops::$op_assign for $ty {
            #[inline]
            fn $method_assign(&mut self, rhs: $ty) {
                $(self.$field = self.$field $sym rhs.$field;)+
            }
        }

        impl std::ops::$op_assign<f32> for $ty {
            #[inline]
            fn $method_assign(&mut self, rhs: f32) {
                $(self.$field = self.$field $sym rhs;)+
            }
        }
    };
}

mod matrix4;
mod vector2;
mod vector3;
mod vector4;

pub use matrix4::{determinant, inverse, transpose, Matrix4f};
pub use vector2::Vector2f;
pub use vector3::Vector3f;
pub use vector4::Vector4f;

#[inline]
pub fn dot<V: FloatVector>(a: V, b: V) -> f32 {
    a.dot(b)
}

#[inline]
pub fn cross<V: Cross>(a: V, b: V) -> V {
    a.cross(b)
}

/// Non-mutating, zero-guarded normalization.
#[inline]
pub fn normalize<V: FloatVector>(v: V) -> V {
    v.normalized()
}

/// Component-wise exponentiation.
#[inline]
pub fn pow<V: FloatVector>(v: V, exponent: f32) -> V {
    v.powf(exponent)
}

/// Smallest component.
#[inline]
pub fn min<V: FloatVector>(v: V) -> f32 {
    v.min_element()
}

/// Largest component.
#[inline]
pub fn max<V: FloatVector>(v: V) -> f32 {
    v.max_element()
}

/// Linear interpolation, `a * (1 - t) + b * t`.
#[inline]
pub fn mix<V: FloatVector>(a: V, b: V, t: f32) -> V {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}

#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    radians * (180.0 / PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_dispatch_on_every_vector_type() {
        assert_eq!(dot(Vector2f::new(1.0, 2.0), Vector2f::new(3.0, 4.0)), 11.0);
        assert_eq!(min(Vector3f::new(3.0, -1.0, 2.0)), -1.0);
        assert_eq!(max(Vector4f::new(3.0, -1.0, 2.0, 7.0)), 7.0);
        assert_eq!(
            pow(Vector3f::new(2.0, 3.0, 4.0), 2.0),
            Vector3f::new(4.0, 9.0, 16.0)
        );
    }

    #[test]
    fn mix_halfway_between_four_vectors() {
        let a = Vector4f::new(0.0, 0.0, 0.0, 0.0);
        let b = Vector4f::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(mix(a, b, 0.5), Vector4f::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn mix_endpoints() {
        let a = Vector2f::new(1.0, 2.0);
        let b = Vector2f::new(5.0, -2.0);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
    }

    #[test]
    fn angle_conversions() {
        assert!((to_radians(180.0) - PI).abs() < 1e-6);
        assert!((to_degrees(PI / 2.0) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn index_error_names_the_type() {
        let err = Vector3f::ZERO.get(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attempting to access component 3 of Vector3f, only [0-2] are defined"
        );
    }
}
