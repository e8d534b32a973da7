use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use super::{to_radians, MathError, Vector3f, Vector4f};

/// 4x4 float matrix stored column-major: `a[0..4]` is the first column and
/// `a[12..15]` holds the translation.
///
/// Vectors are columns, so `m * v` applies `m` to `v`, and `a * b` applies
/// `b` first.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4f {
    a: [f32; 16],
}

impl Default for Matrix4f {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4f {
    #[rustfmt::skip]
    pub const IDENTITY: Matrix4f = Matrix4f::from_array([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Maps clip-space `[-1, 1]` to texture-space `[0, 1]` (shadow lookups).
    #[rustfmt::skip]
    pub const BIAS: Matrix4f = Matrix4f::from_array([
        0.5, 0.0, 0.0, 0.0,
        0.0, 0.5, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.0,
        0.5, 0.5, 0.5, 1.0,
    ]);

    /// Build from 16 floats already in column-major order.
    #[inline]
    pub const fn from_array(a: [f32; 16]) -> Self {
        Self { a }
    }

    pub fn from_columns(c0: Vector4f, c1: Vector4f, c2: Vector4f, c3: Vector4f) -> Self {
        let mut a = [0.0; 16];
        for (i, column) in [c0, c1, c2, c3].into_iter().enumerate() {
            a[i * 4..i * 4 + 4].copy_from_slice(&column.to_array());
        }
        Self { a }
    }

    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Column `index` (0..4) as a vector.
    pub fn column(&self, index: usize) -> Result<Vector4f, MathError> {
        if index >= 4 {
            return Err(MathError::IndexOutOfRange {
                type_name: "Matrix4f column",
                index,
                max: 3,
            });
        }
        let c = &self.a[index * 4..index * 4 + 4];
        Ok(Vector4f::new(c[0], c[1], c[2], c[3]))
    }

    /// Post-multiply by a translation.
    pub fn translate(&mut self, v: Vector3f) {
        let a = &mut self.a;
        a[12] += a[0] * v.x + a[4] * v.y + a[8] * v.z;
        a[13] += a[1] * v.x + a[5] * v.y + a[9] * v.z;
        a[14] += a[2] * v.x + a[6] * v.y + a[10] * v.z;
        a[15] += a[3] * v.x + a[7] * v.y + a[11] * v.z;
    }

    /// Post-multiply by a rotation of `angle` degrees around `(x, y, z)`.
    ///
    /// The axis is expected to be unit length. The translation column is
    /// left untouched.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        let (s, c) = to_radians(angle).sin_cos();
        let ic = 1.0 - c;

        // Columns of the rotation matrix.
        let r0 = [x * x * ic + c, x * y * ic + z * s, x * z * ic - y * s];
        let r1 = [x * y * ic - z * s, y * y * ic + c, y * z * ic + x * s];
        let r2 = [x * z * ic + y * s, y * z * ic - x * s, z * z * ic + c];

        let a = self.a;
        let mut out = self.a;
        for (col, r) in [r0, r1, r2].iter().enumerate() {
            for row in 0..4 {
                out[col * 4 + row] = a[row] * r[0] + a[4 + row] * r[1] + a[8 + row] * r[2];
            }
        }
        self.a = out;
    }

    /// Rotate around X, then Y, then Z, each by the matching component of
    /// `euler` in degrees. Three sequential axis rotations, not a combined
    /// Euler formula.
    pub fn rotate_euler(&mut self, euler: Vector3f) {
        self.rotate(euler.x, 1.0, 0.0, 0.0);
        self.rotate(euler.y, 0.0, 1.0, 0.0);
        self.rotate(euler.z, 0.0, 0.0, 1.0);
    }

    /// Scale the upper three columns uniformly.
    pub fn scale(&mut self, s: f32) {
        for v in &mut self.a[..12] {
            *v *= s;
        }
    }

    /// Scale the x, y and z columns by the matching component of `s`.
    pub fn scale_xyz(&mut self, s: Vector3f) {
        for (col, factor) in [s.x, s.y, s.z].into_iter().enumerate() {
            for v in &mut self.a[col * 4..col * 4 + 4] {
                *v *= factor;
            }
        }
    }

    /// Apply the matrix to a point (`w = 1`, perspective divide by the
    /// resulting w) or a direction (`w = 0`, no divide).
    pub fn transform(&self, v: Vector3f, w: f32) -> Vector3f {
        let a = &self.a;
        let dest = Vector3f::new(
            a[0] * v.x + a[4] * v.y + a[8] * v.z + a[12] * w,
            a[1] * v.x + a[5] * v.y + a[9] * v.z + a[13] * w,
            a[2] * v.x + a[6] * v.y + a[10] * v.z + a[14] * w,
        );
        if w == 0.0 {
            return dest;
        }
        let dest_w = a[3] * v.x + a[7] * v.y + a[11] * v.z + a[15] * w;
        dest / dest_w
    }

    /// Right-handed perspective projection; `fovy` is in degrees.
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (to_radians(fovy) / 2.0).tan();
        let depth = near - far;

        let mut m = Self::from_array([0.0; 16]);
        m.a[0] = f / aspect;
        m.a[5] = f;
        m.a[10] = (far + near) / depth;
        m.a[11] = -1.0;
        m.a[14] = (2.0 * far * near) / depth;
        m
    }

    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.a[0] = 2.0 / (right - left);
        m.a[5] = 2.0 / (top - bottom);
        m.a[10] = -2.0 / (far - near);
        m.a[12] = -(right + left) / (right - left);
        m.a[13] = -(top + bottom) / (top - bottom);
        m.a[14] = -(far + near) / (far - near);
        m
    }

    /// View matrix looking from `eye` towards `center`.
    pub fn look_at(eye: Vector3f, center: Vector3f, up: Vector3f) -> Self {
        let f = (center - eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(f);

        #[rustfmt::skip]
        let a = [
            s.x, u.x, -f.x, 0.0,
            s.y, u.y, -f.y, 0.0,
            s.z, u.z, -f.z, 0.0,
            -s.dot(eye), -u.dot(eye), f.dot(eye), 1.0,
        ];
        Self::from_array(a)
    }

    /// The 16 floats in column-major order, ready for upload.
    #[inline]
    pub fn to_array(&self) -> [f32; 16] {
        self.a
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.a
    }

    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        self.a.get(index).copied().ok_or(MathError::IndexOutOfRange {
            type_name: "Matrix4f",
            index,
            max: 15,
        })
    }
}

impl Index<usize> for Matrix4f {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.a[index]
    }
}

impl IndexMut<usize> for Matrix4f {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.a[index]
    }
}

impl Mul for Matrix4f {
    type Output = Matrix4f;

    fn mul(self, m: Matrix4f) -> Matrix4f {
        let a = &self.a;
        let mut dest = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                dest[col * 4 + row] = a[row] * m.a[col * 4]
                    + a[4 + row] * m.a[col * 4 + 1]
                    + a[8 + row] * m.a[col * 4 + 2]
                    + a[12 + row] * m.a[col * 4 + 3];
            }
        }
        Matrix4f::from_array(dest)
    }
}

impl MulAssign for Matrix4f {
    fn mul_assign(&mut self, rhs: Matrix4f) {
        *self = *self * rhs;
    }
}

/// Full homogeneous transform.
impl Mul<Vector4f> for Matrix4f {
    type Output = Vector4f;

    fn mul(self, v: Vector4f) -> Vector4f {
        let a = &self.a;
        Vector4f::new(
            a[0] * v.x + a[4] * v.y + a[8] * v.z + a[12] * v.w,
            a[1] * v.x + a[5] * v.y + a[9] * v.z + a[13] * v.w,
            a[2] * v.x + a[6] * v.y + a[10] * v.z + a[14] * v.w,
            a[3] * v.x + a[7] * v.y + a[11] * v.z + a[15] * v.w,
        )
    }
}

/// Upper 3x3 only: translation and the w row are ignored.
impl Mul<Vector3f> for Matrix4f {
    type Output = Vector3f;

    fn mul(self, v: Vector3f) -> Vector3f {
        let a = &self.a;
        Vector3f::new(
            a[0] * v.x + a[4] * v.y + a[8] * v.z,
            a[1] * v.x + a[5] * v.y + a[9] * v.z,
            a[2] * v.x + a[6] * v.y + a[10] * v.z,
        )
    }
}

/// Prints rows, one per line.
impl fmt::Display for Matrix4f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.a;
        for row in 0..4 {
            writeln!(
                f,
                "[{}, {}, {}, {}]",
                a[row],
                a[4 + row],
                a[8 + row],
                a[12 + row]
            )?;
        }
        Ok(())
    }
}

pub fn transpose(m: &Matrix4f) -> Matrix4f {
    let mut d = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            d[row * 4 + col] = m.a[col * 4 + row];
        }
    }
    Matrix4f::from_array(d)
}

/// Cofactor expansion over all 24 permutations.
#[rustfmt::skip]
pub fn determinant(m: &Matrix4f) -> f32 {
    let m = &m.a;
    m[0] * m[5] * m[10] * m[15] + m[0] * m[9] * m[14] * m[7] +
    m[0] * m[13] * m[6] * m[11] + m[4] * m[1] * m[14] * m[11] +
    m[4] * m[9] * m[2] * m[15] + m[4] * m[13] * m[10] * m[3] +
    m[8] * m[1] * m[6] * m[15] + m[8] * m[5] * m[14] * m[3] +
    m[8] * m[13] * m[2] * m[7] + m[12] * m[1] * m[10] * m[7] +
    m[12] * m[5] * m[2] * m[11] + m[12] * m[9] * m[6] * m[3] -
    m[0] * m[5] * m[14] * m[11] - m[0] * m[9] * m[6] * m[15] -
    m[0] * m[13] * m[10] * m[7] - m[4] * m[1] * m[10] * m[15] -
    m[4] * m[9] * m[14] * m[3] - m[4] * m[13] * m[2] * m[11] -
    m[8] * m[1] * m[14] * m[7] - m[8] * m[5] * m[2] * m[15] -
    m[8] * m[13] * m[6] * m[3] - m[12] * m[1] * m[6] * m[11] -
    m[12] * m[5] * m[10] * m[3] - m[12] * m[9] * m[2] * m[7]
}

/// Adjugate divided by the determinant.
///
/// Fails with [`MathError::SingularMatrix`] when the determinant is zero or
/// not finite.
#[rustfmt::skip]
pub fn inverse(m: &Matrix4f) -> Result<Matrix4f, MathError> {
    let det = determinant(m);
    if det == 0.0 || !det.is_finite() {
        return Err(MathError::SingularMatrix);
    }

    let m = &m.a;
    let mut d = [0.0; 16];
    d[0] = m[5] * m[10] * m[15] + m[9] * m[14] * m[7] + m[13] * m[6] * m[11]
        - m[5] * m[14] * m[11] - m[9] * m[6] * m[15] - m[13] * m[10] * m[7];
    d[1] = m[1] * m[14] * m[11] + m[9] * m[2] * m[15] + m[13] * m[10] * m[3]
        - m[1] * m[10] * m[15] - m[9] * m[14] * m[3] - m[13] * m[2] * m[11];
    d[2] = m[1] * m[6] * m[15] + m[5] * m[14] * m[3] + m[13] * m[2] * m[7]
        - m[1] * m[14] * m[7] - m[5] * m[2] * m[15] - m[13] * m[6] * m[3];
    d[3] = m[1] * m[10] * m[7] + m[5] * m[2] * m[11] + m[9] * m[6] * m[3]
        - m[1] * m[6] * m[11] - m[5] * m[10] * m[3] - m[9] * m[2] * m[7];
    d[4] = m[4] * m[14] * m[11] + m[8] * m[6] * m[15] + m[12] * m[10] * m[7]
        - m[4] * m[10] * m[15] - m[8] * m[14] * m[7] - m[12] * m[6] * m[11];
    d[5] = m[0] * m[10] * m[15] + m[8] * m[14] * m[3] + m[12] * m[2] * m[11]
        - m[0] * m[14] * m[11] - m[8] * m[2] * m[15] - m[12] * m[10] * m[3];
    d[6] = m[0] * m[14] * m[7] + m[4] * m[2] * m[15] + m[12] * m[6] * m[3]
        - m[0] * m[6] * m[15] - m[4] * m[14] * m[3] - m[12] * m[2] * m[7];
    d[7] = m[0] * m[6] * m[11] + m[4] * m[10] * m[3] + m[8] * m[2] * m[7]
        - m[0] * m[10] * m[7] - m[4] * m[2] * m[11] - m[8] * m[6] * m[3];
    d[8] = m[4] * m[9] * m[15] + m[8] * m[13] * m[7] + m[12] * m[5] * m[11]
        - m[4] * m[13] * m[11] - m[8] * m[5] * m[15] - m[12] * m[9] * m[7];
    d[9] = m[0] * m[13] * m[11] + m[8] * m[1] * m[15] + m[12] * m[9] * m[3]
        - m[0] * m[9] * m[15] - m[8] * m[13] * m[3] - m[12] * m[1] * m[11];
    d[10] = m[0] * m[5] * m[15] + m[4] * m[13] * m[3] + m[12] * m[1] * m[7]
        - m[0] * m[13] * m[7] - m[4] * m[1] * m[15] - m[12] * m[5] * m[3];
    d[11] = m[0] * m[9] * m[7] + m[4] * m[1] * m[11] + m[8] * m[5] * m[3]
        - m[0] * m[5] * m[11] - m[4] * m[9] * m[3] - m[8] * m[1] * m[7];
    d[12] = m[4] * m[13] * m[10] + m[8] * m[5] * m[14] + m[12] * m[9] * m[6]
        - m[4] * m[9] * m[14] - m[8] * m[13] * m[6] - m[12] * m[5] * m[10];
    d[13] = m[0] * m[9] * m[14] + m[8] * m[13] * m[2] + m[12] * m[1] * m[10]
        - m[0] * m[13] * m[10] - m[8] * m[1] * m[14] - m[12] * m[9] * m[2];
    d[14] = m[0] * m[13] * m[6] + m[4] * m[1] * m[14] + m[12] * m[5] * m[2]
        - m[0] * m[5] * m[14] - m[4] * m[13] * m[2] - m[12] * m[1] * m[6];
    d[15] = m[0] * m[5] * m[10] + m[4] * m[9] * m[2] + m[8] * m[1] * m[6]
        - m[0] * m[9] * m[6] - m[4] * m[1] * m[10] - m[8] * m[5] * m[2];

    let inv_det = 1.0 / det;
    for v in &mut d {
        *v *= inv_det;
    }
    Ok(Matrix4f::from_array(d))
}
