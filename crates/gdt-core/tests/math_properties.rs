//! Algebraic properties of the linear algebra kernel, checked over a fixed
//! spread of sample values.

use gdt_core::math::{cross, determinant, dot, inverse, mix, normalize, transpose, MathError};
use gdt_core::{Matrix4f, Vector3f, Vector4f};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn matrix_approx_eq(a: &Matrix4f, b: &Matrix4f) -> bool {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .all(|(x, y)| (x - y).abs() < 1e-4)
}

fn samples() -> Vec<Vector3f> {
    vec![
        Vector3f::new(1.0, 0.0, 0.0),
        Vector3f::new(3.0, -4.0, 12.0),
        Vector3f::new(-0.25, 0.5, 0.125),
        Vector3f::new(100.0, 200.0, -300.0),
        Vector3f::new(1e-3, 2e-3, -1e-3),
    ]
}

fn transforms() -> Vec<Matrix4f> {
    let mut trs = Matrix4f::IDENTITY;
    trs.translate(Vector3f::new(4.0, -2.0, 7.0));
    trs.rotate(33.0, 0.0, 1.0, 0.0);
    trs.scale_xyz(Vector3f::new(2.0, 0.5, 3.0));

    let mut euler = Matrix4f::IDENTITY;
    euler.rotate_euler(Vector3f::new(10.0, 20.0, 30.0));

    vec![
        trs,
        euler,
        Matrix4f::perspective(60.0, 16.0 / 9.0, 0.1, 100.0),
        Matrix4f::look_at(
            Vector3f::new(3.0, 4.0, 5.0),
            Vector3f::ZERO,
            Vector3f::UP,
        ),
        Matrix4f::BIAS,
    ]
}

#[test]
fn normalized_vectors_have_unit_length() {
    for v in samples() {
        let n = normalize(v);
        assert!(approx_eq(n.length(), 1.0), "{v} -> {n}");
    }
}

#[test]
fn tiny_vectors_normalize_to_zero() {
    for v in [
        Vector3f::ZERO,
        Vector3f::new(1e-6, 0.0, 0.0),
        Vector3f::new(0.0, -3e-6, 3e-6),
    ] {
        assert_eq!(normalize(v), Vector3f::ZERO);
    }
}

#[test]
fn dot_commutes_and_cross_anticommutes() {
    let vs = samples();
    for a in &vs {
        for b in &vs {
            assert_eq!(dot(*a, *b), dot(*b, *a));
            assert_eq!(cross(*a, *b), -cross(*b, *a));
        }
    }
}

#[test]
fn inverse_undoes_every_transform() {
    for m in transforms() {
        let inv = inverse(&m).unwrap();
        assert!(
            matrix_approx_eq(&(m * inv), &Matrix4f::IDENTITY),
            "m * inverse(m) for\n{m}"
        );
    }
}

#[test]
fn transpose_is_an_involution() {
    for m in transforms() {
        assert_eq!(transpose(&transpose(&m)), m);
    }
}

#[test]
fn determinant_edge_cases() {
    assert_eq!(determinant(&Matrix4f::IDENTITY), 1.0);

    for m in transforms() {
        let mut zero_column = m;
        for row in 0..4 {
            zero_column[4 + row] = 0.0;
        }
        assert_eq!(determinant(&zero_column), 0.0);
        assert!(matches!(
            inverse(&zero_column),
            Err(MathError::SingularMatrix)
        ));

        let mut zero_row = m;
        for col in 0..4 {
            zero_row[col * 4 + 2] = 0.0;
        }
        assert_eq!(determinant(&zero_row), 0.0);
    }
}

#[test]
fn identity_leaves_vectors_alone() {
    for v in samples() {
        assert_eq!(Matrix4f::IDENTITY * v, v);
        let h = Vector4f::from_vec3(v, 1.0);
        assert_eq!(Matrix4f::IDENTITY * h, h);
    }
}

#[test]
fn mix_halfway() {
    let a = Vector4f::new(0.0, 0.0, 0.0, 0.0);
    let b = Vector4f::new(10.0, 10.0, 10.0, 10.0);
    assert_eq!(mix(a, b, 0.5), Vector4f::new(5.0, 5.0, 5.0, 5.0));
}

#[test]
fn points_and_directions_transform_differently() {
    let mut m = Matrix4f::IDENTITY;
    m.translate(Vector3f::new(1.0, 2.0, 3.0));
    let p = Vector3f::new(1.0, 1.0, 1.0);

    assert_eq!(m.transform(p, 1.0), Vector3f::new(2.0, 3.0, 4.0));
    assert_eq!(m.transform(p, 0.0), p);
}
