// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Vector and matrix helpers shared by the collision predicates, placement and
connectivity code.
*/

use glam::{DMat3, DVec3};

/// Below this, vectors are treated as parallel / zero length
const PARALLEL_EPSILON: f64 = 1e-12;

const JACOBI_MAX_SWEEPS: usize = 50;
/// Squared off-diagonal mass, relative to the squared norm, treated as converged
const JACOBI_RELATIVE_EPSILON: f64 = 1e-30;

/// Unit vectors in the directions of `vectors`. Zero vectors stay zero.
pub fn normalize_vectors(vectors: &[DVec3]) -> Vec<DVec3> {
    vectors.iter().map(|v| v.normalize_or_zero()).collect()
}

/// In-place variant of [`normalize_vectors`]
pub fn normalize_inplace(vectors: &mut [DVec3]) {
    for v in vectors.iter_mut() {
        *v = v.normalize_or_zero();
    }
}

/// Row-wise dot products of two equally sized vector arrays
pub fn vectorized_dot_product(a: &[DVec3], b: &[DVec3]) -> Vec<f64> {
    assert_eq!(
        a.len(),
        b.len(),
        "dot product operands differ in length ({} vs {})",
        a.len(),
        b.len()
    );
    a.iter().zip(b).map(|(u, v)| u.dot(*v)).collect()
}

/// Matrix `K` with `K * b == v.cross(b)` for every `b`
pub fn skew_symmetric_matrix(v: DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    )
}

/// Rotation by `angle` radians around `axis` (Rodrigues' formula)
pub fn rotation_matrix_from_axis_angle(axis: DVec3, angle: f64) -> DMat3 {
    let k = skew_symmetric_matrix(axis.normalize_or_zero());
    DMat3::IDENTITY + k * angle.sin() + (k * k) * (1.0 - angle.cos())
}

/// Rotation that maps unit vector `u` onto unit vector `v`
pub fn rotate_from_unit_vector_to_another(u: DVec3, v: DVec3) -> DMat3 {
    let cos_angle = u.dot(v);

    if cos_angle >= 1.0 - PARALLEL_EPSILON {
        return DMat3::IDENTITY;
    }

    if cos_angle <= -1.0 + PARALLEL_EPSILON {
        // Half turn around any axis orthogonal to u: R = 2 a a^T - I
        let a = u.any_orthonormal_vector();
        return DMat3::from_cols(a * (2.0 * a.x), a * (2.0 * a.y), a * (2.0 * a.z))
            - DMat3::IDENTITY;
    }

    let axis = u.cross(v);
    let k = skew_symmetric_matrix(axis);
    DMat3::IDENTITY + k + (k * k) * ((1.0 - cos_angle) / axis.length_squared())
}

/// Unsigned angle between two vectors in `[0, pi]`
pub fn angle_between_vectors(u: DVec3, v: DVec3) -> f64 {
    u.cross(v).length().atan2(u.dot(v))
}

/// Symmetric matrix of pairwise angles between `vectors` (zero diagonal)
pub fn angle_matrix(vectors: &[DVec3]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut angles = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let angle = angle_between_vectors(vectors[i], vectors[j]);
            angles[i][j] = angle;
            angles[j][i] = angle;
        }
    }
    angles
}

/// Principal component analysis of a point cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    pub centroid: DVec3,
    /// Variances along each direction, descending
    pub eigenvalues: [f64; 3],
    /// Unit directions matching `eigenvalues`
    pub directions: [DVec3; 3],
}

/// Principal directions of `points` (covariance eigenvectors, largest variance first).
///
/// Returns `None` for fewer than two points.
pub fn principal_directions(points: &[DVec3]) -> Option<PrincipalAxes> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let centroid = points.iter().copied().sum::<DVec3>() / n;

    let covariance = points.iter().fold(DMat3::ZERO, |acc, p| {
        let d = *p - centroid;
        acc + DMat3::from_cols(d * d.x, d * d.y, d * d.z)
    }) * (1.0 / (n - 1.0));

    let (eigenvalues, eigenvectors) = symmetric_eigen_3x3(covariance);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

    Some(PrincipalAxes {
        centroid,
        eigenvalues: order.map(|k| eigenvalues[k]),
        directions: order.map(|k| eigenvectors.col(k).normalize_or_zero()),
    })
}

/// Element at row `i`, column `j`
#[inline]
fn entry(m: &DMat3, i: usize, j: usize) -> f64 {
    m.col(j)[i]
}

/// Cyclic Jacobi eigendecomposition of a symmetric 3x3 matrix.
///
/// Returns eigenvalues and a matrix whose columns are the matching eigenvectors.
/// Convergence is judged against the squared Frobenius norm of the input, so the
/// result does not depend on the scale of the matrix.
fn symmetric_eigen_3x3(mut a: DMat3) -> ([f64; 3], DMat3) {
    let mut v = DMat3::IDENTITY;

    let scale: f64 = a.to_cols_array().iter().map(|x| x * x).sum();
    let threshold = JACOBI_RELATIVE_EPSILON * scale;

    for _ in 0..JACOBI_MAX_SWEEPS {
        let off_diagonal: f64 = [(0, 1), (0, 2), (1, 2)]
            .iter()
            .map(|&(p, q)| entry(&a, p, q).powi(2))
            .sum();
        if off_diagonal <= threshold {
            break;
        }

        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            let a_pq = entry(&a, p, q);
            if a_pq * a_pq <= threshold {
                continue;
            }

            let theta = (entry(&a, q, q) - entry(&a, p, p)) / (2.0 * a_pq);
            let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
            let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            // Column-major: cols[j][i] is row i, column j
            let mut cols = DMat3::IDENTITY.to_cols_array_2d();
            cols[p][p] = c;
            cols[q][q] = c;
            cols[q][p] = s;
            cols[p][q] = -s;
            let rotation = DMat3::from_cols_array_2d(&cols);

            a = rotation.transpose() * a * rotation;
            v *= rotation;
        }
    }

    ([entry(&a, 0, 0), entry(&a, 1, 1), entry(&a, 2, 2)], v)
}
