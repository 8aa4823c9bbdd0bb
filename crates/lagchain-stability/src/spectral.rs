use nalgebra::linalg::Schur;
use nalgebra::DMatrix;

/// Iteration cap of the Schur decomposition.
const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// True when every entry above the diagonal is exactly zero.
pub fn is_lower_triangular(m: &DMatrix<f64>) -> bool {
    (0..m.nrows()).all(|i| ((i + 1)..m.ncols()).all(|j| m[(i, j)] == 0.0))
}

fn is_upper_triangular(m: &DMatrix<f64>) -> bool {
    (0..m.nrows()).all(|i| (0..i.min(m.ncols())).all(|j| m[(i, j)] == 0.0))
}

/// Zeroes the diagonal and everything above it.
pub fn zero_upper_and_diagonal(m: &mut DMatrix<f64>) {
    for i in 0..m.nrows() {
        for j in i..m.ncols() {
            m[(i, j)] = 0.0;
        }
    }
}

/// Largest absolute eigenvalue. Triangular inputs read it off the
/// diagonal; anything else goes through a real Schur decomposition.
/// NaN for empty, non-square or non-finite input, or when the
/// decomposition does not converge.
pub fn spectral_radius(m: &DMatrix<f64>) -> f64 {
    if m.is_empty() || !m.is_square() || m.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    if is_lower_triangular(m) || is_upper_triangular(m) {
        return m.diagonal().iter().fold(0.0, |acc: f64, d| acc.max(d.abs()));
    }
    match Schur::try_new(m.clone(), f64::EPSILON, SCHUR_MAX_ITERATIONS) {
        Some(schur) => schur
            .complex_eigenvalues()
            .iter()
            .fold(0.0, |acc: f64, c| acc.max(c.norm())),
        None => {
            tracing::warn!(dim = m.nrows(), "schur decomposition did not converge");
            f64::NAN
        }
    }
}
