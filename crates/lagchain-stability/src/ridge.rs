use nalgebra::{DMatrix, DVector};

/// Solves `(XᵗX + ridge·I) β = Xᵗy`. Cholesky first, LU when the system
/// is not positive definite. `None` when both fail or the solution is not
/// finite.
pub fn ridge_solve(x: &DMatrix<f64>, y: &DVector<f64>, ridge: f64) -> Option<DVector<f64>> {
    let xt = x.transpose();
    let k = x.ncols();
    let gram = &xt * x + DMatrix::<f64>::identity(k, k) * ridge;
    let rhs = &xt * y;
    let beta = match gram.clone().cholesky() {
        Some(chol) => chol.solve(&rhs),
        None => gram.lu().solve(&rhs)?,
    };
    beta.iter().all(|b| b.is_finite()).then_some(beta)
}
