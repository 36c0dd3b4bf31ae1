//! Generalized symmetric eigenvalue problem `X φ = λ K̂ φ`
//!
//! K̂ is reduced with its Cholesky factor `K̂ = G Gᵀ` to the standard problem
//! `H y = λ y` with `H = G⁻¹ X G⁻ᵀ`, and the mode shapes are recovered as
//! `φ = G⁻ᵀ y`.

use nalgebra::linalg::SymmetricEigen;
use serde::{Deserialize, Serialize};

use super::{clip_small_eigenvalues, Mat, Vec};
use crate::error::{FsmResult, NumericalError};

/// How the governing eigenvalue is picked from the normalized eigenvalues
///
/// Both rules resolve ties to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoverningRule {
    /// Smallest signed value (plain argmin)
    #[default]
    MinSigned,
    /// Smallest absolute value
    ClosestToZero,
}

impl GoverningRule {
    /// Index of the governing value; NaN entries never govern
    pub fn select(&self, values: &[f64]) -> Option<usize> {
        let key = |v: f64| match self {
            GoverningRule::MinSigned => v,
            GoverningRule::ClosestToZero => v.abs(),
        };

        values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .min_by(|(_, x), (_, y)| key(**x).total_cmp(&key(**y)))
            .map(|(i, _)| i)
    }
}

/// The governing eigenvalue and its mode shape
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    pub value: f64,
    pub shape: Vec,
}

/// All solutions of a generalized eigenproblem
#[derive(Debug, Clone)]
pub struct EigenSolution {
    /// Clipped and normalized eigenvalues
    pub eigenvalues: Vec,
    /// Mode shapes in the coordinates of `k_hat`, one per column
    pub mode_shapes: Mat,
    /// Index of the governing eigenvalue
    pub governing: usize,
}

impl EigenSolution {
    /// The governing eigenvalue and its mode shape
    pub fn governing_pair(&self) -> EigenPair {
        EigenPair {
            value: self.eigenvalues[self.governing],
            shape: self.mode_shapes.column(self.governing).into_owned(),
        }
    }
}

/// Solve `X φ = λ K̂ φ` and normalize every eigenvalue
///
/// # Arguments
/// * `k_hat` - Symmetric positive definite stiffness matrix
/// * `x` - Symmetric mass or stress matrix of the same size
/// * `normalize` - Applied to each clipped eigenvalue before selection, e.g. `|l| (1.0 / l).sqrt()`
/// * `rule` - Governing eigenvalue selection
pub fn solve_generalized<F>(k_hat: &Mat, x: &Mat, normalize: F, rule: GoverningRule) -> FsmResult<EigenSolution>
where
    F: Fn(f64) -> f64,
{
    let n = k_hat.nrows();
    if k_hat.ncols() != n || x.nrows() != n || x.ncols() != n || n == 0 {
        return Err(NumericalError::DimensionMismatch(n, x.nrows(), x.ncols()).into());
    }

    let g = k_hat
        .clone()
        .cholesky()
        .ok_or(NumericalError::NotPositiveDefinite)?
        .l();
    let g_inv = g
        .solve_lower_triangular(&Mat::identity(n, n))
        .ok_or(NumericalError::SingularFactor)?;

    // H = G^-1 * X * G^-T
    let h = &g_inv * x * g_inv.transpose();
    let h = (&h + h.transpose()) * 0.5;

    let eigen = SymmetricEigen::new(h);

    let mut eigenvalues = eigen.eigenvalues;
    clip_small_eigenvalues(&mut eigenvalues);
    let eigenvalues = eigenvalues.map(normalize);

    let mode_shapes = g_inv.transpose() * eigen.eigenvectors;

    let governing = rule
        .select(eigenvalues.as_slice())
        .ok_or(NumericalError::NoGoverningEigenvalue)?;

    Ok(EigenSolution {
        eigenvalues,
        mode_shapes,
        governing,
    })
}

/// Solve `X φ = λ K̂ φ` and return only the governing eigenpair
pub fn governing_eigenpair<F>(k_hat: &Mat, x: &Mat, normalize: F, rule: GoverningRule) -> FsmResult<EigenPair>
where
    F: Fn(f64) -> f64,
{
    solve_generalized(k_hat, x, normalize, rule).map(|solution| solution.governing_pair())
}
