//! Mathematical utilities for finite strip calculations

pub mod eigen;
pub mod strip;

use nalgebra::{DMatrix, DVector, SMatrix};

pub use eigen::{governing_eigenpair, solve_generalized, EigenPair, EigenSolution, GoverningRule};
pub use strip::{strip_mass, strip_stiffness, strip_stress};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 8x8 matrix for a single strip (4 DOFs on each of its 2 nodal lines)
pub type Mat8 = SMatrix<f64, 8, 8>;

/// Eigenvalues at or below this magnitude are treated as numerical noise
pub const MIN_EIGENVALUE: f64 = 1e-12;

/// Coefficients of one displacement family of a strip matrix, upper triangle only
///
/// Indices follow the nodal parameter numbering 1..4 of that family, so `x13`
/// couples parameters 1 and 3.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HalfBlock {
    pub x11: f64,
    pub x12: f64,
    pub x13: f64,
    pub x14: f64,
    pub x22: f64,
    pub x23: f64,
    pub x24: f64,
    pub x33: f64,
    pub x34: f64,
    pub x44: f64,
}

impl HalfBlock {
    /// Multiply every coefficient by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x11: self.x11 * factor,
            x12: self.x12 * factor,
            x13: self.x13 * factor,
            x14: self.x14 * factor,
            x22: self.x22 * factor,
            x23: self.x23 * factor,
            x24: self.x24 * factor,
            x33: self.x33 * factor,
            x34: self.x34 * factor,
            x44: self.x44 * factor,
        }
    }
}

/// Global <-> local transformation matrix of a strip
///
/// Rotates the (u, w) pairs at DOFs (0, 2) and (4, 6); the v and rotation
/// DOFs are left untouched.
pub fn transformation_matrix(dx: f64, dz: f64, b: f64) -> Mat8 {
    let sin_a = dz / b;
    let cos_a = dx / b;

    let mut r = Mat8::identity();
    for offset in [0, 4] {
        r[(offset, offset)] = cos_a;
        r[(offset + 2, offset)] = -sin_a;
        r[(offset, offset + 2)] = sin_a;
        r[(offset + 2, offset + 2)] = cos_a;
    }
    r
}

/// Mirror the strict upper triangle onto the lower one
pub fn symmetrize_upper(mut m: Mat8) -> Mat8 {
    for i in 0..8 {
        for j in (i + 1)..8 {
            m[(j, i)] = m[(i, j)];
        }
    }
    m
}

/// Place membrane ("uu") and bending ("ww") coefficients into a symmetric 8x8 strip matrix
///
/// DOF order is `u1, v1, w1, theta1, u2, v2, w2, theta2`.
pub fn assemble_local_matrix(uu: &HalfBlock, ww: &HalfBlock) -> Mat8 {
    #[rustfmt::skip]
    let data = [
        //  0        1        2        3        4        5        6        7
        uu.x11,  uu.x13,  0.0,     0.0,     uu.x12,  uu.x14,  0.0,     0.0,    // 0
        0.0,     uu.x33,  0.0,     0.0,     uu.x23,  uu.x34,  0.0,     0.0,    // 1
        0.0,     0.0,     ww.x11,  ww.x12,  0.0,     0.0,     ww.x13,  ww.x14, // 2
        0.0,     0.0,     0.0,     ww.x22,  0.0,     0.0,     ww.x23,  ww.x24, // 3
        0.0,     0.0,     0.0,     0.0,     uu.x22,  uu.x24,  0.0,     0.0,    // 4
        0.0,     0.0,     0.0,     0.0,     0.0,     uu.x44,  0.0,     0.0,    // 5
        0.0,     0.0,     0.0,     0.0,     0.0,     0.0,     ww.x33,  ww.x34, // 6
        0.0,     0.0,     0.0,     0.0,     0.0,     0.0,     0.0,     ww.x44, // 7
    ];

    symmetrize_upper(Mat8::from_row_slice(&data))
}

/// Replace every eigenvalue with `|λ| <= MIN_EIGENVALUE` by `MIN_EIGENVALUE`
pub fn clip_small_eigenvalues(eigenvalues: &mut Vec) {
    for value in eigenvalues.iter_mut() {
        if value.abs() <= MIN_EIGENVALUE {
            *value = MIN_EIGENVALUE;
        }
    }
}

/// Relative error of an approximation, `|1 - v_approx / v|`
pub fn relative_error(v: f64, v_approx: f64) -> f64 {
    (1.0 - v_approx / v).abs()
}

/// Elementwise relative error of two vectors of equal length
pub fn relative_error_vec(v: &Vec, v_approx: &Vec) -> Vec {
    v.zip_map(v_approx, relative_error)
}
