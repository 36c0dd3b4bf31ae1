//! Local stiffness, stress and mass matrices of a single finite strip
//!
//! Each matrix is split into an in-plane membrane part ("uu", DOFs u and v)
//! and an out-of-plane bending part ("ww", DOFs w and theta). Both parts are
//! evaluated for one harmonic `m` using the integrals of the longitudinal
//! basis functions, already scaled by the strip length `a`.
//!
//! These kernels run once per strip per grid point per mode, so they do no
//! validation of their inputs.

use super::{assemble_local_matrix, HalfBlock, Mat8};
use crate::integrals::IntegralSet;

/// Local stiffness matrix of a strip
///
/// # Arguments
/// * `i` - Scaled integrals for the current mode
/// * `a_mu` - Strip length divided by the characteristic root, `a / mu_m`
/// * `b` - Strip width [mm]
/// * `t` - Strip thickness [mm]
/// * `k_x`, `k_y`, `k_1`, `k_xy` - Material stiffness coefficients
#[allow(clippy::too_many_arguments)]
pub fn strip_stiffness(
    i: &IntegralSet,
    a_mu: f64,
    b: f64,
    t: f64,
    k_x: f64,
    k_y: f64,
    k_1: f64,
    k_xy: f64,
) -> Mat8 {
    let a_mu2 = a_mu * a_mu;

    let uu11 = (k_x * i.i1 / b + k_xy * i.i2 * b / 3.0) * t;
    let uu12 = (-k_x * i.i1 / b + k_xy * i.i2 * b / 6.0) * t;
    let uu13 = (-k_1 * i.i5 / 2.0 - k_xy * i.i6 / 2.0) * t * a_mu;
    let uu14 = (-k_1 * i.i5 / 2.0 + k_xy * i.i6 / 2.0) * t * a_mu;
    let uu33 = (k_xy * i.i8 / b + k_y * i.i7 * b / 3.0) * t * a_mu2;
    let uu34 = (-k_xy * i.i8 / b + k_y * i.i7 * b / 6.0) * t * a_mu2;

    let uu = HalfBlock {
        x11: uu11,
        x12: uu12,
        x13: uu13,
        x14: uu14,
        x22: uu11,
        x23: -uu14,
        x24: -uu13,
        x33: uu33,
        x34: uu34,
        x44: uu33,
    };

    // Plate rigidities
    let t3 = t.powi(3) / 12.0;
    let d11 = k_x * t3;
    let d22 = k_y * t3;
    let d12 = k_1 * t3;
    let d66 = k_xy * t3;

    let b2 = b * b;
    let b3 = b2 * b;

    #[rustfmt::skip]
    let ww11 =  12.0 * d11 * i.i21 / b3 -  6.0 / 5.0  * d12 * i.i22 / b - 6.0 / 5.0 * d12 * i.i23 / b + 13.0 / 35.0  * d22 * i.i24 * b  + 24.0 / 5.0  * d66 * i.i25 / b;
    #[rustfmt::skip]
    let ww12 =   6.0 * d11 * i.i21 / b2 - 11.0 / 10.0 * d12 * i.i22     - 1.0 / 10.0 * d12 * i.i23    + 11.0 / 210.0 * d22 * i.i24 * b2 +  2.0 / 5.0  * d66 * i.i25;
    #[rustfmt::skip]
    let ww13 = -12.0 * d11 * i.i21 / b3 +  6.0 / 5.0  * d12 * i.i22 / b + 6.0 / 5.0 * d12 * i.i23 / b + 18.0 / 140.0 * d22 * i.i24 * b  - 24.0 / 5.0  * d66 * i.i25 / b;
    #[rustfmt::skip]
    let ww14 =   6.0 * d11 * i.i21 / b2 -  1.0 / 10.0 * d12 * i.i23     - 1.0 / 10.0 * d12 * i.i22    - 26.0 / 840.0 * d22 * i.i24 * b2 +  2.0 / 5.0  * d66 * i.i25;
    #[rustfmt::skip]
    let ww22 =   4.0 * d11 * i.i21 / b  -  2.0 / 15.0 * d12 * i.i22 * b - 2.0 / 15.0 * d12 * i.i23 * b +  2.0 / 210.0 * d22 * i.i24 * b3 +  8.0 / 15.0 * d66 * i.i25 * b;
    #[rustfmt::skip]
    let ww24 =   2.0 * d11 * i.i21 / b  +  2.0 / 60.0 * d12 * i.i22 * b + 2.0 / 60.0 * d12 * i.i23 * b -  6.0 / 840.0 * d22 * i.i24 * b3 -  2.0 / 15.0 * d66 * i.i25 * b;
    #[rustfmt::skip]
    let ww34 =  -6.0 * d11 * i.i21 / b2 + 22.0 / 20.0 * d12 * i.i22     + 6.0 / 60.0 * d12 * i.i23    - 22.0 / 420.0 * d22 * i.i24 * b2 -  2.0 / 5.0  * d66 * i.i25;

    let ww = HalfBlock {
        x11: ww11,
        x12: ww12,
        x13: ww13,
        x14: ww14,
        x22: ww22,
        x23: -ww14,
        x24: ww24,
        x33: ww11,
        x34: ww34,
        x44: ww22,
    };

    assemble_local_matrix(&uu, &ww)
}

/// Local stress (geometric stiffness) matrix of a strip
///
/// The in-plane stress varies linearly across the width, `c` being the ratio
/// of the stress at the second nodal line to the stress at the first.
pub fn strip_stress(i: &IntegralSet, b: f64, c: f64) -> Mat8 {
    let uu = HalfBlock {
        x11: (3.0 + c) / 24.0 * i.i2 * b,
        x12: (1.0 + c) / 24.0 * i.i2 * b,
        x13: 0.0,
        x14: 0.0,
        x22: (1.0 + 3.0 * c) / 24.0 * i.i2 * b,
        x23: 0.0,
        x24: 0.0,
        x33: (3.0 + c) / 24.0 * i.i7 * b,
        x34: (1.0 + c) / 24.0 * i.i7 * b,
        x44: (1.0 + 3.0 * c) / 24.0 * i.i7 * b,
    };

    let b2 = b * b;
    let b3 = b2 * b;
    let i25 = i.i25;

    let ww = HalfBlock {
        x11: (10.0 + 3.0 * c) / 70.0 * i25 * b,
        x12: (15.0 + 7.0 * c) / 840.0 * i25 * b2,
        x13: (9.0 + 9.0 * c) / 280.0 * i25 * b,
        x14: (-7.0 - 6.0 * c) / 840.0 * i25 * b2,
        x22: (5.0 + 3.0 * c) / 1680.0 * i25 * b3,
        x23: (6.0 + 7.0 * c) / 840.0 * i25 * b2,
        x24: (-1.0 - c) / 560.0 * i25 * b3,
        x33: (3.0 + 10.0 * c) / 70.0 * i25 * b,
        x34: (-7.0 - 15.0 * c) / 840.0 * i25 * b2,
        x44: (3.0 + 5.0 * c) / 1680.0 * i25 * b3,
    };

    assemble_local_matrix(&uu, &ww)
}

/// Consistent local mass matrix of a strip
///
/// `ro` is the mass density in kg/mm³.
pub fn strip_mass(i: &IntegralSet, b: f64, t: f64, ro: f64) -> Mat8 {
    let m11 = i.i1 * b / 3.0;
    let m33 = i.i8 * b / 3.0;

    let uu = HalfBlock {
        x11: m11,
        x12: m11 / 2.0,
        x22: m11,
        x33: m33,
        x34: m33 / 2.0,
        x44: m33,
        ..HalfBlock::default()
    };

    let b2 = b * b;
    let b3 = b2 * b;

    let ww11 = 13.0 / 35.0 * b;
    let ww12 = 11.0 / 210.0 * b2;
    let ww14 = -13.0 / 420.0 * b2;
    let ww22 = 1.0 / 105.0 * b3;

    let ww = HalfBlock {
        x11: ww11,
        x12: ww12,
        x13: 9.0 / 70.0 * b,
        x14: ww14,
        x22: ww22,
        x23: -ww14,
        x24: -3.0 / 420.0 * b3,
        x33: ww11,
        x34: -ww12,
        x44: ww22,
    };

    assemble_local_matrix(&uu.scaled(t * ro), &ww.scaled(t * ro * i.i21))
}
