//! One `(a, t_b, m)` evaluation: assembly, both eigenproblems and the
//! closed-form cross-checks

use std::f64::consts::PI;

use crate::error::FsmResult;
use crate::integrals::IntegralLookup;
use crate::math::{self, governing_eigenpair, GoverningRule};
use crate::model::StripModel;
use crate::results::{IterationResult, ModalComposite};

/// Natural frequency estimated from the critical buckling stress
///
/// `omega = m pi / a * sqrt(sigma_cr / rho)`
pub fn approximate_omega(m: u32, a: f64, sigma_cr: f64, rho: f64) -> f64 {
    m as f64 * PI / a * (sigma_cr / rho).sqrt()
}

/// Critical buckling stress estimated from the natural frequency
///
/// `sigma_cr = (omega a / (m pi))^2 * rho`
pub fn approximate_sigma_cr(m: u32, a: f64, omega: f64, rho: f64) -> f64 {
    (omega * a / (m as f64 * PI)).powi(2) * rho
}

/// Compute natural frequency and critical buckling stress for one grid point
///
/// Errors are tagged with `(a, t_b, m)`.
///
/// # Arguments
/// * `model` - Strip model
/// * `lookup` - Integral store
/// * `a` - Strip length [mm]
/// * `t_b` - Base strip thickness [mm]
/// * `m` - Mode
/// * `rule` - Governing eigenvalue selection
pub fn perform_iteration<L: IntegralLookup + ?Sized>(
    model: &StripModel,
    lookup: &L,
    a: f64,
    t_b: f64,
    m: u32,
    rule: GoverningRule,
) -> FsmResult<IterationResult> {
    iterate(model, lookup, a, t_b, m, rule).map_err(|e| e.at_grid_point(a, t_b, m))
}

fn iterate<L: IntegralLookup + ?Sized>(
    model: &StripModel,
    lookup: &L,
    a: f64,
    t_b: f64,
    m: u32,
    rule: GoverningRule,
) -> FsmResult<IterationResult> {
    let global = model.assemble_global_matrices(lookup, a, t_b, m)?;

    // Free vibration: M phi = lambda K phi, omega = sqrt(1 / lambda)
    let vibration = governing_eigenpair(&global.k_hat, &global.mass, |l| (1.0 / l).sqrt(), rule)?;
    // Buckling: K_sigma phi = lambda K phi, N_cr = 1 / lambda
    let buckling = governing_eigenpair(&global.k_hat, &global.k_sigma, |l| 1.0 / l, rule)?;

    let omega = vibration.value;
    let sigma_cr = buckling.value / (2.0 * t_b);

    let rho = model.mean_density();
    let omega_approx = approximate_omega(m, a, sigma_cr, rho);
    let sigma_cr_approx = approximate_sigma_cr(m, a, omega, rho);

    let phi_rel_err = math::relative_error_vec(&vibration.shape, &buckling.shape);

    log::trace!("a={} t_b={} m={}: omega={:.6e} sigma_cr={:.6e}", a, t_b, m, omega, sigma_cr);

    Ok(IterationResult {
        a,
        t_b,
        m,
        omega,
        omega_approx,
        omega_rel_err: math::relative_error(omega, omega_approx),
        sigma_cr,
        sigma_cr_approx,
        sigma_cr_rel_err: math::relative_error(sigma_cr, sigma_cr_approx),
        phi_omega: vibration.shape.iter().copied().collect(),
        phi_sigma_cr: buckling.shape.iter().copied().collect(),
        phi_rel_err: phi_rel_err.iter().copied().collect(),
    })
}

/// The dominant mode of one `(a, t_b)`: lowest `sigma_cr`, first on ties
pub fn modal_composite(results: &[IterationResult]) -> Option<ModalComposite> {
    ModalComposite::select(results)
}
