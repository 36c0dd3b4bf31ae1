//! Result types for finite strip analysis

use serde::{Deserialize, Serialize};

/// Free vibration and buckling results for one `(a, t_b, m)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// Strip length [mm]
    pub a: f64,
    /// Base strip thickness [mm]
    pub t_b: f64,
    /// Mode
    pub m: u32,
    /// Natural frequency [rad/s]
    pub omega: f64,
    /// Natural frequency approximated from the critical buckling stress [rad/s]
    pub omega_approx: f64,
    /// Natural frequency relative approximation error
    pub omega_rel_err: f64,
    /// Critical buckling stress [MPa]
    pub sigma_cr: f64,
    /// Critical buckling stress approximated from the natural frequency [MPa]
    pub sigma_cr_approx: f64,
    /// Critical buckling stress relative approximation error
    pub sigma_cr_rel_err: f64,
    /// Natural frequency mode shape
    pub phi_omega: Vec<f64>,
    /// Critical buckling stress mode shape
    pub phi_sigma_cr: Vec<f64>,
    /// Mode shape relative error
    pub phi_rel_err: Vec<f64>,
}

/// The dominant mode for one `(a, t_b)`, i.e. the one with the lowest `sigma_cr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalComposite {
    /// Dominant mode
    pub m_dominant: u32,
    /// Results of the dominant mode, unchanged
    #[serde(flatten)]
    pub result: IterationResult,
}

impl ModalComposite {
    /// Pick the result with the lowest critical stress, first one on ties
    ///
    /// Returns `None` for an empty slice.
    pub fn select(results: &[IterationResult]) -> Option<Self> {
        results
            .iter()
            .min_by(|x, y| x.sigma_cr.total_cmp(&y.sigma_cr))
            .map(|dominant| Self {
                m_dominant: dominant.m,
                result: dominant.clone(),
            })
    }
}

/// Everything computed for one grid point of a parameter sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPointResult {
    /// Row-major position of the point in the `(a, t_b)` grid
    pub index: usize,
    pub a: f64,
    pub t_b: f64,
    /// One result per mode, in ascending `m`
    pub raw: Vec<IterationResult>,
    pub composite: ModalComposite,
}
