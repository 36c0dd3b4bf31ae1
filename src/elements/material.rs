//! Orthotropic material properties

use serde::Serialize;

/// Mass density conversion from [kg/m³] to [kg/mm³]
const DENSITY_TO_MM: f64 = 1e9;

/// Material properties of a finite strip, in N/mm² and kg/mm³
///
/// The stiffness coefficients `k_x`, `k_y`, `k_1` and `k_xy` are derived once
/// at construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    /// Young's modulus along the strip length [MPa]
    pub e_x: f64,
    /// Young's modulus across the strip width [MPa]
    pub e_y: f64,
    /// Poisson's ratio mu_x
    pub mu_x: f64,
    /// Poisson's ratio mu_y
    pub mu_y: f64,
    /// In-plane shear modulus [MPa]
    pub g_xy: f64,
    /// Mass density [kg/mm³]
    pub ro: f64,
    /// Ratio of the edge stresses across the strip width
    pub c: f64,
    /// Strip thickness relative to the base thickness `t_b`
    pub t_s: f64,

    k_x: f64,
    k_y: f64,
    k_1: f64,
    k_xy: f64,
}

impl Material {
    /// Create a new material, `ro` given in kg/m³
    #[allow(clippy::too_many_arguments)]
    pub fn new(e_x: f64, e_y: f64, mu_x: f64, mu_y: f64, g_xy: f64, ro: f64, c: f64, t_s: f64) -> Self {
        let mu_xy = 1.0 - mu_x * mu_y;
        let k_y = e_y / mu_xy;

        Self {
            e_x,
            e_y,
            mu_x,
            mu_y,
            g_xy,
            ro: ro / DENSITY_TO_MM,
            c,
            t_s,
            k_x: e_x / mu_xy,
            k_y,
            k_1: mu_x * k_y,
            k_xy: g_xy,
        }
    }

    /// Isotropic material under uniform stress (`c = 1`, `t_s = 1`)
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, ro: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, e, nu, nu, g, ro, 1.0, 1.0)
    }

    /// Structural steel, E = 210 GPa
    pub fn steel() -> Self {
        Self::isotropic(210_000.0, 0.3, 7850.0)
    }

    /// Set the edge stress ratio
    pub fn with_stress_ratio(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the thickness ratio
    pub fn with_thickness_ratio(mut self, t_s: f64) -> Self {
        self.t_s = t_s;
        self
    }

    /// Stiffness coefficient K_x = E_x / (1 - mu_x mu_y)
    pub fn k_x(&self) -> f64 {
        self.k_x
    }

    /// Stiffness coefficient K_y = E_y / (1 - mu_x mu_y)
    pub fn k_y(&self) -> f64 {
        self.k_y
    }

    /// Stiffness coefficient K_1 = mu_x K_y
    pub fn k_1(&self) -> f64 {
        self.k_1
    }

    /// Stiffness coefficient K_xy = G_xy
    pub fn k_xy(&self) -> f64 {
        self.k_xy
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
