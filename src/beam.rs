//! Longitudinal boundary conditions and their characteristic equations

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FsmResult, NumericalError};

const ROOT_TOLERANCE: f64 = 1e-14;
const ROOT_MAX_ITERATIONS: usize = 100;

/// Support conditions at the two ends of the prismatic structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamType {
    /// Simply supported at both ends, `sin(mu) = 0`
    SimplySupported,
    /// Clamped at both ends, `cos(mu) cosh(mu) = 1`
    ClampedClamped,
    /// Cantilever, `cos(mu) cosh(mu) = -1`
    ClampedFree,
    /// Clamped at one end, simply supported at the other, `tan(mu) = tanh(mu)`
    ClampedSimplySupported,
    /// Simply supported at one end, free at the other, `tan(mu) = tanh(mu)`
    SimplySupportedFree,
    /// Free at both ends, `cos(mu) cosh(mu) = 1` without the rigid body modes
    FreeFree,
}

impl BeamType {
    /// Resolve a numeric beam type id as used in data files
    pub fn from_id(id: u32) -> Result<Self, ConfigError> {
        match id {
            1 => Ok(Self::SimplySupported),
            2 => Ok(Self::ClampedClamped),
            3 => Ok(Self::ClampedFree),
            4 => Ok(Self::ClampedSimplySupported),
            5 => Ok(Self::SimplySupportedFree),
            6 => Ok(Self::FreeFree),
            other => Err(ConfigError::UnknownBeamType(other)),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::SimplySupported => 1,
            Self::ClampedClamped => 2,
            Self::ClampedFree => 3,
            Self::ClampedSimplySupported => 4,
            Self::SimplySupportedFree => 5,
            Self::FreeFree => 6,
        }
    }

    /// Asymptotic approximation of the m-th root, used as the Newton start
    fn root_estimate(&self, m: f64) -> f64 {
        match self {
            Self::SimplySupported => m * PI,
            Self::ClampedClamped | Self::FreeFree => (2.0 * m + 1.0) * PI / 2.0,
            Self::ClampedFree => (2.0 * m - 1.0) * PI / 2.0,
            Self::ClampedSimplySupported | Self::SimplySupportedFree => (4.0 * m + 1.0) * PI / 4.0,
        }
    }

    /// Characteristic equation divided by `cosh(mu)`, and its derivative
    fn residual(&self, mu: f64) -> (f64, f64) {
        let (sin, cos) = mu.sin_cos();
        let cosh = mu.cosh();
        let tanh = mu.tanh();
        let sech = 1.0 / cosh;

        match self {
            Self::SimplySupported => (sin, cos),
            Self::ClampedClamped | Self::FreeFree => (cos - sech, -sin + tanh * sech),
            Self::ClampedFree => (cos + sech, -sin - tanh * sech),
            Self::ClampedSimplySupported | Self::SimplySupportedFree => (
                sin - cos * tanh,
                cos + sin * tanh - cos * sech * sech,
            ),
        }
    }

    /// The m-th positive root `mu_m` of the characteristic equation
    pub fn characteristic_root(&self, m: u32) -> FsmResult<f64> {
        if m == 0 {
            return Err(ConfigError::InvalidInput("mode numbers start at 1".to_string()).into());
        }

        let estimate = self.root_estimate(m as f64);
        if *self == Self::SimplySupported {
            return Ok(estimate);
        }

        let mut mu = estimate;
        for _ in 0..ROOT_MAX_ITERATIONS {
            let (f, df) = self.residual(mu);
            let step = f / df;
            mu -= step;

            if step.abs() <= ROOT_TOLERANCE * mu.abs() {
                // stay on the requested branch
                if (mu - estimate).abs() < PI / 2.0 {
                    return Ok(mu);
                }
                break;
            }
        }

        Err(NumericalError::RootNotConverged { mode: m }.into())
    }
}

impl Default for BeamType {
    fn default() -> Self {
        Self::SimplySupported
    }
}
