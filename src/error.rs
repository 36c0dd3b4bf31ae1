//! Error types for the finite strip solver

use thiserror::Error;

/// Invalid model, material or search space input.
///
/// Always raised before any computation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Nodal line {0} not found in model")]
    NodeNotFound(u32),

    #[error("Duplicate nodal line id {0}")]
    DuplicateNode(u32),

    #[error("Nodal line ids must be dense 1..={expected}, found {found}")]
    SparseNodeIds { expected: usize, found: u32 },

    #[error("Duplicate material '{0}'")]
    DuplicateMaterial(String),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Strip {0} has zero length")]
    ZeroLengthStrip(usize),

    #[error("Model has no finite strips")]
    NoStrips,

    #[error("Invalid search space '{name}': {reason}")]
    InvalidSearchSpace { name: String, reason: String },

    #[error("Unknown beam type id {0}")]
    UnknownBeamType(u32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Integral value missing or ambiguous in the lookup store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("No integral I{integral} for m={m:?}, n={n:?}, t={t:?}, v={v:?}")]
    NotFound {
        integral: u8,
        m: Option<u32>,
        n: Option<u32>,
        t: Option<u32>,
        v: Option<u32>,
    },

    #[error("{count} matches for integral I{integral} with m={m:?}, n={n:?}, t={t:?}, v={v:?}")]
    NotUnique {
        integral: u8,
        m: Option<u32>,
        n: Option<u32>,
        t: Option<u32>,
        v: Option<u32>,
        count: usize,
    },
}

/// Numerical failure inside the solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    #[error("Stiffness matrix is not positive definite (Cholesky factorization failed)")]
    NotPositiveDefinite,

    #[error("Matrix dimension mismatch: {0}x{0} vs {1}x{2}")]
    DimensionMismatch(usize, usize, usize),

    #[error("Characteristic root for mode {mode} did not converge")]
    RootNotConverged { mode: u32 },

    #[error("Triangular factor is singular")]
    SingularFactor,

    #[error("No governing eigenvalue (all eigenvalues are NaN)")]
    NoGoverningEigenvalue,
}

/// Main error type for finite strip operations
#[derive(Error, Debug)]
pub enum FsmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),

    #[error("Grid point (a={a}, t_b={t_b}, m={m}) failed: {source}")]
    GridPoint {
        a: f64,
        t_b: f64,
        m: u32,
        #[source]
        source: Box<FsmError>,
    },

    #[error("Sweep worker panicked")]
    WorkerPanicked,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data file error: {0}")]
    DataFileError(#[from] serde_yaml::Error),
}

impl FsmError {
    /// Attach the failing grid coordinates to an error
    pub fn at_grid_point(self, a: f64, t_b: f64, m: u32) -> Self {
        match self {
            already @ FsmError::GridPoint { .. } => already,
            other => FsmError::GridPoint {
                a,
                t_b,
                m,
                source: Box::new(other),
            },
        }
    }

    /// The `(a, t_b, m)` triple this error was raised for, if any
    pub fn grid_point(&self) -> Option<(f64, f64, u32)> {
        match self {
            FsmError::GridPoint { a, t_b, m, .. } => Some((*a, *t_b, *m)),
            _ => None,
        }
    }
}

/// Result type for finite strip operations
pub type FsmResult<T> = Result<T, FsmError>;
