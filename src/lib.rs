//! FSM Eigenvalue - buckling and free vibration of prismatic shell structures
//!
//! A cross-section is modeled as nodal lines connected by finite strips that
//! span the full length of the structure (the Harmonic Coupled Finite Strip
//! Method). For every strip length `a`, base thickness `t_b` and mode `m` the
//! library:
//! - assembles the global stiffness, stress and mass matrices
//! - solves the free vibration and buckling eigenproblems
//! - cross-checks both against their closed-form approximations
//!
//! and reduces all modes of an `(a, t_b)` pair to its dominant mode.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fsm_eigenvalue::prelude::*;
//!
//! let model = StripModel::build(
//!     vec![NodalLine::new(1, 0.0, 0.0), NodalLine::new(2, 100.0, 0.0)],
//!     &[StripSpec::new(1, 2, "steel")],
//!     vec![("steel".to_string(), Material::steel())],
//!     BeamType::SimplySupported,
//! )
//! .unwrap();
//!
//! let space = SearchSpace::from_ranges([100.0, 300.0, 100.0], [1.0, 2.0, 1.0], [1.0, 2.0, 1.0]).unwrap();
//! let integrals = Arc::new(IntegralTable::simply_supported(space.m.iter().copied()));
//!
//! for point in sweep(&space, Arc::new(model), integrals, &SweepOptions::default()).unwrap() {
//!     let point = point.unwrap();
//!     println!("a={} t_b={} m={}", point.a, point.t_b, point.composite.m_dominant);
//! }
//! ```

pub mod analysis;
pub mod beam;
pub mod elements;
pub mod error;
pub mod integrals;
pub mod loader;
pub mod math;
pub mod model;
pub mod results;
pub mod store;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{modal_composite, perform_iteration, sweep, SearchSpace, Sweep, SweepOptions};
    pub use crate::beam::BeamType;
    pub use crate::elements::{Material, NodalLine, Strip};
    pub use crate::error::{FsmError, FsmResult};
    pub use crate::integrals::{IntegralDbFile, IntegralLookup, IntegralSource, IntegralTable};
    pub use crate::loader::{load_data_file, DataFile};
    pub use crate::math::GoverningRule;
    pub use crate::model::{GlobalMatrices, StripModel, StripSpec};
    pub use crate::results::{GridPointResult, IterationResult, ModalComposite};
    pub use crate::store::ResultsWriter;
}
