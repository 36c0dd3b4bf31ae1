//! Structural elements of a finite strip model

mod material;
mod nodal_line;
mod strip;

pub use material::Material;
pub use nodal_line::NodalLine;
pub use strip::{AssemblyBlock, Strip, BLOCK_SIZE};
