//! Finite strip - a shell element spanning two nodal lines over the full length

use serde::Serialize;

use super::NodalLine;
use crate::error::ConfigError;
use crate::math::{transformation_matrix, Mat8};

/// DOFs per nodal line (u, v, w, theta), and the side of every assembly block
pub const BLOCK_SIZE: usize = 4;

/// One 4x4 sub-block copy from a strip matrix into the global matrices
///
/// Both positions are block start offsets (row, col), already multiplied by
/// [`BLOCK_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssemblyBlock {
    pub global: (usize, usize),
    pub local: (usize, usize),
}

/// A finite strip connecting two nodal lines
#[derive(Debug, Clone, Serialize)]
pub struct Strip {
    /// First nodal line id
    pub node1: u32,
    /// Second nodal line id
    pub node2: u32,
    /// Material name
    pub material: String,
    /// Strip width b [mm]
    pub width: f64,
    /// Global <-> local transformation matrix
    #[serde(skip)]
    pub rotation: Mat8,
    /// Scatter-add map into the global matrices
    pub assembly: [AssemblyBlock; 4],
    /// Human readable label, e.g. "(3)"
    pub label: String,

    #[serde(skip)]
    pub(crate) material_index: usize,
}

impl Strip {
    /// Create strip number `number` (1-based) between two nodal lines
    pub(crate) fn new(
        number: usize,
        start: &NodalLine,
        end: &NodalLine,
        material: &str,
        material_index: usize,
    ) -> Result<Self, ConfigError> {
        let (dx, dz) = start.delta_to(end);
        let width = start.distance_to(end);

        if width < 1e-10 {
            return Err(ConfigError::ZeroLengthStrip(number));
        }

        Ok(Self {
            node1: start.id,
            node2: end.id,
            material: material.to_string(),
            width,
            rotation: transformation_matrix(dx, dz, width),
            assembly: assembly_blocks(start.index(), end.index()),
            label: format!("({})", number),
            material_index,
        })
    }
}

/// Block placement for a strip between global nodal line indices `p` and `q`
///
/// Produces (p,p), (p,q), (q,p), (q,q) mapped onto local blocks (0,0), (0,1),
/// (1,0), (1,1), in that order.
pub fn assembly_blocks(p: usize, q: usize) -> [AssemblyBlock; 4] {
    let nodes = [p, q];
    let block = |row: usize, col: usize| AssemblyBlock {
        global: (BLOCK_SIZE * nodes[row], BLOCK_SIZE * nodes[col]),
        local: (BLOCK_SIZE * row, BLOCK_SIZE * col),
    };

    [block(0, 0), block(0, 1), block(1, 0), block(1, 1)]
}
