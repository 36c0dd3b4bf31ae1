//! Nodal line - a line of points along the structure's length, seen in cross-section

use serde::{Deserialize, Serialize};

/// A nodal line in the (x, z) cross-section plane, coordinates in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalLine {
    /// 1-based id, dense over the model
    pub id: u32,
    /// X coordinate [mm]
    pub x: f64,
    /// Z coordinate [mm]
    pub z: f64,
}

impl NodalLine {
    /// Create a new nodal line at the given cross-section coordinates
    pub fn new(id: u32, x: f64, z: f64) -> Self {
        Self { id, x, z }
    }

    /// Zero-based index into the global matrices' block rows
    pub fn index(&self) -> usize {
        self.id as usize - 1
    }

    /// Coordinate deltas `(dx, dz)` from this nodal line to another
    pub fn delta_to(&self, other: &NodalLine) -> (f64, f64) {
        (other.x - self.x, other.z - self.z)
    }

    /// Calculate distance to another nodal line
    pub fn distance_to(&self, other: &NodalLine) -> f64 {
        let (dx, dz) = self.delta_to(other);
        (dx * dx + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodal_line_distance() {
        let n1 = NodalLine::new(1, 0.0, 0.0);
        let n2 = NodalLine::new(2, 30.0, 40.0);
        assert!((n1.distance_to(&n2) - 50.0).abs() < 1e-10);
        assert_eq!(n2.index(), 1);
    }
}
