//! YAML data files describing a parametric strip model
//!
//! ```yaml
//! geometry:
//!   beam_type_id: 1
//!   nodal_lines:
//!     1: [0, 0]
//!     2: [100, 0]
//!   finite_strips:
//!     - [1, 2, steel]
//! materials:
//!   steel: {E_x: 210000, E_y: 210000, mu_x: 0.3, mu_y: 0.3, G_xy: 80769.23, ro: 7850, c: 1, t_s: 1}
//! search_space:
//!   a: [100, 1000, 100]
//!   t_b: [1, 2, 0.5]
//!   m: [1, 5, 1]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::SearchSpace;
use crate::beam::BeamType;
use crate::elements::{Material, NodalLine};
use crate::error::{ConfigError, FsmResult};
use crate::model::{StripModel, StripSpec};

/// Material reference, either a name or a numeric id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialKey {
    Id(i64),
    Name(String),
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKey::Id(id) => write!(f, "{}", id),
            MaterialKey::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub beam_type_id: u32,
    /// Nodal line id to `[x, z]` [mm]
    pub nodal_lines: BTreeMap<u32, [f64; 2]>,
    /// `[node1, node2, material]`
    pub finite_strips: Vec<(u32, u32, MaterialKey)>,
}

/// Material constants as written in a data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialData {
    #[serde(rename = "E_x")]
    pub e_x: f64,
    #[serde(rename = "E_y")]
    pub e_y: f64,
    pub mu_x: f64,
    pub mu_y: f64,
    #[serde(rename = "G_xy")]
    pub g_xy: f64,
    /// Mass density [kg/m³]
    pub ro: f64,
    #[serde(default = "unit_ratio")]
    pub c: f64,
    #[serde(default = "unit_ratio")]
    pub t_s: f64,
}

fn unit_ratio() -> f64 {
    1.0
}

impl MaterialData {
    fn to_material(&self, key: &MaterialKey) -> Result<Material, ConfigError> {
        let positive = [("E_x", self.e_x), ("E_y", self.e_y), ("G_xy", self.g_xy), ("ro", self.ro), ("t_s", self.t_s)];
        if let Some((name, _)) = positive.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::InvalidInput(format!("material '{}': {} must be positive", key, name)));
        }
        if self.mu_x * self.mu_y >= 1.0 {
            return Err(ConfigError::InvalidInput(format!(
                "material '{}': mu_x * mu_y must be less than 1",
                key
            )));
        }

        Ok(Material::new(
            self.e_x, self.e_y, self.mu_x, self.mu_y, self.g_xy, self.ro, self.c, self.t_s,
        ))
    }
}

/// `[start, stop, step]` of every swept parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSpaceRanges {
    pub a: [f64; 3],
    pub t_b: [f64; 3],
    pub m: [f64; 3],
}

/// A parsed data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    pub geometry: Geometry,
    pub materials: BTreeMap<MaterialKey, MaterialData>,
    pub search_space: SearchSpaceRanges,
}

/// A validated model ready for a sweep
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub model: StripModel,
    pub search_space: SearchSpace,
    /// Verbatim data file contents
    pub contents: String,
}

impl DataFile {
    pub fn from_yaml_str(yaml: &str) -> FsmResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate and build the strip model and search space
    pub fn build(&self) -> FsmResult<(StripModel, SearchSpace)> {
        let beam_type = BeamType::from_id(self.geometry.beam_type_id)?;

        let search_space = SearchSpace::from_ranges(self.search_space.a, self.search_space.t_b, self.search_space.m)?;

        let nodal_lines = self
            .geometry
            .nodal_lines
            .iter()
            .map(|(&id, &[x, z])| NodalLine::new(id, x, z))
            .collect();

        let strips: Vec<StripSpec> = self
            .geometry
            .finite_strips
            .iter()
            .map(|(node1, node2, material)| StripSpec::new(*node1, *node2, &material.to_string()))
            .collect();

        let materials = self
            .materials
            .iter()
            .map(|(key, data)| Ok((key.to_string(), data.to_material(key)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let model = StripModel::build(nodal_lines, &strips, materials, beam_type)?;

        Ok((model, search_space))
    }
}

/// Read, parse and validate a data file
pub fn load_data_file(path: impl AsRef<Path>) -> FsmResult<LoadedData> {
    let path = path.as_ref();
    log::info!("Loading data file '{}'", path.display());

    let contents = fs::read_to_string(path)?;
    let (model, search_space) = DataFile::from_yaml_str(&contents)?.build()?;

    log::info!(
        "Loaded {} nodal lines, {} strips, {} x {} x {} search space",
        model.nodal_lines().len(),
        model.strips().len(),
        search_space.a.len(),
        search_space.t_b.len(),
        search_space.m.len()
    );

    Ok(LoadedData {
        model,
        search_space,
        contents,
    })
}
