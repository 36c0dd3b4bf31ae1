//! Strip model - the frozen geometry graph and global matrix assembly

use std::collections::HashMap;

use crate::beam::BeamType;
use crate::elements::{Material, NodalLine, Strip, BLOCK_SIZE};
use crate::error::{ConfigError, FsmResult};
use crate::integrals::{IntegralLookup, IntegralSet};
use crate::math::{self, Mat, Mat8};

/// Strip connectivity as given by a model description: `(node1, node2, material)`
#[derive(Debug, Clone, PartialEq)]
pub struct StripSpec {
    pub node1: u32,
    pub node2: u32,
    pub material: String,
}

impl StripSpec {
    pub fn new(node1: u32, node2: u32, material: &str) -> Self {
        Self {
            node1,
            node2,
            material: material.to_string(),
        }
    }
}

/// Global stiffness, stress and mass matrices, each `4N x 4N`
#[derive(Debug, Clone)]
pub struct GlobalMatrices {
    /// Stiffness matrix K_hat
    pub k_hat: Mat,
    /// Stress (geometric stiffness) matrix K_sigma
    pub k_sigma: Mat,
    /// Mass matrix M
    pub mass: Mat,
}

impl GlobalMatrices {
    fn zeros(size: usize) -> Self {
        Self {
            k_hat: Mat::zeros(size, size),
            k_sigma: Mat::zeros(size, size),
            mass: Mat::zeros(size, size),
        }
    }
}

/// A prismatic shell cross-section: nodal lines connected by finite strips
///
/// Nodal lines live in an arena indexed by `id - 1`; strips refer to them by
/// id. The model cannot be changed once built, so it can be shared between
/// sweep workers.
#[derive(Debug, Clone)]
pub struct StripModel {
    nodal_lines: Vec<NodalLine>,
    strips: Vec<Strip>,
    materials: Vec<Material>,
    material_names: Vec<String>,
    beam_type: BeamType,
}

impl StripModel {
    /// Build and validate a model
    ///
    /// Nodal line ids must be dense `1..=N` and material names unique. Every
    /// strip must reference existing nodal lines and materials and have a
    /// non-zero width.
    pub fn build(
        nodal_lines: Vec<NodalLine>,
        strips: &[StripSpec],
        materials: Vec<(String, Material)>,
        beam_type: BeamType,
    ) -> FsmResult<Self> {
        let mut nodal_lines = nodal_lines;
        nodal_lines.sort_by_key(|n| n.id);

        for pair in nodal_lines.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(ConfigError::DuplicateNode(pair[0].id).into());
            }
        }
        for (index, node) in nodal_lines.iter().enumerate() {
            if node.id as usize != index + 1 {
                return Err(ConfigError::SparseNodeIds {
                    expected: nodal_lines.len(),
                    found: node.id,
                }
                .into());
            }
        }

        if strips.is_empty() {
            return Err(ConfigError::NoStrips.into());
        }

        let (material_names, materials): (Vec<String>, Vec<Material>) = materials.into_iter().unzip();
        let mut material_lookup: HashMap<&str, usize> = HashMap::with_capacity(material_names.len());
        for (i, name) in material_names.iter().enumerate() {
            if material_lookup.insert(name.as_str(), i).is_some() {
                return Err(ConfigError::DuplicateMaterial(name.clone()).into());
            }
        }

        let node = |id: u32| -> Result<&NodalLine, ConfigError> {
            match id {
                0 => Err(ConfigError::NodeNotFound(id)),
                _ => nodal_lines.get(id as usize - 1).ok_or(ConfigError::NodeNotFound(id)),
            }
        };

        let mut built = Vec::with_capacity(strips.len());
        for (number, spec) in (1..).zip(strips) {
            let start = node(spec.node1)?;
            let end = node(spec.node2)?;
            let material_index = *material_lookup
                .get(spec.material.as_str())
                .ok_or_else(|| ConfigError::MaterialNotFound(spec.material.clone()))?;

            built.push(Strip::new(number, start, end, &spec.material, material_index)?);
        }

        log::debug!(
            "Built strip model: {} nodal lines, {} strips, {} materials",
            nodal_lines.len(),
            built.len(),
            materials.len()
        );

        Ok(Self {
            nodal_lines,
            strips: built,
            materials,
            material_names,
            beam_type,
        })
    }

    pub fn nodal_lines(&self) -> &[NodalLine] {
        &self.nodal_lines
    }

    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    pub fn beam_type(&self) -> BeamType {
        self.beam_type
    }

    /// Material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.material_names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.materials[i])
    }

    /// Material assigned to a strip
    pub fn strip_material(&self, strip: &Strip) -> &Material {
        &self.materials[strip.material_index]
    }

    /// Size of the global matrices, 4 DOFs per nodal line
    pub fn dof_count(&self) -> usize {
        BLOCK_SIZE * self.nodal_lines.len()
    }

    /// Mean mass density over all materials [kg/mm³]
    pub fn mean_density(&self) -> f64 {
        if self.materials.is_empty() {
            return 0.0;
        }
        self.materials.iter().map(|m| m.ro).sum::<f64>() / self.materials.len() as f64
    }

    /// Assemble the global matrices for one mode
    ///
    /// # Arguments
    /// * `integrals` - Scaled integrals of the mode
    /// * `a_mu` - Strip length over the mode's characteristic root
    /// * `t_b` - Base strip thickness [mm]
    pub fn assemble(&self, integrals: &IntegralSet, a_mu: f64, t_b: f64) -> GlobalMatrices {
        let mut global = GlobalMatrices::zeros(self.dof_count());

        for strip in &self.strips {
            let material = self.strip_material(strip);
            let t = t_b * material.t_s;
            let b = strip.width;

            let k_hat = math::strip_stiffness(
                integrals,
                a_mu,
                b,
                t,
                material.k_x(),
                material.k_y(),
                material.k_1(),
                material.k_xy(),
            );
            let k_sigma = math::strip_stress(integrals, b, material.c);
            let mass = math::strip_mass(integrals, b, t, material.ro);

            // Local to global: R^T * X * R
            let r = &strip.rotation;
            let k_hat = r.transpose() * k_hat * r;
            let k_sigma = r.transpose() * k_sigma * r;
            let mass = r.transpose() * mass * r;

            scatter_add(&mut global.k_hat, &k_hat, strip);
            scatter_add(&mut global.k_sigma, &k_sigma, strip);
            scatter_add(&mut global.mass, &mass, strip);
        }

        global
    }

    /// Fetch the integrals and characteristic root for `(a, m)` and assemble
    pub fn assemble_global_matrices<L: IntegralLookup + ?Sized>(
        &self,
        lookup: &L,
        a: f64,
        t_b: f64,
        m: u32,
    ) -> FsmResult<GlobalMatrices> {
        let integrals = IntegralSet::fetch(lookup, a, m)?;
        let mu_m = self.beam_type.characteristic_root(m)?;

        Ok(self.assemble(&integrals, a / mu_m, t_b))
    }
}

/// Add the strip's 4x4 blocks into a global matrix
fn scatter_add(global: &mut Mat, local: &Mat8, strip: &Strip) {
    for block in &strip.assembly {
        let (gr, gc) = block.global;
        let (lr, lc) = block.local;
        for i in 0..BLOCK_SIZE {
            for j in 0..BLOCK_SIZE {
                global[(gr + i, gc + j)] += local[(lr + i, lc + j)];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsmError;
    use crate::integrals::IntegralTable;
    use approx::assert_relative_eq;

    fn channel_nodes() -> Vec<NodalLine> {
        vec![
            NodalLine::new(1, 0.0, 50.0),
            NodalLine::new(2, 0.0, 0.0),
            NodalLine::new(3, 80.0, 0.0),
            NodalLine::new(4, 80.0, 50.0),
        ]
    }

    fn channel_strips() -> Vec<StripSpec> {
        vec![
            StripSpec::new(1, 2, "steel"),
            StripSpec::new(2, 3, "steel"),
            StripSpec::new(3, 4, "steel"),
        ]
    }

    fn channel() -> StripModel {
        StripModel::build(
            channel_nodes(),
            &channel_strips(),
            vec![("steel".to_string(), Material::steel())],
            BeamType::SimplySupported,
        )
        .unwrap()
    }

    #[test]
    fn test_build_channel() {
        let model = channel();
        assert_eq!(model.dof_count(), 16);
        assert_eq!(model.strips().len(), 3);
        assert_relative_eq!(model.strips()[0].width, 50.0);
        assert_relative_eq!(model.strips()[1].width, 80.0);
        assert_eq!(model.strips()[2].assembly[1].global, (8, 12));
        assert!(model.material("steel").is_some());
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let strips = vec![StripSpec::new(1, 5, "steel")];
        let err = StripModel::build(
            channel_nodes(),
            &strips,
            vec![("steel".to_string(), Material::steel())],
            BeamType::SimplySupported,
        )
        .unwrap_err();
        assert!(matches!(err, FsmError::Config(ConfigError::NodeNotFound(5))));
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let err = StripModel::build(
            channel_nodes(),
            &channel_strips(),
            vec![("aluminium".to_string(), Material::steel())],
            BeamType::SimplySupported,
        )
        .unwrap_err();
        assert!(matches!(err, FsmError::Config(ConfigError::MaterialNotFound(_))));
    }

    #[test]
    fn test_duplicate_material_is_rejected() {
        let err = StripModel::build(
            channel_nodes(),
            &channel_strips(),
            vec![
                ("steel".to_string(), Material::steel()),
                ("steel".to_string(), Material::steel().with_stress_ratio(0.5)),
            ],
            BeamType::SimplySupported,
        )
        .unwrap_err();
        assert!(matches!(err, FsmError::Config(ConfigError::DuplicateMaterial(ref name)) if name == "steel"));
    }

    #[test]
    fn test_thickness_ratio_scales_strip_thickness() {
        let table = IntegralTable::simply_supported([1]);
        let build = |material: Material| {
            StripModel::build(
                channel_nodes(),
                &channel_strips(),
                vec![("steel".to_string(), material)],
                BeamType::SimplySupported,
            )
            .unwrap()
        };

        let thick = build(Material::steel().with_thickness_ratio(2.0))
            .assemble_global_matrices(&table, 400.0, 1.0, 1)
            .unwrap();
        let reference = build(Material::steel()).assemble_global_matrices(&table, 400.0, 2.0, 1).unwrap();

        assert_relative_eq!(thick.k_hat, reference.k_hat, max_relative = 1e-12);
        assert_relative_eq!(thick.mass, reference.mass, max_relative = 1e-12);
        assert_relative_eq!(thick.k_sigma, reference.k_sigma, max_relative = 1e-12);
    }

    #[test]
    fn test_sparse_node_ids_are_rejected() {
        let nodes = vec![NodalLine::new(1, 0.0, 0.0), NodalLine::new(3, 10.0, 0.0)];
        let err = StripModel::build(
            nodes,
            &[StripSpec::new(1, 3, "steel")],
            vec![("steel".to_string(), Material::steel())],
            BeamType::SimplySupported,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FsmError::Config(ConfigError::SparseNodeIds { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_global_matrices_are_symmetric() {
        let model = channel();
        let table = IntegralTable::simply_supported(1..=2);
        let global = model.assemble_global_matrices(&table, 600.0, 1.5, 2).unwrap();

        for matrix in [&global.k_hat, &global.k_sigma, &global.mass] {
            assert_eq!(matrix.nrows(), 16);
            let scale = matrix.amax();
            assert_relative_eq!(*matrix, matrix.transpose(), epsilon = 1e-12 * scale);
        }
    }

    #[test]
    fn test_assembly_is_independent_of_strip_order() {
        let table = IntegralTable::simply_supported([1]);
        let forward = channel().assemble_global_matrices(&table, 400.0, 1.0, 1).unwrap();

        let mut reversed_strips = channel_strips();
        reversed_strips.reverse();
        let reversed = StripModel::build(
            channel_nodes(),
            &reversed_strips,
            vec![("steel".to_string(), Material::steel())],
            BeamType::SimplySupported,
        )
        .unwrap()
        .assemble_global_matrices(&table, 400.0, 1.0, 1)
        .unwrap();

        for (a, b) in [
            (&forward.k_hat, &reversed.k_hat),
            (&forward.k_sigma, &reversed.k_sigma),
            (&forward.mass, &reversed.mass),
        ] {
            assert_relative_eq!(*a, *b, epsilon = 1e-12 * a.amax());
        }
    }

    #[test]
    fn test_shared_nodal_line_accumulates_both_strips() {
        let model = channel();
        let table = IntegralTable::simply_supported([1]);
        let integrals = IntegralSet::fetch(&table, 500.0, 1).unwrap();
        let a_mu = 500.0 / std::f64::consts::PI;
        let global = model.assemble(&integrals, a_mu, 1.0);

        // nodal line 1 belongs to strip (1) only: its mass block equals the
        // rotated local block of that strip
        let strip = &model.strips()[0];
        let steel = model.strip_material(strip);
        let local = math::strip_mass(&integrals, strip.width, 1.0, steel.ro);
        let rotated = strip.rotation.transpose() * local * strip.rotation;
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(global.mass[(i, j)], rotated[(i, j)], max_relative = 1e-12);
            }
        }

        // nodal line 2 is shared by strips (1) and (2)
        assert!(global.mass[(4, 4)] > rotated[(4, 4)]);
    }
}
