//! Definite integrals of the longitudinal basis functions
//!
//! The strip matrices need integrals such as `∫ Y_m Y_n dy` over the strip
//! length. They are stored normalized to a unit length together with the
//! exponent of `a` that scales them back, and are looked up by integral number
//! and mode indices with exactly-one-match semantics.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FsmResult, LookupError};

/// Lookup key of a single normalized integral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegralKey {
    /// Integral number, e.g. `1` for I1
    pub integral: u8,
    #[serde(default)]
    pub m: Option<u32>,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub t: Option<u32>,
    #[serde(default)]
    pub v: Option<u32>,
}

impl IntegralKey {
    /// Key of an integral over a single mode pair `m = n`
    pub fn diagonal(integral: u8, mode: u32) -> Self {
        Self {
            integral,
            m: Some(mode),
            n: Some(mode),
            t: None,
            v: None,
        }
    }

    fn not_found(&self) -> LookupError {
        LookupError::NotFound {
            integral: self.integral,
            m: self.m,
            n: self.n,
            t: self.t,
            v: self.v,
        }
    }

    fn not_unique(&self, count: usize) -> LookupError {
        LookupError::NotUnique {
            integral: self.integral,
            m: self.m,
            n: self.n,
            t: self.t,
            v: self.v,
            count,
        }
    }
}

/// An integral normalized to unit length, value = `value * a^scale_factor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIntegral {
    pub value: f64,
    pub scale_factor: i32,
}

impl NormalizedIntegral {
    /// Scale to a strip of length `a`
    pub fn scale(&self, a: f64) -> f64 {
        self.value * a.powi(self.scale_factor)
    }
}

/// Read access to a store of normalized integrals
pub trait IntegralLookup {
    /// Find the single record matching `key`
    fn lookup(&self, key: &IntegralKey) -> Result<NormalizedIntegral, LookupError>;

    /// Integral `integral` for mode `m = n`, scaled to strip length `a`
    fn scaled(&self, integral: u8, a: f64, mode: u32) -> FsmResult<f64> {
        let normalized = self.lookup(&IntegralKey::diagonal(integral, mode))?;
        Ok(normalized.scale(a))
    }
}

impl<T: IntegralLookup + ?Sized> IntegralLookup for Arc<T> {
    fn lookup(&self, key: &IntegralKey) -> Result<NormalizedIntegral, LookupError> {
        (**self).lookup(key)
    }
}

/// Something a sweep worker can open its own integral handle from
///
/// `open` is called once per worker thread, at worker startup.
pub trait IntegralSource: Send + Sync {
    type Handle: IntegralLookup;

    fn open(&self) -> FsmResult<Self::Handle>;
}

/// One row of an integral table file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegralRecord {
    #[serde(flatten)]
    pub key: IntegralKey,
    pub value: f64,
    pub scale_factor: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct IntegralTableFile {
    integrals: Vec<IntegralRecord>,
}

/// In-memory integral table
///
/// Duplicated keys are kept so that a lookup hitting them fails instead of
/// silently picking one.
#[derive(Debug, Clone, Default)]
pub struct IntegralTable {
    rows: HashMap<IntegralKey, Vec<NormalizedIntegral>>,
}

impl IntegralTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records
    pub fn from_records(records: impl IntoIterator<Item = IntegralRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.insert(record);
        }
        table
    }

    /// Add a record, keeping any existing record with the same key
    pub fn insert(&mut self, record: IntegralRecord) {
        self.rows.entry(record.key).or_default().push(NormalizedIntegral {
            value: record.value,
            scale_factor: record.scale_factor,
        });
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a JSON table `{"integrals": [{"integral": 1, "m": 1, "n": 1, "value": .., "scale_factor": ..}]}`
    pub fn from_json_str(json: &str) -> FsmResult<Self> {
        let file: IntegralTableFile = serde_json::from_str(json)?;
        Ok(Self::from_records(file.integrals))
    }

    /// Read and parse a JSON table file
    pub fn from_json_file(path: impl AsRef<Path>) -> FsmResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Closed-form integrals of a simply supported beam, `Y_m = sin(m pi y / a)`
    ///
    /// I1 = ∫ Y Y, I2 = ∫ Y' Y', I3 = ∫ Y Y'', I5 = ∫ Y'' Y, I7 = ∫ Y'' Y''
    pub fn simply_supported(modes: impl IntoIterator<Item = u32>) -> Self {
        let mut table = Self::new();
        for mode in modes {
            let k2 = (mode as f64 * PI).powi(2);
            for (integral, value, scale_factor) in [
                (1, 0.5, 1),
                (2, k2 / 2.0, -1),
                (3, -k2 / 2.0, -1),
                (5, -k2 / 2.0, -1),
                (7, k2 * k2 / 2.0, -3),
            ] {
                table.insert(IntegralRecord {
                    key: IntegralKey::diagonal(integral, mode),
                    value,
                    scale_factor,
                });
            }
        }
        table
    }
}

impl IntegralLookup for IntegralTable {
    fn lookup(&self, key: &IntegralKey) -> Result<NormalizedIntegral, LookupError> {
        match self.rows.get(key).map(Vec::as_slice) {
            None | Some([]) => Err(key.not_found()),
            Some([single]) => Ok(*single),
            Some(many) => Err(key.not_unique(many.len())),
        }
    }
}

impl IntegralSource for Arc<IntegralTable> {
    type Handle = Arc<IntegralTable>;

    fn open(&self) -> FsmResult<Self::Handle> {
        Ok(Arc::clone(self))
    }
}

/// Integral table file, opened independently by every worker
#[derive(Debug, Clone)]
pub struct IntegralDbFile {
    path: PathBuf,
}

impl IntegralDbFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntegralSource for IntegralDbFile {
    type Handle = IntegralTable;

    fn open(&self) -> FsmResult<Self::Handle> {
        log::debug!("Opening integral db '{}'", self.path.display());
        IntegralTable::from_json_file(&self.path)
    }
}

/// The scaled integrals needed to evaluate one mode on strips of length `a`
///
/// Several integrals share a value: I1 = I21, I2 = I6 = I8 = I25,
/// I3 = I22, I5 = I23 and I7 = I24.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegralSet {
    pub i1: f64,
    pub i2: f64,
    pub i3: f64,
    pub i5: f64,
    pub i6: f64,
    pub i7: f64,
    pub i8: f64,
    pub i21: f64,
    pub i22: f64,
    pub i23: f64,
    pub i24: f64,
    pub i25: f64,
}

impl IntegralSet {
    /// Build the full set from the five distinct values
    pub fn new(i1: f64, i2: f64, i3: f64, i5: f64, i7: f64) -> Self {
        Self {
            i1,
            i2,
            i3,
            i5,
            i6: i2,
            i7,
            i8: i2,
            i21: i1,
            i22: i3,
            i23: i5,
            i24: i7,
            i25: i2,
        }
    }

    /// Look up and scale all integrals for mode `m` and strip length `a`
    pub fn fetch<L: IntegralLookup + ?Sized>(lookup: &L, a: f64, m: u32) -> FsmResult<Self> {
        Ok(Self::new(
            lookup.scaled(1, a, m)?,
            lookup.scaled(2, a, m)?,
            lookup.scaled(3, a, m)?,
            lookup.scaled(5, a, m)?,
            lookup.scaled(7, a, m)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsmError;
    use approx::assert_relative_eq;

    #[test]
    fn test_simply_supported_integrals_scale_with_length() {
        let table = IntegralTable::simply_supported(1..=3);
        assert_eq!(table.len(), 15);

        let a = 250.0;
        let set = IntegralSet::fetch(&table, a, 2).unwrap();
        let k = 2.0 * PI / a;

        assert_relative_eq!(set.i1, a / 2.0, max_relative = 1e-14);
        assert_relative_eq!(set.i2, k * k * a / 2.0, max_relative = 1e-14);
        assert_relative_eq!(set.i3, -k * k * a / 2.0, max_relative = 1e-14);
        assert_relative_eq!(set.i7, k.powi(4) * a / 2.0, max_relative = 1e-14);
        assert_eq!(set.i21, set.i1);
        assert_eq!(set.i25, set.i2);
        assert_eq!(set.i6, set.i8);
        assert_eq!(set.i24, set.i7);
    }

    #[test]
    fn test_missing_integral_is_a_lookup_error() {
        let table = IntegralTable::simply_supported([1]);
        let err = IntegralSet::fetch(&table, 100.0, 4).unwrap_err();
        assert!(matches!(
            err,
            FsmError::Lookup(LookupError::NotFound { integral: 1, m: Some(4), .. })
        ));
    }

    #[test]
    fn test_duplicate_integral_is_not_unique() {
        let mut table = IntegralTable::simply_supported([1]);
        table.insert(IntegralRecord {
            key: IntegralKey::diagonal(2, 1),
            value: 1.0,
            scale_factor: -1,
        });

        let err = table.lookup(&IntegralKey::diagonal(2, 1)).unwrap_err();
        assert_eq!(err, IntegralKey::diagonal(2, 1).not_unique(2));
        assert!(table.lookup(&IntegralKey::diagonal(1, 1)).is_ok());
    }

    #[test]
    fn test_parse_json_table() {
        let json = r#"{
            "integrals": [
                {"integral": 1, "m": 1, "n": 1, "value": 0.5, "scale_factor": 1},
                {"integral": 9, "m": 1, "n": 2, "t": 1, "v": 3, "value": -2.0, "scale_factor": -2}
            ]
        }"#;
        let table = IntegralTable::from_json_str(json).unwrap();

        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.scaled(1, 10.0, 1).unwrap(), 5.0);

        let key = IntegralKey {
            integral: 9,
            m: Some(1),
            n: Some(2),
            t: Some(1),
            v: Some(3),
        };
        assert_relative_eq!(table.lookup(&key).unwrap().scale(2.0), -0.5);
    }
}
