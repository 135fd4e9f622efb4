use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array1;

use super::error::LookupError;

pub const WAVELENGTH: &str = "wavelength";
pub const AIRGLOW_CONT: &str = "airglow_cont";
pub const AIRGLOW_LINE: &str = "airglow_line";
pub const TRANS_MA: &str = "trans_ma";

/// Reference atmosphere sampled on a common wavelength grid.
///
/// Columns are addressed by name and are read-only once the table is built.
/// The airglow model needs `wavelength` (nm, strictly increasing),
/// `airglow_cont` and `airglow_line` (ph / (s cm2 nm)) and `trans_ma`
/// (molecular absorption transmission at airmass 1).
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereTable {
    columns: BTreeMap<String, Array1<f64>>,
}

impl AtmosphereTable {
    /// Builds a table, checking that every column has the same length and
    /// that the wavelength column, if present, is strictly increasing.
    pub fn new(columns: BTreeMap<String, Array1<f64>>) -> Result<Self, LookupError> {
        let mut lengths = columns.iter().map(|(name, data)| (name, data.len()));
        if let Some((first_name, expected)) = lengths.next() {
            for (name, len) in lengths {
                if len != expected {
                    return Err(LookupError::Malformed {
                        field: name.clone(),
                        reason: format!(
                            "has {} rows but `{}` has {}",
                            len, first_name, expected
                        ),
                    });
                }
            }
        }

        if let Some(wavelength) = columns.get(WAVELENGTH) {
            if let Some(i) = wavelength
                .windows(2)
                .into_iter()
                .position(|w| !(w[1] > w[0]))
            {
                return Err(LookupError::Malformed {
                    field: WAVELENGTH.to_string(),
                    reason: format!("not strictly increasing at row {}", i + 1),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Reads a JSON object mapping column names to arrays of numbers.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let raw: BTreeMap<String, Vec<f64>> = serde_json::from_reader(reader)?;

        Self::new(
            raw.into_iter()
                .map(|(name, values)| (name, Array1::from(values)))
                .collect(),
        )
    }

    pub fn field(&self, name: &str) -> Result<&Array1<f64>, LookupError> {
        self.columns
            .get(name)
            .ok_or_else(|| LookupError::MissingField(name.to_string()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn wavelength(&self) -> Result<&Array1<f64>, LookupError> {
        self.field(WAVELENGTH)
    }

    pub fn airglow_cont(&self) -> Result<&Array1<f64>, LookupError> {
        self.field(AIRGLOW_CONT)
    }

    pub fn airglow_line(&self) -> Result<&Array1<f64>, LookupError> {
        self.field(AIRGLOW_LINE)
    }

    pub fn trans_ma(&self) -> Result<&Array1<f64>, LookupError> {
        self.field(TRANS_MA)
    }
}
