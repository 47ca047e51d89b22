use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Parsed scenario descriptor for one playable seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub date_start: String,
    #[serde(default)]
    pub date_end: String,
    #[serde(default = "default_crop")]
    pub crop_type: String,
    #[serde(default)]
    pub targets: Targets,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub datasets: Datasets,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
    pub min_humidity: f64,
    #[serde(rename = "minNDVI")]
    pub min_ndvi: f64,
    pub max_temperature: f64,
    pub min_yield: f64,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            min_humidity: 0.6,
            min_ndvi: 0.4,
            max_temperature: 35.0,
            min_yield: 80.0,
        }
    }
}

/// Score weights; expected to sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(rename = "yield")]
    pub yield_weight: f64,
    pub water: f64,
    pub environment: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            yield_weight: 0.4,
            water: 0.3,
            environment: 0.3,
        }
    }
}

/// Dataset tile locations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Datasets {
    pub ndvi: String,
    pub soil_moisture: String,
    pub temperature: String,
    pub precipitation: String,
    pub cloud_mask: String,
}

impl Datasets {
    pub fn standard_tiles() -> Self {
        Self {
            ndvi: "/data/tiles/ndvi".to_string(),
            soil_moisture: "/data/tiles/soil".to_string(),
            temperature: "/data/tiles/temp".to_string(),
            precipitation: "/data/tiles/precip".to_string(),
            cloud_mask: "/data/tiles/clouds".to_string(),
        }
    }
}

fn default_crop() -> String {
    "carrot".to_string()
}

#[derive(Debug, Error, PartialEq)]
pub enum SeedError {
    #[error("seed id must not be empty")]
    MissingId,
    #[error("seed {id} has a negative {field} weight ({value})")]
    NegativeWeight {
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("seed {id} weights sum to {sum}, expected 1.0")]
    WeightSum { id: String, sum: f64 },
}

/// Seed row as held by the persistence layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub id: String,
    pub code: String,
    pub region: String,
    pub date_start: String,
    pub date_end: String,
    #[serde(default)]
    pub layers_version: Value,
}

impl Seed {
    /// Load a seed JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open seed file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize a seed document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("invalid seed json")
    }

    /// Build a playable seed from a stored row, applying default crop,
    /// targets and weights.
    pub fn from_record(record: &SeedRecord, notes: impl Into<String>) -> Self {
        let datasets = record_datasets(record);
        Self {
            id: record.id.clone(),
            code: record.code.clone(),
            region: record.region.clone(),
            date_start: record.date_start.clone(),
            date_end: record.date_end.clone(),
            crop_type: default_crop(),
            targets: Targets::default(),
            weights: Weights::default(),
            datasets,
            notes: notes.into(),
        }
    }

    /// Boundary check run by callers before handing a seed to the engine.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.id.trim().is_empty() {
            return Err(SeedError::MissingId);
        }
        let weights = [
            ("yield", self.weights.yield_weight),
            ("water", self.weights.water),
            ("environment", self.weights.environment),
        ];
        for (field, value) in weights {
            if value < 0.0 {
                return Err(SeedError::NegativeWeight {
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        let sum: f64 = weights.iter().map(|(_, value)| value).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SeedError::WeightSum {
                id: self.id.clone(),
                sum,
            });
        }
        Ok(())
    }
}

/// Layer paths stored with a seed row. A missing value means no layers; a
/// value of the wrong shape is logged and treated the same way.
fn record_datasets(record: &SeedRecord) -> Datasets {
    if record.layers_version.is_null() {
        return Datasets::default();
    }
    match serde_json::from_value(record.layers_version.clone()) {
        Ok(datasets) => datasets,
        Err(err) => {
            warn!(seed = %record.id, error = %err, "ignoring malformed layer paths");
            Datasets::default()
        }
    }
}
