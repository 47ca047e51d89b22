//! Batch scenario documents: one seed, an action log and the run setup.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::environment::EnvironmentInput;
use crate::io::seed::Seed;
use crate::resources::Resources;
use crate::{RUN_DAYS, STARTING_RESOURCES};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub seed: Seed,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default = "default_resources")]
    pub initial_resources: Resources,
    #[serde(default = "default_days")]
    pub total_days: u32,
    #[serde(default)]
    pub environment: EnvironmentInput,
}

fn default_resources() -> Resources {
    STARTING_RESOURCES
}

fn default_days() -> u32 {
    RUN_DAYS
}

impl Scenario {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let scenario: Scenario =
            serde_json::from_reader(reader).context("invalid scenario json")?;
        scenario
            .seed
            .validate()
            .with_context(|| format!("scenario seed {} rejected", scenario.seed.id))?;
        Ok(scenario)
    }
}
