//! Satellite-derived environmental inputs.
//!
//! Records arrive from outside the engine; a day without a record is not an
//! error, it simply routes the day through the seeded fallback paths.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Good,
    Moderate,
    Poor,
}

impl DataQuality {
    /// Score multiplier rewarding play against data of this quality.
    pub fn score_multiplier(self) -> f64 {
        match self {
            DataQuality::Good => 1.15,
            DataQuality::Moderate => 1.10,
            DataQuality::Poor => 1.05,
        }
    }
}

/// One day of environmental observations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentData {
    pub ndvi: f64,
    /// Soil moisture as a percentage.
    pub soil_moisture: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Millimetres.
    #[serde(default)]
    pub precipitation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
}

/// Environmental data supplied to a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "data")]
pub enum EnvironmentInput {
    #[default]
    Absent,
    /// The same record for every day.
    Constant(EnvironmentData),
    /// Indexed by day; missing entries fall back to simulated weather.
    Daily(Vec<Option<EnvironmentData>>),
}

impl EnvironmentInput {
    pub fn for_day(&self, day: u32) -> Option<&EnvironmentData> {
        match self {
            EnvironmentInput::Absent => None,
            EnvironmentInput::Constant(record) => Some(record),
            EnvironmentInput::Daily(records) => {
                records.get(day as usize).and_then(|record| record.as_ref())
            }
        }
    }
}

impl From<Option<EnvironmentData>> for EnvironmentInput {
    fn from(value: Option<EnvironmentData>) -> Self {
        match value {
            Some(record) => EnvironmentInput::Constant(record),
            None => EnvironmentInput::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ndvi: f64) -> EnvironmentData {
        EnvironmentData {
            ndvi,
            soil_moisture: 35.0,
            temperature: 18.0,
            precipitation: 0.0,
            last_update: None,
            data_quality: Some(DataQuality::Good),
        }
    }

    #[test]
    fn daily_series_falls_back_past_the_end() {
        let input = EnvironmentInput::Daily(vec![Some(record(0.5)), None]);
        assert_eq!(input.for_day(0).map(|r| r.ndvi), Some(0.5));
        assert!(input.for_day(1).is_none());
        assert!(input.for_day(7).is_none());
    }

    #[test]
    fn constant_applies_to_every_day() {
        let input = EnvironmentInput::from(Some(record(0.3)));
        assert_eq!(input.for_day(29).map(|r| r.ndvi), Some(0.3));
    }

    #[test]
    fn record_parses_camel_case_fields() {
        let parsed: EnvironmentData = serde_json::from_str(
            r#"{"ndvi":0.6,"soilMoisture":22,"temperature":31,"precipitation":1.5,"dataQuality":"moderate"}"#,
        )
        .expect("record parses");
        assert_eq!(parsed.soil_moisture, 22.0);
        assert_eq!(parsed.data_quality, Some(DataQuality::Moderate));
    }
}
