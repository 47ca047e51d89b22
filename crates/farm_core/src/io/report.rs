use serde::Serialize;

use crate::daily::weather::WeatherEffects;
use crate::daily::DailyEffects;
use crate::processors::Outcome;
use crate::resources::Resources;

/// One action that passed its affordability check, with what it did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppliedAction {
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Summary of a single simulated day.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub day: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub applied: Vec<AppliedAction>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<String>,
    pub weather: WeatherEffects,
    pub temperature: f64,
    pub frost_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frost_damage: Option<f64>,
    pub solar_generated: f64,
    pub resources: Resources,
}

impl DayReport {
    pub fn new(
        day: u32,
        applied: Vec<AppliedAction>,
        skipped: Vec<String>,
        effects: DailyEffects,
        resources: Resources,
    ) -> Self {
        Self {
            day,
            applied,
            skipped,
            weather: effects.weather,
            temperature: effects.temperature,
            frost_risk: effects.frost_risk,
            frost_damage: effects.frost_damage,
            solar_generated: effects.solar_generated,
            resources,
        }
    }

    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects(frost_damage: Option<f64>) -> DailyEffects {
        DailyEffects {
            weather: WeatherEffects {
                water: 2.0,
                solar_radiation: 4.0,
                simulated: true,
            },
            temperature: 12.0,
            frost_risk: 0.4,
            frost_damage,
            solar_generated: 8.0,
        }
    }

    #[test]
    fn quiet_day_omits_empty_lists() {
        let report = DayReport::new(3, Vec::new(), Vec::new(), effects(None), Resources::default());
        let line = report.to_ndjson().expect("report serializes");
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).expect("valid json");
        let map = value.as_object().expect("report is object");
        assert!(!map.contains_key("applied"));
        assert!(!map.contains_key("skipped"));
        assert!(!map.contains_key("frostDamage"));
        assert_eq!(map.get("day").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(value["resources"]["solarEnergy"], 0.0);
    }

    #[test]
    fn applied_outcome_is_flattened_with_its_id() {
        let applied = vec![AppliedAction {
            id: "h1".to_string(),
            outcome: Outcome::Harvest {
                yield_amount: 120.0,
                unit_price: 2.5,
                money_earned: 300.0,
            },
        }];
        let report = DayReport::new(
            0,
            applied,
            vec!["w9".to_string()],
            effects(Some(0.3)),
            Resources::default(),
        );
        let value = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(value["applied"][0]["id"], "h1");
        assert_eq!(value["applied"][0]["type"], "HARVEST");
        assert_eq!(value["applied"][0]["moneyEarned"], 300.0);
        assert_eq!(value["skipped"][0], "w9");
        assert_eq!(value["frostDamage"], 0.3);
    }
}
