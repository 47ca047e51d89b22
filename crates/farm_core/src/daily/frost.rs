use std::f64::consts::TAU;

use serde::Serialize;

use crate::resources::Resources;
use crate::rng::Stream;

/// Risk above which frost damages the crop's market value.
pub const FROST_DAMAGE_THRESHOLD: f64 = 0.7;
/// Fraction of value lost at certain frost.
pub const MAX_FROST_DAMAGE: f64 = 0.3;

const DAYS_PER_YEAR: u32 = 365;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn for_day(day: u32) -> Self {
        match day % DAYS_PER_YEAR {
            0..=89 => Season::Spring,
            90..=179 => Season::Summer,
            180..=269 => Season::Fall,
            _ => Season::Winter,
        }
    }

    fn base_risk(self) -> f64 {
        match self {
            Season::Spring => 0.4,
            Season::Summer => 0.0,
            Season::Fall => 0.2,
            Season::Winter => 0.8,
        }
    }
}

/// Seasonal sinusoid around 15°C plus ±2.5°C of daily noise drawn from the
/// stream keyed `"{seed id}frost{day}"`.
pub fn simulated_temperature(seed_id: &str, day: u32) -> f64 {
    let mut rng = Stream::from_key(&format!("{seed_id}frost{day}"));
    let seasonal = (f64::from(day) / f64::from(DAYS_PER_YEAR) * TAU).sin() * 10.0;
    let daily = (rng.next_f64() - 0.5) * 5.0;
    15.0 + seasonal + daily
}

/// Frost risk in `[0, 1]` for a day and temperature.
pub fn frost_risk(day: u32, temperature: f64) -> f64 {
    let mut risk = Season::for_day(day).base_risk();
    if temperature < 0.0 {
        risk = 1.0;
    } else if temperature < 5.0 {
        risk = risk.max(0.6);
    }
    risk.min(1.0)
}

/// Damage fraction for a risk level, if the risk is high enough to hurt.
pub fn frost_damage(risk: f64) -> Option<f64> {
    (risk > FROST_DAMAGE_THRESHOLD).then(|| risk * MAX_FROST_DAMAGE)
}

/// Frost only erodes money; water, fertilizer and yield are untouched.
pub fn apply_frost_damage(resources: &Resources, damage: f64) -> Resources {
    Resources {
        money: (resources.money * (1.0 - damage)).max(0.0),
        ..*resources
    }
}
