//! End-of-day environmental step: weather, frost, and solar generation.

pub mod frost;
pub mod weather;

use serde::Serialize;
use tracing::debug;

use crate::io::seed::Seed;
use crate::resources::{charge_solar, Resources};
use crate::state::GameState;
use frost::{apply_frost_damage, frost_damage, frost_risk, simulated_temperature};
use weather::{weather_effects, WeatherEffects};

/// Most solar energy the panels bank in a day.
pub const MAX_DAILY_SOLAR: f64 = 15.0;

/// What the daily step did to the resource pool.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEffects {
    pub weather: WeatherEffects,
    pub temperature: f64,
    pub frost_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frost_damage: Option<f64>,
    pub solar_generated: f64,
}

/// Compute the end-of-day resources for `state.current_day`.
pub fn apply_daily_effects(state: &GameState, seed: &Seed) -> (Resources, DailyEffects) {
    let day = state.current_day;
    let weather = weather_effects(&seed.id, day, state.environment_data.as_ref());

    let temperature = simulated_temperature(&seed.id, day);
    let risk = frost_risk(day, temperature);
    let damage = frost_damage(risk);

    let mut resources = state.resources;
    if let Some(damage) = damage {
        debug!(day, risk, damage, "frost damage applied");
        resources = apply_frost_damage(&resources, damage);
    }

    let solar_generated = (weather.solar_radiation * 2.0).min(MAX_DAILY_SOLAR);
    resources.water = (resources.water + weather.water).max(0.0);
    resources.solar_energy = charge_solar(resources.solar_energy, solar_generated);

    let effects = DailyEffects {
        weather,
        temperature,
        frost_risk: risk,
        frost_damage: damage,
        solar_generated,
    };
    (resources, effects)
}
