use crate::action::{amount_or, Action, DEFAULT_WATER_AMOUNT};
use crate::environment::EnvironmentData;
use crate::resources::subtract_clamped;
use crate::rng::Stream;
use crate::state::GameState;

use super::{Outcome, Transition};

const BASE_EFFICIENCY: f64 = 0.8;
const MIN_EFFICIENCY: f64 = 0.3;
const MAX_EFFICIENCY: f64 = 1.5;
/// Chance of simulated rain on a day without observations.
const FALLBACK_RAIN_CHANCE: f64 = 0.3;

pub fn simulate_water(
    state: &GameState,
    action: &Action,
    seed_id: &str,
    amount: Option<f64>,
) -> Transition {
    let requested = amount_or(amount, DEFAULT_WATER_AMOUNT);
    let efficiency = match &state.environment_data {
        Some(record) => observed_efficiency(record),
        None => fallback_efficiency(seed_id, state.current_day, &action.id),
    };
    let consumed = requested * efficiency;

    let mut resources = state.resources;
    resources.water = subtract_clamped(resources.water, consumed);
    Transition {
        resources,
        outcome: Outcome::Water {
            requested,
            efficiency,
            consumed,
        },
    }
}

/// Efficiency adjusted for soil moisture, rain, and evaporation.
pub fn observed_efficiency(record: &EnvironmentData) -> f64 {
    let mut efficiency = BASE_EFFICIENCY;

    if record.soil_moisture > 60.0 {
        efficiency *= 0.5;
    } else if record.soil_moisture > 40.0 {
        efficiency *= 0.8;
    } else if record.soil_moisture < 20.0 {
        efficiency *= 1.2;
    }

    if record.precipitation > 0.0 {
        efficiency *= 0.3;
    }

    if record.temperature > 30.0 {
        efficiency *= 0.85;
    } else if record.temperature < 10.0 {
        efficiency *= 1.1;
    }

    clamp_efficiency(efficiency)
}

/// Without observations, simulated rain halves efficiency. The draw comes
/// from a stream keyed by seed, day and action so replays stay identical.
fn fallback_efficiency(seed_id: &str, day: u32, action_id: &str) -> f64 {
    let mut rng = Stream::from_key(&format!("{seed_id}water{day}{action_id}"));
    let mut efficiency = BASE_EFFICIENCY;
    if rng.chance(FALLBACK_RAIN_CHANCE) {
        efficiency *= 0.5;
    }
    clamp_efficiency(efficiency)
}

fn clamp_efficiency(efficiency: f64) -> f64 {
    efficiency.clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
}
