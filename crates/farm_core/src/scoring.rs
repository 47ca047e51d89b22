//! End-of-run scoring.
//!
//! Every score is recomputed from the whole state on each call. Components
//! are rounded independently of the total, and the total is rounded from the
//! unrounded components, so it cannot always be rebuilt from the returned
//! parts.

use crate::action::ActionType;
use crate::io::seed::Seed;
use crate::state::{GameState, Scores};

const FERTILIZER_ALLOWANCE: f64 = 20.0;
const TARGET_ACTIONS_PER_DAY: f64 = 2.0;

/// Round to the nearest whole point, halves away from zero. Scores are never
/// negative, so halves always round up.
pub fn round_score(value: f64) -> f64 {
    value.round()
}

pub fn calculate_scores(state: &GameState, seed: &Seed) -> Scores {
    let yield_score = yield_score(state);
    let water_score = water_score(state, seed);
    let environment_score = environment_score(state);
    let efficiency_score = efficiency_score(state);
    let bonus = data_bonus(state);

    let total = (yield_score * seed.weights.yield_weight
        + water_score * seed.weights.water
        + environment_score * seed.weights.environment)
        * bonus;

    Scores {
        total: round_score(total),
        yield_score: round_score(yield_score),
        water: round_score(water_score),
        environment: round_score(environment_score),
        efficiency: round_score(efficiency_score),
    }
}

/// Multiplier for playing against observed data; 1.0 without observations.
pub fn data_bonus(state: &GameState) -> f64 {
    let Some(record) = &state.environment_data else {
        return 1.0;
    };

    let quality = record
        .data_quality
        .map(|quality| quality.score_multiplier())
        .unwrap_or(1.0);

    let mut alignment = 1.0;
    if record.soil_moisture < 30.0 && state.count_actions(ActionType::Water) > 5 {
        alignment += 0.1;
    }
    if record.ndvi < 0.4 && state.count_actions(ActionType::Fertilize) > 3 {
        alignment += 0.1;
    }

    quality * alignment
}

pub fn yield_score(state: &GameState) -> f64 {
    let resources = &state.resources;
    let water_bonus = (resources.water * 0.1).min(20.0);
    let fertilizer_bonus = (resources.fertilizer * 0.2).min(15.0);
    let ndvi_bonus = state
        .environment_data
        .as_ref()
        .map(|record| record.ndvi * 20.0)
        .unwrap_or(0.0);

    (50.0 + water_bonus + fertilizer_bonus + balance_bonus(state) + ndvi_bonus).min(100.0)
}

/// Up to ten points for keeping water, fertilizer and money level.
fn balance_bonus(state: &GameState) -> f64 {
    let r = &state.resources;
    let total = r.water + r.fertilizer + r.money;
    if total <= 0.0 {
        return 0.0;
    }
    let imbalance = [
        (r.water - r.fertilizer).abs(),
        (r.water - r.money).abs(),
        (r.fertilizer - r.money).abs(),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max)
        / total;
    (1.0 - imbalance) * 10.0
}

pub fn water_score(state: &GameState, seed: &Seed) -> f64 {
    let used: f64 = state.actions.iter().map(|action| action.submitted_water()).sum();
    let optimal = seed.targets.min_humidity * 10.0;
    if used <= optimal {
        100.0
    } else {
        (100.0 - (used - optimal) * 2.0).max(0.0)
    }
}

pub fn environment_score(state: &GameState) -> f64 {
    let mut score = 100.0;
    let used: f64 = state
        .actions
        .iter()
        .map(|action| action.submitted_fertilizer())
        .sum();
    if used > FERTILIZER_ALLOWANCE {
        score -= (used - FERTILIZER_ALLOWANCE) * 2.0;
    }
    score += state.organic_fertilize_count() as f64 * 5.0;
    score.clamp(0.0, 100.0)
}

pub fn efficiency_score(state: &GameState) -> f64 {
    let actions_per_day = if state.total_days == 0 {
        0.0
    } else {
        state.actions.len() as f64 / f64::from(state.total_days)
    };
    let action_efficiency =
        (100.0 - (actions_per_day - TARGET_ACTIONS_PER_DAY).abs() * 10.0).max(0.0);
    let resource_efficiency = resource_utilization(state) * 100.0;
    (action_efficiency + resource_efficiency) / 2.0
}

/// Share of actions that were WATER or FERTILIZE.
fn resource_utilization(state: &GameState) -> f64 {
    if state.actions.is_empty() {
        return 0.0;
    }
    let effective =
        state.count_actions(ActionType::Water) + state.count_actions(ActionType::Fertilize);
    effective as f64 / state.actions.len() as f64
}
