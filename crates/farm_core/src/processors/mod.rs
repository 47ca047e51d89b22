//! One pure transformation per action kind.
//!
//! Processors read a state whose cost has already been deducted and return
//! the replacement resource pool together with a description of what
//! happened. Recording the action in history is the driver's job.

pub mod energy;
pub mod fertilize;
pub mod harvest;
pub mod water;

use serde::Serialize;

use crate::action::{Action, ActionKind, FertilizerKind};
use crate::io::seed::Seed;
use crate::resources::Resources;
use crate::state::GameState;

/// Observable effect of one applied action.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Outcome {
    Water {
        requested: f64,
        efficiency: f64,
        consumed: f64,
    },
    Fertilize {
        amount: f64,
        kind: FertilizerKind,
        effectiveness: f64,
        yield_bonus: f64,
        environmental_impact: f64,
    },
    Plant,
    Harvest {
        yield_amount: f64,
        unit_price: f64,
        money_earned: f64,
    },
    SolarCharge {
        gain: f64,
    },
    Irrigate {
        solar_spent: f64,
        water_gained: f64,
    },
    Wait,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub resources: Resources,
    pub outcome: Outcome,
}

impl Transition {
    fn unchanged(state: &GameState, outcome: Outcome) -> Self {
        Self {
            resources: state.resources,
            outcome,
        }
    }
}

/// Dispatch `action` to its processor.
pub fn process(state: &GameState, action: &Action, seed: &Seed) -> Transition {
    match &action.kind {
        ActionKind::Water { amount } => water::simulate_water(state, action, &seed.id, *amount),
        ActionKind::Fertilize { amount, kind } => {
            fertilize::simulate_fertilization(state, *amount, kind.as_ref())
        }
        // Crop growth is not modelled; planting only pays its cost.
        ActionKind::Plant { .. } => Transition::unchanged(state, Outcome::Plant),
        ActionKind::Harvest => harvest::simulate_harvest(state, &seed.crop_type),
        ActionKind::SolarCharge => energy::simulate_solar_charge(state, &seed.id),
        ActionKind::Irrigate => energy::simulate_irrigation(state),
        ActionKind::Wait => Transition::unchanged(state, Outcome::Wait),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_and_wait_leave_resources_alone() {
        let seed: Seed = serde_json::from_str(r#"{"id":"p"}"#).expect("seed parses");
        let state = GameState::new(Resources::new(5.0, 5.0, 5.0, 5.0, 5.0), 3);
        for kind in [ActionKind::Plant { crop: None }, ActionKind::Wait] {
            let action = Action::new("x", 0, kind, Resources::default());
            let transition = process(&state, &action, &seed);
            assert_eq!(transition.resources, state.resources);
        }
    }

    #[test]
    fn outcome_serializes_with_type_tag() {
        let value = serde_json::to_value(Outcome::Irrigate {
            solar_spent: 10.0,
            water_gained: 20.0,
        })
        .expect("outcome serializes");
        assert_eq!(value["type"], "IRRIGATE");
        assert_eq!(value["waterGained"], 20.0);
    }
}
