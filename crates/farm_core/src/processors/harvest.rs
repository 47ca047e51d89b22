use crate::resources::Resources;
use crate::state::GameState;

use super::{Outcome, Transition};

const BASE_YIELD: f64 = 100.0;
const MAX_WATER_BONUS: f64 = 50.0;
const MAX_FERTILIZER_BONUS: f64 = 30.0;

/// Market price per unit of yield.
pub fn crop_unit_price(crop_type: &str) -> f64 {
    match crop_type {
        "carrot" => 2.5,
        "tomato" => 3.0,
        "lettuce" => 1.5,
        "corn" => 2.0,
        _ => 2.0,
    }
}

/// Harvest yield from the water and fertilizer still on hand.
pub fn harvest_yield(resources: &Resources) -> f64 {
    let water_bonus = (resources.water * 0.1).min(MAX_WATER_BONUS);
    let fertilizer_bonus = (resources.fertilizer * 0.2).min(MAX_FERTILIZER_BONUS);
    BASE_YIELD + water_bonus + fertilizer_bonus
}

pub fn simulate_harvest(state: &GameState, crop_type: &str) -> Transition {
    let yield_amount = harvest_yield(&state.resources);
    let unit_price = crop_unit_price(crop_type);
    let money_earned = yield_amount * unit_price;

    let mut resources = state.resources;
    resources.money += money_earned;
    Transition {
        resources,
        outcome: Outcome::Harvest {
            yield_amount,
            unit_price,
            money_earned,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrot_harvest_pays_two_and_a_half_per_unit() {
        let state = GameState::new(Resources::new(100.0, 50.0, 0.0, 0.0, 0.0), 30);
        let transition = simulate_harvest(&state, "carrot");
        assert_eq!(transition.resources.money, 300.0);
        match transition.outcome {
            Outcome::Harvest { yield_amount, .. } => assert_eq!(yield_amount, 120.0),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn bonuses_are_capped() {
        let rich = Resources::new(10_000.0, 10_000.0, 0.0, 0.0, 0.0);
        assert_eq!(harvest_yield(&rich), 180.0);
    }

    #[test]
    fn unknown_crop_uses_default_price() {
        assert_eq!(crop_unit_price("pumpkin"), 2.0);
        assert_eq!(crop_unit_price("tomato"), 3.0);
        assert_eq!(crop_unit_price("lettuce"), 1.5);
    }
}
