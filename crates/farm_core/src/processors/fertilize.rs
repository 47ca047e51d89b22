use crate::action::{amount_or, FertilizerKind, DEFAULT_FERTILIZER_AMOUNT};
use crate::resources::subtract_clamped;
use crate::state::GameState;

use super::{Outcome, Transition};

/// Soil moisture fraction assumed when judging fertilizer uptake.
const ASSUMED_SOIL_MOISTURE: f64 = 0.7;
const DRY_SOIL_THRESHOLD: f64 = 0.3;

pub fn simulate_fertilization(
    state: &GameState,
    amount: Option<f64>,
    kind: Option<&FertilizerKind>,
) -> Transition {
    let amount = amount_or(amount, DEFAULT_FERTILIZER_AMOUNT);
    let kind = kind.cloned().unwrap_or(FertilizerKind::Organic);

    let effectiveness = effectiveness(&kind, ASSUMED_SOIL_MOISTURE);
    let yield_bonus = amount * effectiveness;
    let environmental_impact = amount * kind.impact();

    let mut resources = state.resources;
    resources.fertilizer = subtract_clamped(resources.fertilizer, amount);
    Transition {
        resources,
        outcome: Outcome::Fertilize {
            amount,
            kind,
            effectiveness,
            yield_bonus,
            environmental_impact,
        },
    }
}

fn effectiveness(kind: &FertilizerKind, soil_moisture: f64) -> f64 {
    let mut effectiveness = kind.effectiveness();
    if soil_moisture < DRY_SOIL_THRESHOLD {
        effectiveness *= 0.5;
    }
    effectiveness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Resources;

    #[test]
    fn defaults_to_five_units_of_organic() {
        let state = GameState::new(Resources::new(0.0, 20.0, 0.0, 0.0, 0.0), 30);
        let transition = simulate_fertilization(&state, None, None);
        assert_eq!(transition.resources.fertilizer, 15.0);
        match transition.outcome {
            Outcome::Fertilize {
                amount,
                kind,
                effectiveness,
                yield_bonus,
                environmental_impact,
            } => {
                assert_eq!(amount, 5.0);
                assert_eq!(kind, FertilizerKind::Organic);
                assert_eq!(effectiveness, 0.8);
                assert_eq!(yield_bonus, 4.0);
                assert!((environmental_impact - 1.5).abs() < 1e-12);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn synthetic_is_stronger_and_dirtier() {
        let state = GameState::new(Resources::new(0.0, 3.0, 0.0, 0.0, 0.0), 30);
        let transition =
            simulate_fertilization(&state, Some(10.0), Some(&FertilizerKind::Synthetic));
        assert_eq!(transition.resources.fertilizer, 0.0);
        match transition.outcome {
            Outcome::Fertilize {
                yield_bonus,
                environmental_impact,
                ..
            } => {
                assert_eq!(yield_bonus, 12.0);
                assert_eq!(environmental_impact, 10.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn dry_soil_halves_effectiveness() {
        assert_eq!(effectiveness(&FertilizerKind::Compost, 0.1), 0.3);
        assert_eq!(effectiveness(&FertilizerKind::Other("x".into()), 0.5), 1.0);
    }
}
