use crate::daily::weather::weather_effects;
use crate::resources::{charge_solar, subtract_clamped, IRRIGATION_WATER_MAX};
use crate::state::GameState;

use super::{Outcome, Transition};

/// Most energy a single SOLAR_CHARGE can bank.
const MAX_CHARGE_GAIN: f64 = 20.0;
/// Most energy a single IRRIGATE can spend.
const MAX_IRRIGATION_DRAW: f64 = 10.0;
/// Water delivered per unit of solar energy spent on irrigation.
const IRRIGATION_WATER_PER_ENERGY: f64 = 2.0;

/// Bank solar energy from the current day's radiation.
pub fn simulate_solar_charge(state: &GameState, seed_id: &str) -> Transition {
    let weather = weather_effects(seed_id, state.current_day, state.environment_data.as_ref());
    let gain = (weather.solar_radiation * 2.0).min(MAX_CHARGE_GAIN);

    let mut resources = state.resources;
    resources.solar_energy = charge_solar(resources.solar_energy, gain);
    Transition {
        resources,
        outcome: Outcome::SolarCharge { gain },
    }
}

/// Convert up to ten units of solar energy into water.
pub fn simulate_irrigation(state: &GameState) -> Transition {
    let solar_spent = state.resources.solar_energy.min(MAX_IRRIGATION_DRAW);
    let water_gained = solar_spent * IRRIGATION_WATER_PER_ENERGY;

    let mut resources = state.resources;
    resources.solar_energy = subtract_clamped(resources.solar_energy, solar_spent);
    resources.water = (resources.water + water_gained).min(IRRIGATION_WATER_MAX);
    Transition {
        resources,
        outcome: Outcome::Irrigate {
            solar_spent,
            water_gained,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentData;
    use crate::resources::{Resources, SOLAR_MAX};

    #[test]
    fn solar_charge_uses_observed_radiation() {
        let mut state = GameState::new(Resources::new(0.0, 0.0, 0.0, 0.0, 50.0), 30);
        state.environment_data = Some(EnvironmentData {
            ndvi: 0.4,
            soil_moisture: 30.0,
            temperature: 15.0,
            precipitation: 0.0,
            last_update: None,
            data_quality: None,
        });
        let transition = simulate_solar_charge(&state, "seed");
        assert_eq!(transition.resources.solar_energy, 60.0);
    }

    #[test]
    fn solar_charge_never_exceeds_cap() {
        let state = GameState::new(Resources::new(0.0, 0.0, 0.0, 0.0, 99.0), 30);
        let transition = simulate_solar_charge(&state, "seed");
        assert_eq!(transition.resources.solar_energy, SOLAR_MAX);
    }

    #[test]
    fn irrigation_spends_up_to_ten_energy() {
        let state = GameState::new(Resources::new(40.0, 0.0, 0.0, 0.0, 25.0), 30);
        let transition = simulate_irrigation(&state);
        assert_eq!(transition.resources.solar_energy, 15.0);
        assert_eq!(transition.resources.water, 60.0);
    }

    #[test]
    fn irrigation_with_little_energy_spends_what_is_left() {
        let state = GameState::new(Resources::new(0.0, 0.0, 0.0, 0.0, 4.0), 30);
        let transition = simulate_irrigation(&state);
        assert_eq!(transition.resources.solar_energy, 0.0);
        assert_eq!(transition.resources.water, 8.0);
    }

    #[test]
    fn irrigation_caps_water_at_one_hundred() {
        let state = GameState::new(Resources::new(95.0, 0.0, 0.0, 0.0, 50.0), 30);
        let transition = simulate_irrigation(&state);
        assert_eq!(transition.resources.water, IRRIGATION_WATER_MAX);
    }
}
