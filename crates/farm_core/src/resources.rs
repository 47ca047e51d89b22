use serde::{Deserialize, Serialize};

/// Upper bound for the solar energy meter.
pub const SOLAR_MAX: f64 = 100.0;

/// Upper bound applied to water by irrigation.
pub const IRRIGATION_WATER_MAX: f64 = 100.0;

/// The five-field resource pool owned by a [`crate::state::GameState`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub water: f64,
    pub fertilizer: f64,
    pub money: f64,
    pub seeds: f64,
    #[serde(default)]
    pub solar_energy: f64,
}

impl Resources {
    pub fn new(water: f64, fertilizer: f64, money: f64, seeds: f64, solar_energy: f64) -> Self {
        Self {
            water,
            fertilizer,
            money,
            seeds,
            solar_energy,
        }
    }

    /// True iff every field covers the corresponding field of `cost`.
    pub fn has_enough(&self, cost: &Resources) -> bool {
        self.water >= cost.water
            && self.fertilizer >= cost.fertilizer
            && self.money >= cost.money
            && self.seeds >= cost.seeds
            && self.solar_energy >= cost.solar_energy
    }

    /// Subtract `cost` field by field, clamping each result at zero.
    pub fn deduct(&self, cost: &Resources) -> Resources {
        Resources {
            water: subtract_clamped(self.water, cost.water),
            fertilizer: subtract_clamped(self.fertilizer, cost.fertilizer),
            money: subtract_clamped(self.money, cost.money),
            seeds: subtract_clamped(self.seeds, cost.seeds),
            solar_energy: subtract_clamped(self.solar_energy, cost.solar_energy),
        }
    }

    pub fn is_non_negative(&self) -> bool {
        self.water >= 0.0
            && self.fertilizer >= 0.0
            && self.money >= 0.0
            && self.seeds >= 0.0
            && self.solar_energy >= 0.0
    }
}

/// Subtract and clamp at zero.
pub fn subtract_clamped(current: f64, amount: f64) -> f64 {
    (current - amount).max(0.0)
}

/// Add solar energy, keeping the meter within `[0, SOLAR_MAX]`.
pub fn charge_solar(current: f64, gain: f64) -> f64 {
    (current + gain).clamp(0.0, SOLAR_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn has_enough_requires_every_field() {
        let pool = Resources::new(10.0, 5.0, 100.0, 2.0, 0.0);
        assert!(pool.has_enough(&Resources::new(10.0, 5.0, 100.0, 2.0, 0.0)));
        assert!(!pool.has_enough(&Resources::new(0.0, 0.0, 0.0, 0.0, 1.0)));
        assert!(!pool.has_enough(&Resources::new(0.0, 0.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn deduct_floors_at_zero() {
        let pool = Resources::new(3.0, 5.0, 10.0, 1.0, 4.0);
        let next = pool.deduct(&Resources::new(5.0, 1.0, 10.0, 0.0, 2.0));
        assert_eq!(next, Resources::new(0.0, 4.0, 0.0, 1.0, 2.0));
    }

    #[test]
    fn solar_energy_defaults_when_missing() {
        let pool: Resources =
            serde_json::from_str(r#"{"water":1,"fertilizer":2,"money":3,"seeds":4}"#)
                .expect("resources parse");
        assert_eq!(pool.solar_energy, 0.0);
    }

    proptest! {
        #[test]
        fn deduct_never_goes_negative(
            water in 0.0f64..500.0,
            cost_water in 0.0f64..1_000.0,
            money in 0.0f64..500.0,
            cost_money in 0.0f64..1_000.0,
        ) {
            let pool = Resources::new(water, 0.0, money, 0.0, 0.0);
            let cost = Resources::new(cost_water, 0.0, cost_money, 0.0, 0.0);
            prop_assert!(pool.deduct(&cost).is_non_negative());
        }

        #[test]
        fn charge_solar_never_exits_bounds(current in 0.0f64..=SOLAR_MAX, gain in -50.0f64..500.0) {
            let charged = charge_solar(current, gain);
            prop_assert!(charged <= SOLAR_MAX);
            prop_assert!(charged >= 0.0);
        }
    }
}
