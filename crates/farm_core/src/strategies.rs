//! proptest strategies for resource pools, action logs and environment input.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

use crate::action::{Action, ActionKind, FertilizerKind};
use crate::environment::{DataQuality, EnvironmentData, EnvironmentInput};
use crate::resources::{Resources, SOLAR_MAX};

pub fn resources() -> impl Strategy<Value = Resources> {
    (
        0.0f64..300.0,
        0.0f64..100.0,
        0.0f64..500.0,
        0.0f64..40.0,
        0.0f64..=SOLAR_MAX,
    )
        .prop_map(|(water, fertilizer, money, seeds, solar_energy)| {
            Resources::new(water, fertilizer, money, seeds, solar_energy)
        })
}

/// Costs small enough that most actions are affordable, large enough that
/// some are not.
pub fn cost() -> impl Strategy<Value = Resources> {
    (0.0f64..30.0, 0.0f64..15.0, 0.0f64..60.0, 0.0f64..5.0, 0.0f64..20.0).prop_map(
        |(water, fertilizer, money, seeds, solar_energy)| {
            Resources::new(water, fertilizer, money, seeds, solar_energy)
        },
    )
}

pub fn fertilizer_kind() -> impl Strategy<Value = FertilizerKind> {
    prop_oneof![
        Just(FertilizerKind::Organic),
        Just(FertilizerKind::Synthetic),
        Just(FertilizerKind::Compost),
        "[a-z]{3,8}".prop_map(FertilizerKind::from),
    ]
}

pub fn action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        option::of(0.0f64..40.0).prop_map(|amount| ActionKind::Water { amount }),
        (option::of(0.0f64..20.0), option::of(fertilizer_kind()))
            .prop_map(|(amount, kind)| ActionKind::Fertilize { amount, kind }),
        Just(ActionKind::Plant { crop: None }),
        Just(ActionKind::Harvest),
        Just(ActionKind::Wait),
        Just(ActionKind::SolarCharge),
        Just(ActionKind::Irrigate),
    ]
}

/// Action logs scheduled within `days` days, with unique ids.
pub fn action_log(days: u32, max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    vec((0..days.max(1), action_kind(), cost()), 0..max_len).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (day, kind, cost))| Action::new(format!("a{index}"), day, kind, cost))
            .collect()
    })
}

pub fn environment_data() -> impl Strategy<Value = EnvironmentData> {
    (
        -0.2f64..0.9,
        0.0f64..100.0,
        -15.0f64..45.0,
        0.0f64..20.0,
        option::of(prop_oneof![
            Just(DataQuality::Good),
            Just(DataQuality::Moderate),
            Just(DataQuality::Poor),
        ]),
    )
        .prop_map(
            |(ndvi, soil_moisture, temperature, precipitation, data_quality)| EnvironmentData {
                ndvi,
                soil_moisture,
                temperature,
                precipitation,
                last_update: None,
                data_quality,
            },
        )
}

pub fn environment_input(days: u32) -> impl Strategy<Value = EnvironmentInput> {
    prop_oneof![
        Just(EnvironmentInput::Absent),
        environment_data().prop_map(EnvironmentInput::Constant),
        vec(option::of(environment_data()), 0..=days as usize).prop_map(EnvironmentInput::Daily),
    ]
}
