pub mod achievements;
pub mod action;
pub mod daily;
pub mod enhanced;
pub mod environment;
pub mod io;
pub mod levels;
pub mod processors;
pub mod resources;
pub mod rng;
pub mod scoring;
pub mod settings;
pub mod state;
pub mod store;
#[cfg(any(test, feature = "proptest-support"))]
pub mod strategies;
pub mod vegetables;

use serde::Serialize;
use tracing::debug;

pub use achievements::calculate_achievements;
pub use scoring::calculate_scores;

use action::Action;
use daily::apply_daily_effects;
use environment::EnvironmentInput;
use io::report::{AppliedAction, DayReport};
use io::seed::Seed;
use processors::{process, Outcome};
use resources::Resources;
use state::{GameState, Scores};

/// Length of a standard run, in days.
pub const RUN_DAYS: u32 = 30;

/// Pool a standard run starts from.
pub const STARTING_RESOURCES: Resources = Resources {
    water: 100.0,
    fertilizer: 50.0,
    money: 200.0,
    seeds: 20.0,
    solar_energy: 100.0,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub final_state: GameState,
    pub scores: Scores,
    /// Applied actions, in application order.
    pub actions: Vec<Action>,
    pub days: Vec<DayReport>,
}

/// Run a full simulation.
///
/// Each day applies that day's actions in log order, then the daily
/// environmental step. Actions the pool cannot afford are dropped without
/// touching the state. Scores are computed once, from the final state.
pub fn simulate(
    actions: &[Action],
    seed: &Seed,
    initial_resources: Resources,
    total_days: u32,
    environment: &EnvironmentInput,
) -> SimulationResult {
    let mut state = GameState::new(initial_resources, total_days);
    let mut days = Vec::with_capacity(total_days as usize);

    for day in 0..total_days {
        state.current_day = day;
        state.environment_data = environment.for_day(day).cloned();

        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        for action in actions.iter().filter(|action| action.day == day) {
            match apply_action(&mut state, action, seed) {
                Some(outcome) => applied.push(AppliedAction {
                    id: action.id.clone(),
                    outcome,
                }),
                None => skipped.push(action.id.clone()),
            }
        }

        let (resources, effects) = apply_daily_effects(&state, seed);
        state.resources = resources;
        days.push(DayReport::new(day, applied, skipped, effects, resources));
    }

    let scores = calculate_scores(&state, seed);
    state.scores = scores;
    state.is_game_complete = true;

    SimulationResult {
        actions: state.actions.clone(),
        final_state: state,
        scores,
        days,
    }
}

/// Apply one action to `state` if its cost is affordable.
///
/// Returns `None` and leaves the state untouched when it is not. Otherwise the
/// cost is deducted, the processor runs, and the action is appended to the
/// history exactly once.
pub fn apply_action(state: &mut GameState, action: &Action, seed: &Seed) -> Option<Outcome> {
    if !state.resources.has_enough(&action.cost) {
        debug!(
            id = %action.id,
            action_type = %action.action_type(),
            day = state.current_day,
            "action skipped: insufficient resources"
        );
        return None;
    }

    state.resources = state.resources.deduct(&action.cost);
    let transition = process(state, action, seed);
    state.resources = transition.resources;
    state.actions.push(action.clone());
    Some(transition.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::environment::EnvironmentData;
    use crate::resources::SOLAR_MAX;
    use proptest::prelude::*;

    fn seed() -> Seed {
        serde_json::from_str(r#"{"id":"lib-test"}"#).expect("seed parses")
    }

    fn harvest(day: u32) -> Action {
        Action::new(
            format!("h{day}"),
            day,
            ActionKind::Harvest,
            Resources::new(0.0, 0.0, 5.0, 0.0, 0.0),
        )
    }

    #[test]
    fn unaffordable_action_is_skipped_silently() {
        let mut state = GameState::new(Resources::new(1.0, 0.0, 0.0, 0.0, 0.0), 1);
        let before = state.clone();
        let action = harvest(0);
        assert!(apply_action(&mut state, &action, &seed()).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn applied_action_is_recorded_once() {
        let mut state = GameState::new(Resources::new(0.0, 0.0, 10.0, 0.0, 0.0), 1);
        let cost = Resources::new(0.0, 0.0, 4.0, 0.0, 0.0);
        let action = Action::new("wait", 0, ActionKind::Wait, cost);
        assert_eq!(apply_action(&mut state, &action, &seed()), Some(Outcome::Wait));
        assert_eq!(state.actions.len(), 1);
        assert_eq!(state.resources.money, 6.0);
    }

    #[test]
    fn actions_outside_the_run_are_ignored() {
        let result = simulate(
            &[harvest(7)],
            &seed(),
            STARTING_RESOURCES,
            3,
            &EnvironmentInput::Absent,
        );
        assert!(result.actions.is_empty());
        assert_eq!(result.days.len(), 3);
        assert!(result.days.iter().all(|day| day.applied.is_empty() && day.skipped.is_empty()));
    }

    #[test]
    fn final_state_is_complete_and_scored() {
        let result = simulate(
            &[harvest(0)],
            &seed(),
            STARTING_RESOURCES,
            2,
            &EnvironmentInput::Absent,
        );
        assert!(result.final_state.is_game_complete);
        assert_eq!(result.final_state.current_day, 1);
        assert_eq!(result.final_state.scores, result.scores);
        assert_eq!(result.scores, calculate_scores(&result.final_state, &seed()));
        assert_eq!(result.actions, result.final_state.actions);
    }

    #[test]
    fn daily_records_reach_the_state() {
        let record = EnvironmentData {
            ndvi: 0.5,
            soil_moisture: 40.0,
            temperature: 20.0,
            precipitation: 1.0,
            last_update: None,
            data_quality: None,
        };
        let environment = EnvironmentInput::Daily(vec![None, Some(record)]);
        let result = simulate(&[], &seed(), STARTING_RESOURCES, 3, &environment);
        assert!(result.days[0].weather.simulated);
        assert!(!result.days[1].weather.simulated);
        assert_eq!(result.days[1].weather.water, 1.0);
        assert!(result.days[2].weather.simulated);
        // The last day had no record, so scoring sees none.
        assert_eq!(result.final_state.environment_data, None);
    }

    #[test]
    fn zero_day_run_scores_the_initial_state() {
        let result = simulate(
            &[harvest(0)],
            &seed(),
            STARTING_RESOURCES,
            0,
            &EnvironmentInput::Absent,
        );
        assert!(result.days.is_empty());
        assert!(result.actions.is_empty());
        assert_eq!(result.final_state.resources, STARTING_RESOURCES);
        assert_eq!(result.scores.efficiency, 40.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn identical_inputs_give_identical_runs(
            actions in strategies::action_log(12, 24),
            initial in strategies::resources(),
            environment in strategies::environment_input(12),
        ) {
            let first = simulate(&actions, &seed(), initial, 12, &environment);
            let second = simulate(&actions, &seed(), initial, 12, &environment);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn resources_stay_in_bounds_every_day(
            actions in strategies::action_log(10, 30),
            initial in strategies::resources(),
            environment in strategies::environment_input(10),
        ) {
            let result = simulate(&actions, &seed(), initial, 10, &environment);
            for day in &result.days {
                prop_assert!(day.resources.is_non_negative());
                prop_assert!(day.resources.solar_energy <= SOLAR_MAX);
            }
            prop_assert!(result.final_state.resources.is_non_negative());
        }

        #[test]
        fn every_scheduled_action_is_applied_or_skipped_once(
            actions in strategies::action_log(8, 20),
            initial in strategies::resources(),
        ) {
            let result = simulate(&actions, &seed(), initial, 8, &EnvironmentInput::Absent);
            let applied: usize = result.days.iter().map(|day| day.applied.len()).sum();
            let skipped: usize = result.days.iter().map(|day| day.skipped.len()).sum();
            prop_assert_eq!(applied, result.actions.len());
            prop_assert_eq!(applied + skipped, actions.len());
        }

        #[test]
        fn unaffordable_actions_leave_state_unchanged(
            initial in strategies::resources(),
            kind in strategies::action_kind(),
            excess in 1.0f64..50.0,
        ) {
            let mut state = GameState::new(initial, 5);
            let before = state.clone();
            let cost = Resources::new(0.0, 0.0, initial.money + excess, 0.0, 0.0);
            let action = Action::new("too-dear", 0, kind, cost);
            prop_assert!(apply_action(&mut state, &action, &seed()).is_none());
            prop_assert_eq!(state, before);
        }
    }
}
