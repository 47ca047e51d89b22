use serde::{Deserialize, Serialize};

use crate::achievements::Achievement;
use crate::action::{Action, ActionType};
use crate::environment::EnvironmentData;
use crate::resources::Resources;

/// Component scores for a run, written only by the scoring engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub total: f64,
    #[serde(rename = "yield")]
    pub yield_score: f64,
    pub water: f64,
    pub environment: f64,
    pub efficiency: f64,
}

/// Mutable accumulator for a single run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_level: u32,
    pub current_day: u32,
    pub total_days: u32,
    pub resources: Resources,
    pub actions: Vec<Action>,
    pub scores: Scores,
    pub achievements: Vec<Achievement>,
    pub is_game_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_data: Option<EnvironmentData>,
}

impl GameState {
    pub fn new(initial_resources: Resources, total_days: u32) -> Self {
        Self {
            current_level: 1,
            current_day: 0,
            total_days,
            resources: initial_resources,
            actions: Vec::new(),
            scores: Scores::default(),
            achievements: Vec::new(),
            is_game_complete: false,
            environment_data: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.current_level = level;
        self
    }

    /// Number of applied actions of the given type.
    pub fn count_actions(&self, action_type: ActionType) -> usize {
        self.actions
            .iter()
            .filter(|action| action.action_type() == action_type)
            .count()
    }

    /// Number of applied FERTILIZE actions explicitly typed `organic`.
    pub fn organic_fertilize_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| action.is_organic_fertilize())
            .count()
    }
}
