//! Campaign levels and level-boundary checkpoints.

use serde::Serialize;

use crate::io::seed::{Datasets, Seed, Targets, Weights};
use crate::resources::Resources;
use crate::scoring::calculate_scores;
use crate::state::{GameState, Scores};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTargets {
    pub min_score: f64,
    pub min_yield: f64,
    pub max_water_usage: f64,
    pub min_environment_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub id: u32,
    pub name: &'static str,
    pub objective: &'static str,
    pub difficulty: Difficulty,
    /// Days.
    pub duration: u32,
    pub initial_resources: Resources,
    pub targets: LevelTargets,
    pub reward_achievements: &'static [&'static str],
}

pub static LEVELS: [LevelConfig; 5] = [
    LevelConfig {
        id: 1,
        name: "Humidity Management",
        objective: "Maintain optimal soil moisture while conserving water",
        difficulty: Difficulty::Beginner,
        duration: 7,
        initial_resources: Resources {
            water: 100.0,
            fertilizer: 30.0,
            money: 150.0,
            seeds: 15.0,
            solar_energy: 0.0,
        },
        targets: LevelTargets {
            min_score: 60.0,
            min_yield: 70.0,
            max_water_usage: 80.0,
            min_environment_score: 65.0,
        },
        reward_achievements: &["WATER_SAVER"],
    },
    LevelConfig {
        id: 2,
        name: "NDVI Interpretation",
        objective: "Interpret vegetation health from satellite imagery",
        difficulty: Difficulty::Beginner,
        duration: 10,
        initial_resources: Resources {
            water: 120.0,
            fertilizer: 40.0,
            money: 180.0,
            seeds: 18.0,
            solar_energy: 0.0,
        },
        targets: LevelTargets {
            min_score: 70.0,
            min_yield: 80.0,
            max_water_usage: 90.0,
            min_environment_score: 70.0,
        },
        reward_achievements: &["DATA_ANALYST"],
    },
    LevelConfig {
        id: 3,
        name: "Frost Protection",
        objective: "Protect crops from frost damage using temperature data",
        difficulty: Difficulty::Intermediate,
        duration: 14,
        initial_resources: Resources {
            water: 140.0,
            fertilizer: 50.0,
            money: 200.0,
            seeds: 20.0,
            solar_energy: 0.0,
        },
        targets: LevelTargets {
            min_score: 75.0,
            min_yield: 85.0,
            max_water_usage: 100.0,
            min_environment_score: 75.0,
        },
        reward_achievements: &["FROST_GUARDIAN"],
    },
    LevelConfig {
        id: 4,
        name: "Drought Response",
        objective: "Sustain yield through a dry spell with scarce water",
        difficulty: Difficulty::Advanced,
        duration: 21,
        initial_resources: Resources {
            water: 80.0,
            fertilizer: 60.0,
            money: 250.0,
            seeds: 25.0,
            solar_energy: 0.0,
        },
        targets: LevelTargets {
            min_score: 80.0,
            min_yield: 90.0,
            max_water_usage: 60.0,
            min_environment_score: 85.0,
        },
        reward_achievements: &["DROUGHT_SURVIVOR"],
    },
    LevelConfig {
        id: 5,
        name: "Final Challenge",
        objective: "Combine every skill for a full season",
        difficulty: Difficulty::Expert,
        duration: 30,
        initial_resources: Resources {
            water: 150.0,
            fertilizer: 80.0,
            money: 300.0,
            seeds: 30.0,
            solar_energy: 0.0,
        },
        targets: LevelTargets {
            min_score: 90.0,
            min_yield: 95.0,
            max_water_usage: 120.0,
            min_environment_score: 90.0,
        },
        reward_achievements: &["SUPER_CARROT_PLATINUM", "MASTER_FARMER"],
    },
];

pub fn level_config(id: u32) -> Option<&'static LevelConfig> {
    LEVELS.iter().find(|level| level.id == id)
}

pub fn next_level(current: u32) -> Option<&'static LevelConfig> {
    current.checked_add(1).and_then(level_config)
}

/// Level 1 is always open; every other level needs its predecessor.
pub fn is_level_unlocked(id: u32, completed: &[u32]) -> bool {
    id == 1
        || id
            .checked_sub(1)
            .is_some_and(|previous| completed.contains(&previous))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub completed: bool,
    /// Percent of the level's minimum score reached, capped at 100.
    pub progress: f64,
    pub achievements: Vec<&'static str>,
}

pub fn level_progress(id: u32, scores: &Scores) -> LevelProgress {
    let Some(level) = level_config(id) else {
        return LevelProgress::default();
    };
    let progress = (scores.total / level.targets.min_score * 100.0).min(100.0);
    let completed = scores.total >= level.targets.min_score;
    let achievements = if completed {
        level.reward_achievements.to_vec()
    } else {
        Vec::new()
    };
    LevelProgress {
        completed,
        progress,
        achievements,
    }
}

/// Seed for a campaign level: default targets and weights with the level's
/// yield target.
pub fn seed_for_level(id: u32, date_start: &str, date_end: &str) -> Option<Seed> {
    let level = level_config(id)?;
    Some(Seed {
        id: format!("level-{id}-seed"),
        code: format!("LEVEL-{id}"),
        region: "Central Valley, California".to_string(),
        date_start: date_start.to_string(),
        date_end: date_end.to_string(),
        crop_type: "carrot".to_string(),
        targets: Targets {
            min_yield: level.targets.min_yield,
            ..Targets::default()
        },
        weights: Weights::default(),
        datasets: Datasets::standard_tiles(),
        notes: format!("Level {id}: {}", level.name),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub level: u32,
    pub scores: Scores,
    pub progress: LevelProgress,
}

/// Score the state as it stands and measure it against its current level.
pub fn level_checkpoint(state: &GameState, seed: &Seed) -> Checkpoint {
    let scores = calculate_scores(state, seed);
    Checkpoint {
        level: state.current_level,
        scores,
        progress: level_progress(state.current_level, &scores),
    }
}
