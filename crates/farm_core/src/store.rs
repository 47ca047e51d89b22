//! Read/write contract of the persistence layer, with an in-memory backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::achievements::Achievement;
use crate::action::Action;
use crate::io::seed::Seed;
use crate::state::Scores;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("seed {0} not found")]
    SeedNotFound(String),
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("player {0} not found")]
    PlayerNotFound(String),
    #[error("room code {0} is already taken")]
    DuplicateRoom(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub anon_id: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
}

/// A run as submitted, before the store assigns its id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRun {
    pub player_id: String,
    pub seed_id: String,
    pub level: u32,
    pub scores: Scores,
    pub duration_s: u64,
    pub actions_log: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: String,
    pub player_id: String,
    pub seed_id: String,
    pub level: u32,
    pub scores: Scores,
    pub duration_s: u64,
    pub actions_log: Vec<Action>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMember {
    pub player_id: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub code: String,
    pub seed_id: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<RoomMember>,
}

impl Room {
    pub fn has_member(&self, player_id: &str) -> bool {
        self.members.iter().any(|member| member.player_id == player_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player_alias: String,
    pub score_total: f64,
    pub tier: String,
    pub duration_s: u64,
}

/// Display tier for a leaderboard score.
pub fn tier_label(score: f64) -> &'static str {
    if score >= 92.0 {
        "PLATINUM"
    } else if score >= 85.0 {
        "GOLD"
    } else if score >= 75.0 {
        "SILVER"
    } else if score >= 60.0 {
        "BRONZE"
    } else {
        "NONE"
    }
}

pub trait RunStore {
    fn seed_by_code(&self, code: &str) -> Result<Seed, StoreError>;
    fn create_player(&mut self, anon_id: &str, alias: &str) -> Player;
    fn player_alias(&self, player_id: &str) -> Option<String>;
    fn insert_run(&mut self, run: NewRun) -> Result<RunRecord, StoreError>;
    fn insert_achievements(
        &mut self,
        player_id: &str,
        seed_id: &str,
        achievements: &[Achievement],
    ) -> Result<(), StoreError>;
    fn achievements_for_player(&self, player_id: &str) -> Vec<Achievement>;
    /// Achievements a player earned on one seed.
    fn achievements_for_seed(&self, player_id: &str, seed_id: &str) -> Vec<Achievement>;
    fn create_room(&mut self, code: &str, seed_code: &str) -> Result<Room, StoreError>;
    fn join_room(&mut self, code: &str, player_id: &str) -> Result<Room, StoreError>;
    fn room_by_code(&self, code: &str) -> Result<Room, StoreError>;
    /// Runs for a seed, best score first, optionally limited to one room's
    /// members. Equal scores keep insertion order.
    fn leaderboard(
        &self,
        seed_id: &str,
        room: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardRow>, StoreError>;
    fn run_count(&self, seed_id: &str) -> usize;
    /// 1-based position of a run among all runs for its seed.
    fn run_rank(&self, run_id: &str) -> Option<usize>;
}

#[derive(Clone, Debug, PartialEq)]
struct StoredAchievement {
    player_id: String,
    seed_id: String,
    achievement: Achievement,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    seeds: HashMap<String, Seed>,
    players: HashMap<String, Player>,
    runs: Vec<RunRecord>,
    achievements: Vec<StoredAchievement>,
    rooms: HashMap<String, Room>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a seed under its code, replacing any previous one.
    pub fn insert_seed(&mut self, seed: Seed) {
        self.seeds.insert(seed.code.clone(), seed);
    }

    pub fn with_seeds(seeds: impl IntoIterator<Item = Seed>) -> Self {
        let mut store = Self::new();
        for seed in seeds {
            store.insert_seed(seed);
        }
        store
    }

    /// Code of the registered seed with this id.
    pub fn seed_code_for(&self, seed_id: &str) -> Option<String> {
        self.seeds
            .values()
            .find(|seed| seed.id == seed_id)
            .map(|seed| seed.code.clone())
    }

    fn seed_id_exists(&self, seed_id: &str) -> bool {
        self.seed_code_for(seed_id).is_some()
    }

    fn ranked_runs(&self, seed_id: &str) -> Vec<&RunRecord> {
        let mut runs: Vec<&RunRecord> =
            self.runs.iter().filter(|run| run.seed_id == seed_id).collect();
        runs.sort_by(|a, b| b.scores.total.total_cmp(&a.scores.total));
        runs
    }
}

impl RunStore for MemoryStore {
    fn seed_by_code(&self, code: &str) -> Result<Seed, StoreError> {
        self.seeds
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::SeedNotFound(code.to_string()))
    }

    fn create_player(&mut self, anon_id: &str, alias: &str) -> Player {
        let player = Player {
            id: Uuid::new_v4().to_string(),
            anon_id: anon_id.to_string(),
            alias: alias.to_string(),
            created_at: Utc::now(),
        };
        self.players.insert(player.id.clone(), player.clone());
        player
    }

    fn player_alias(&self, player_id: &str) -> Option<String> {
        self.players.get(player_id).map(|player| player.alias.clone())
    }

    fn insert_run(&mut self, run: NewRun) -> Result<RunRecord, StoreError> {
        if !self.players.contains_key(&run.player_id) {
            return Err(StoreError::PlayerNotFound(run.player_id));
        }
        if !self.seed_id_exists(&run.seed_id) {
            return Err(StoreError::SeedNotFound(run.seed_id));
        }
        let record = RunRecord {
            id: Uuid::new_v4().to_string(),
            player_id: run.player_id,
            seed_id: run.seed_id,
            level: run.level,
            scores: run.scores,
            duration_s: run.duration_s,
            actions_log: run.actions_log,
            created_at: Utc::now(),
        };
        self.runs.push(record.clone());
        Ok(record)
    }

    fn insert_achievements(
        &mut self,
        player_id: &str,
        seed_id: &str,
        achievements: &[Achievement],
    ) -> Result<(), StoreError> {
        if !self.players.contains_key(player_id) {
            return Err(StoreError::PlayerNotFound(player_id.to_string()));
        }
        self.achievements
            .extend(achievements.iter().map(|achievement| StoredAchievement {
                player_id: player_id.to_string(),
                seed_id: seed_id.to_string(),
                achievement: achievement.clone(),
            }));
        Ok(())
    }

    fn achievements_for_player(&self, player_id: &str) -> Vec<Achievement> {
        self.achievements
            .iter()
            .filter(|stored| stored.player_id == player_id)
            .map(|stored| stored.achievement.clone())
            .collect()
    }

    fn achievements_for_seed(&self, player_id: &str, seed_id: &str) -> Vec<Achievement> {
        self.achievements
            .iter()
            .filter(|stored| stored.player_id == player_id && stored.seed_id == seed_id)
            .map(|stored| stored.achievement.clone())
            .collect()
    }

    fn create_room(&mut self, code: &str, seed_code: &str) -> Result<Room, StoreError> {
        if self.rooms.contains_key(code) {
            return Err(StoreError::DuplicateRoom(code.to_string()));
        }
        let seed = self.seed_by_code(seed_code)?;
        let room = Room {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            seed_id: seed.id,
            created_at: Utc::now(),
            members: Vec::new(),
        };
        self.rooms.insert(room.code.clone(), room.clone());
        Ok(room)
    }

    fn join_room(&mut self, code: &str, player_id: &str) -> Result<Room, StoreError> {
        if !self.players.contains_key(player_id) {
            return Err(StoreError::PlayerNotFound(player_id.to_string()));
        }
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| StoreError::RoomNotFound(code.to_string()))?;
        if !room.has_member(player_id) {
            room.members.push(RoomMember {
                player_id: player_id.to_string(),
                joined_at: Utc::now(),
            });
        }
        Ok(room.clone())
    }

    fn room_by_code(&self, code: &str) -> Result<Room, StoreError> {
        self.rooms
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::RoomNotFound(code.to_string()))
    }

    fn leaderboard(
        &self,
        seed_id: &str,
        room: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardRow>, StoreError> {
        let room = room.map(|code| self.room_by_code(code)).transpose()?;
        let rows = self
            .ranked_runs(seed_id)
            .into_iter()
            .filter(|run| room.as_ref().map_or(true, |room| room.has_member(&run.player_id)))
            .take(limit)
            .enumerate()
            .map(|(index, run)| LeaderboardRow {
                rank: index + 1,
                player_alias: self
                    .player_alias(&run.player_id)
                    .unwrap_or_else(|| "Anonymous".to_string()),
                score_total: run.scores.total,
                tier: tier_label(run.scores.total).to_string(),
                duration_s: run.duration_s,
            })
            .collect();
        Ok(rows)
    }

    fn run_count(&self, seed_id: &str) -> usize {
        self.runs.iter().filter(|run| run.seed_id == seed_id).count()
    }

    fn run_rank(&self, run_id: &str) -> Option<usize> {
        let run = self.runs.iter().find(|run| run.id == run_id)?;
        self.ranked_runs(&run.seed_id)
            .iter()
            .position(|candidate| candidate.id == run_id)
            .map(|index| index + 1)
    }
}
