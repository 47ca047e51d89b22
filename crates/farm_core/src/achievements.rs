//! Achievement evaluation.
//!
//! Four independent checks run on every call. Only SUPER_CARROT is gated on
//! history: a newly earned tier is awarded only if it beats every tier the
//! player already holds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::action::ActionType;
use crate::state::{GameState, Scores};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    SuperCarrot,
    WaterSaver,
    YieldMaster,
    Environmentalist,
}

impl fmt::Display for AchievementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AchievementType::SuperCarrot => "SUPER_CARROT",
            AchievementType::WaterSaver => "WATER_SAVER",
            AchievementType::YieldMaster => "YIELD_MASTER",
            AchievementType::Environmentalist => "ENVIRONMENTALIST",
        };
        f.write_str(label)
    }
}

/// Achievement rank; declaration order is the total order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AchievementType,
    pub tier: Tier,
    pub title: String,
    pub description: String,
    pub earned_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Value,
}

/// Evaluate every rule against a finished run.
pub fn calculate_achievements(
    state: &GameState,
    scores: &Scores,
    previous: &[Achievement],
    earned_at: DateTime<Utc>,
) -> Vec<Achievement> {
    [
        super_carrot(scores, previous, earned_at),
        water_saver(state, scores, earned_at),
        yield_master(scores, earned_at),
        environmentalist(state, scores, earned_at),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn super_carrot_tier(scores: &Scores) -> Option<Tier> {
    if scores.total >= 92.0 && scores.environment >= 95.0 {
        Some(Tier::Platinum)
    } else if scores.total >= 85.0 && scores.water >= 80.0 {
        Some(Tier::Gold)
    } else if scores.total >= 75.0 {
        Some(Tier::Silver)
    } else if scores.total >= 60.0 {
        Some(Tier::Bronze)
    } else {
        None
    }
}

/// Highest SUPER_CARROT tier among `achievements`.
pub fn best_super_carrot(achievements: &[Achievement]) -> Option<Tier> {
    achievements
        .iter()
        .filter(|a| a.kind == AchievementType::SuperCarrot)
        .map(|a| a.tier)
        .max()
}

fn achievement_id(prefix: &str, earned_at: DateTime<Utc>) -> String {
    format!("{prefix}_{}", earned_at.timestamp_millis())
}

fn super_carrot(
    scores: &Scores,
    previous: &[Achievement],
    earned_at: DateTime<Utc>,
) -> Option<Achievement> {
    let tier = super_carrot_tier(scores)?;
    if best_super_carrot(previous).is_some_and(|held| held >= tier) {
        return None;
    }

    let (title, description) = match tier {
        Tier::Bronze => (
            "Bronze Super Carrot",
            format!(
                "Good farming! You achieved a total score of {} with balanced practices.",
                scores.total
            ),
        ),
        Tier::Silver => (
            "Silver Super Carrot",
            format!(
                "Excellent work! Your score of {} shows strong farming skills.",
                scores.total
            ),
        ),
        Tier::Gold => (
            "Gold Super Carrot",
            format!(
                "Outstanding! Score of {} with efficient water usage ({}).",
                scores.total, scores.water
            ),
        ),
        Tier::Platinum => (
            "Platinum Super Carrot",
            format!(
                "Perfect! Score of {} with minimal environmental impact ({}).",
                scores.total, scores.environment
            ),
        ),
    };

    Some(Achievement {
        id: achievement_id(&format!("super_carrot_{}", tier.slug()), earned_at),
        kind: AchievementType::SuperCarrot,
        tier,
        title: title.to_string(),
        description,
        earned_at,
        metadata: json!({ "scores": scores, "tier": tier }),
    })
}

fn water_saver(
    state: &GameState,
    scores: &Scores,
    earned_at: DateTime<Utc>,
) -> Option<Achievement> {
    if scores.water < 90.0 {
        return None;
    }
    Some(Achievement {
        id: achievement_id("water_saver", earned_at),
        kind: AchievementType::WaterSaver,
        tier: Tier::Gold,
        title: "Water Saver".to_string(),
        description: format!(
            "Amazing water efficiency! You achieved a water score of {} by using water wisely.",
            scores.water
        ),
        earned_at,
        metadata: json!({
            "waterScore": scores.water,
            "waterActions": state.count_actions(ActionType::Water),
        }),
    })
}

fn yield_master(scores: &Scores, earned_at: DateTime<Utc>) -> Option<Achievement> {
    if scores.yield_score < 90.0 {
        return None;
    }
    Some(Achievement {
        id: achievement_id("yield_master", earned_at),
        kind: AchievementType::YieldMaster,
        tier: Tier::Gold,
        title: "Yield Master".to_string(),
        description: format!(
            "Incredible yield! You achieved a yield score of {} through optimal farming practices.",
            scores.yield_score
        ),
        earned_at,
        metadata: json!({ "yieldScore": scores.yield_score }),
    })
}

fn environmentalist(
    state: &GameState,
    scores: &Scores,
    earned_at: DateTime<Utc>,
) -> Option<Achievement> {
    let organic_actions = state.organic_fertilize_count();
    if scores.environment < 90.0 || organic_actions < 3 {
        return None;
    }
    Some(Achievement {
        id: achievement_id("environmentalist", earned_at),
        kind: AchievementType::Environmentalist,
        tier: Tier::Platinum,
        title: "Environmental Champion".to_string(),
        description: format!(
            "Perfect environmental stewardship! Score of {} with {} organic practices.",
            scores.environment, organic_actions
        ),
        earned_at,
        metadata: json!({
            "environmentScore": scores.environment,
            "organicActions": organic_actions,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, ActionKind, FertilizerKind};
    use crate::resources::Resources;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).single().expect("valid timestamp")
    }

    fn scores(total: f64, yield_score: f64, water: f64, environment: f64) -> Scores {
        Scores {
            total,
            yield_score,
            water,
            environment,
            efficiency: 50.0,
        }
    }

    fn held(tier: Tier) -> Achievement {
        Achievement {
            id: "old".to_string(),
            kind: AchievementType::SuperCarrot,
            tier,
            title: String::new(),
            description: String::new(),
            earned_at: now(),
            metadata: Value::Null,
        }
    }

    #[test]
    fn tiers_are_strictly_ordered() {
        assert!(Tier::Bronze < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
        assert!(Tier::Gold < Tier::Platinum);
    }

    #[test]
    fn super_carrot_tier_thresholds() {
        assert_eq!(super_carrot_tier(&scores(92.0, 0.0, 0.0, 95.0)), Some(Tier::Platinum));
        assert_eq!(super_carrot_tier(&scores(92.0, 0.0, 79.0, 94.0)), Some(Tier::Silver));
        assert_eq!(super_carrot_tier(&scores(85.0, 0.0, 80.0, 0.0)), Some(Tier::Gold));
        assert_eq!(super_carrot_tier(&scores(75.0, 0.0, 0.0, 0.0)), Some(Tier::Silver));
        assert_eq!(super_carrot_tier(&scores(60.0, 0.0, 0.0, 0.0)), Some(Tier::Bronze));
        assert_eq!(super_carrot_tier(&scores(59.0, 0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn equal_or_higher_held_tier_suppresses_super_carrot() {
        let state = GameState::new(Resources::default(), 10);
        let run = scores(86.0, 0.0, 85.0, 0.0);
        for tier in [Tier::Gold, Tier::Platinum] {
            let earned = calculate_achievements(&state, &run, &[held(tier)], now());
            assert!(earned.iter().all(|a| a.kind != AchievementType::SuperCarrot));
        }
    }

    #[test]
    fn higher_tier_supersedes_held_one() {
        let state = GameState::new(Resources::default(), 10);
        let run = scores(86.0, 0.0, 85.0, 0.0);
        let previous = [held(Tier::Bronze), held(Tier::Silver)];
        let earned = calculate_achievements(&state, &run, &previous, now());
        let carrot = earned
            .iter()
            .find(|a| a.kind == AchievementType::SuperCarrot)
            .expect("gold carrot awarded");
        assert_eq!(carrot.tier, Tier::Gold);
        assert_eq!(carrot.id, format!("super_carrot_gold_{}", now().timestamp_millis()));
    }

    #[test]
    fn all_four_can_be_earned_together() {
        let mut state = GameState::new(Resources::default(), 10);
        for i in 0..3 {
            state.actions.push(Action::new(
                format!("f{i}"),
                i,
                ActionKind::Fertilize {
                    amount: Some(2.0),
                    kind: Some(FertilizerKind::Organic),
                },
                Resources::default(),
            ));
        }
        let run = scores(95.0, 92.0, 100.0, 100.0);
        let earned = calculate_achievements(&state, &run, &[], now());
        let kinds: Vec<_> = earned.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AchievementType::SuperCarrot,
                AchievementType::WaterSaver,
                AchievementType::YieldMaster,
                AchievementType::Environmentalist,
            ]
        );
        assert_eq!(earned[3].metadata["organicActions"], 3);
    }

    #[test]
    fn environmentalist_needs_three_organic_actions() {
        let state = GameState::new(Resources::default(), 10);
        let earned = calculate_achievements(&state, &scores(10.0, 0.0, 0.0, 100.0), &[], now());
        assert!(earned.is_empty());
    }

    #[test]
    fn achievement_round_trips_through_json() {
        let achievement = held(Tier::Silver);
        let text = serde_json::to_string(&achievement).expect("serializes");
        assert!(text.contains(r#""type":"SUPER_CARROT""#));
        let back: Achievement = serde_json::from_str(&text).expect("parses");
        assert_eq!(back, achievement);
    }
}
