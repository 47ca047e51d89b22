//! Optional overlay rewarding engagement with the data-exploration features.
//!
//! The overlay never replaces [`crate::scoring::calculate_scores`]; it takes
//! the base scores as input and layers bonuses, penalties and a
//! decision-quality multiplier on top.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::environment::EnvironmentData;
use crate::scoring::round_score;
use crate::state::Scores;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageMetrics {
    pub layers_viewed: u32,
    pub simulations_run: u32,
    pub missions_completed: u32,
    pub alerts_responded: u32,
    pub correct_decisions: u32,
    pub incorrect_decisions: u32,
    pub alerts_ignored: u32,
    pub total_decisions: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageBonus {
    pub data_usage: f64,
    pub what_if_usage: f64,
    pub mission_complete: f64,
    pub alert_response: f64,
    pub total: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalties {
    pub ignored_alerts: f64,
    pub bad_decisions: f64,
    pub total: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedScores {
    pub base: Scores,
    pub bonus: UsageBonus,
    pub penalties: Penalties,
    pub decision_multiplier: f64,
    pub final_score: f64,
}

pub fn usage_bonus(usage: &UsageMetrics) -> UsageBonus {
    let data_usage = (f64::from(usage.layers_viewed) * 5.0).min(50.0);
    let what_if_usage = (f64::from(usage.simulations_run) * 10.0).min(30.0);
    let mission_complete = f64::from(usage.missions_completed) * 25.0;
    let alert_response = (20.0 - f64::from(usage.alerts_ignored) * 10.0).max(0.0);
    UsageBonus {
        data_usage,
        what_if_usage,
        mission_complete,
        alert_response,
        total: data_usage + what_if_usage + mission_complete + alert_response,
    }
}

pub fn penalties(usage: &UsageMetrics) -> Penalties {
    let ignored_alerts = f64::from(usage.alerts_ignored) * 25.0;
    let bad_decisions = f64::from(usage.incorrect_decisions) * 15.0;
    Penalties {
        ignored_alerts,
        bad_decisions,
        total: ignored_alerts + bad_decisions,
    }
}

/// `1 + (correct - incorrect) / total`, clamped to `[0.5, 1.5]`.
pub fn decision_multiplier(usage: &UsageMetrics) -> f64 {
    let total = usage.total_decisions.max(1);
    let net = f64::from(usage.correct_decisions) - f64::from(usage.incorrect_decisions);
    (1.0 + net / f64::from(total)).clamp(0.5, 1.5)
}

pub fn calculate_enhanced_score(base: &Scores, usage: &UsageMetrics) -> EnhancedScores {
    let bonus = usage_bonus(usage);
    let penalties = penalties(usage);
    let decision_multiplier = decision_multiplier(usage);
    let adjusted = base.total * decision_multiplier;
    let final_score = round_score(adjusted + bonus.total - penalties.total).max(0.0);

    EnhancedScores {
        base: *base,
        bonus,
        penalties,
        decision_multiplier,
        final_score,
    }
}

/// Player decision judged against the data available at the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Water,
    Fertilize,
    Protect,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionOutcome {
    pub moisture_increased: bool,
    pub nutrients_increased: bool,
    pub damage_prevented: bool,
}

/// Soil moisture here is a fraction, not a percentage.
pub fn evaluate_decision_quality(
    decision: Decision,
    data: &EnvironmentData,
    outcome: &DecisionOutcome,
) -> bool {
    match decision {
        Decision::Water => data.soil_moisture < 0.4 && outcome.moisture_increased,
        Decision::Fertilize => data.ndvi < 0.5 && outcome.nutrients_increased,
        Decision::Protect => data.temperature < 5.0 && outcome.damage_prevented,
        Decision::Other => false,
    }
}

/// Bonus points for named data-use achievements; unknown names are worth nothing.
pub fn achievement_bonus<S: AsRef<str>>(names: &[S]) -> u32 {
    names
        .iter()
        .map(|name| match name.as_ref() {
            "Data Explorer" => 25,
            "Simulation Master" => 50,
            "Mission Commander" => 100,
            "NASA Farmer" => 200,
            "Drought Survivor" => 75,
            "Frost Fighter" => 75,
            "Efficiency Expert" => 150,
            _ => 0,
        })
        .sum()
}

/// Accumulates [`UsageMetrics`] during play. Layers, missions and alerts
/// count once per distinct id.
#[derive(Clone, Debug, Default)]
pub struct UsageTracker {
    metrics: UsageMetrics,
    viewed_layers: HashSet<String>,
    completed_missions: HashSet<String>,
    responded_alerts: HashSet<String>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_layer_view(&mut self, layer: &str) {
        if self.viewed_layers.insert(layer.to_string()) {
            self.metrics.layers_viewed = self.viewed_layers.len() as u32;
        }
    }

    pub fn track_simulation(&mut self) {
        self.metrics.simulations_run += 1;
    }

    pub fn track_mission_complete(&mut self, mission_id: &str) {
        if self.completed_missions.insert(mission_id.to_string()) {
            self.metrics.missions_completed = self.completed_missions.len() as u32;
        }
    }

    pub fn track_alert_response(&mut self, alert_type: &str) {
        if self.responded_alerts.insert(alert_type.to_string()) {
            self.metrics.alerts_responded = self.responded_alerts.len() as u32;
        }
    }

    pub fn track_decision(&mut self, decision: Decision, was_correct: bool) {
        self.metrics.total_decisions += 1;
        if was_correct {
            self.metrics.correct_decisions += 1;
        } else {
            self.metrics.incorrect_decisions += 1;
        }
        trace!(?decision, was_correct, "decision tracked");
    }

    pub fn track_alert_ignored(&mut self) {
        self.metrics.alerts_ignored += 1;
        trace!("alert ignored");
    }

    pub fn metrics(&self) -> UsageMetrics {
        self.metrics
    }
}
