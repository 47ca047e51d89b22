use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::resources::Resources;

/// Water applied by a WATER action that names no amount.
pub const DEFAULT_WATER_AMOUNT: f64 = 10.0;

/// Fertilizer applied by a FERTILIZE action that names no amount.
pub const DEFAULT_FERTILIZER_AMOUNT: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Water,
    Fertilize,
    Plant,
    Harvest,
    Wait,
    SolarCharge,
    Irrigate,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionType::Water => "WATER",
            ActionType::Fertilize => "FERTILIZE",
            ActionType::Plant => "PLANT",
            ActionType::Harvest => "HARVEST",
            ActionType::Wait => "WAIT",
            ActionType::SolarCharge => "SOLAR_CHARGE",
            ActionType::Irrigate => "IRRIGATE",
        };
        f.write_str(label)
    }
}

/// Fertilizer family named in a FERTILIZE payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FertilizerKind {
    Organic,
    Synthetic,
    Compost,
    Other(String),
}

impl FertilizerKind {
    /// Effectiveness multiplier relative to a neutral fertilizer.
    pub fn effectiveness(&self) -> f64 {
        match self {
            FertilizerKind::Organic => 0.8,
            FertilizerKind::Synthetic => 1.2,
            FertilizerKind::Compost => 0.6,
            FertilizerKind::Other(_) => 1.0,
        }
    }

    /// Environmental impact per unit applied.
    pub fn impact(&self) -> f64 {
        match self {
            FertilizerKind::Organic => 0.3,
            FertilizerKind::Synthetic => 1.0,
            FertilizerKind::Compost => 0.1,
            FertilizerKind::Other(_) => 1.0,
        }
    }
}

impl From<String> for FertilizerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "organic" => FertilizerKind::Organic,
            "synthetic" => FertilizerKind::Synthetic,
            "compost" => FertilizerKind::Compost,
            _ => FertilizerKind::Other(value),
        }
    }
}

impl From<FertilizerKind> for String {
    fn from(value: FertilizerKind) -> Self {
        match value {
            FertilizerKind::Organic => "organic".to_string(),
            FertilizerKind::Synthetic => "synthetic".to_string(),
            FertilizerKind::Compost => "compost".to_string(),
            FertilizerKind::Other(other) => other,
        }
    }
}

/// Action variants, each carrying only the payload fields it reads.
///
/// Amounts stay optional: processors substitute defaults, while scoring sums
/// the amounts exactly as the player submitted them.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionKind {
    Water {
        amount: Option<f64>,
    },
    Fertilize {
        amount: Option<f64>,
        kind: Option<FertilizerKind>,
    },
    Plant {
        crop: Option<String>,
    },
    Harvest,
    Wait,
    SolarCharge,
    Irrigate,
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::Water { .. } => ActionType::Water,
            ActionKind::Fertilize { .. } => ActionType::Fertilize,
            ActionKind::Plant { .. } => ActionType::Plant,
            ActionKind::Harvest => ActionType::Harvest,
            ActionKind::Wait => ActionType::Wait,
            ActionKind::SolarCharge => ActionType::SolarCharge,
            ActionKind::Irrigate => ActionType::Irrigate,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action {id} ({action_type}) has an invalid payload: {source}")]
    Payload {
        id: String,
        action_type: ActionType,
        #[source]
        source: serde_json::Error,
    },
}

/// An immutable, scheduled player action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub day: u32,
    pub cost: Resources,
}

impl Action {
    pub fn new(id: impl Into<String>, day: u32, kind: ActionKind, cost: Resources) -> Self {
        Self {
            id: id.into(),
            kind,
            day,
            cost,
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }

    /// Water amount as submitted; zero when the payload names none.
    pub fn submitted_water(&self) -> f64 {
        match &self.kind {
            ActionKind::Water { amount } => amount.unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Fertilizer amount as submitted; zero when the payload names none.
    pub fn submitted_fertilizer(&self) -> f64 {
        match &self.kind {
            ActionKind::Fertilize { amount, .. } => amount.unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Only an explicit `"organic"` type counts, not the processor default.
    pub fn is_organic_fertilize(&self) -> bool {
        matches!(
            &self.kind,
            ActionKind::Fertilize {
                kind: Some(FertilizerKind::Organic),
                ..
            }
        )
    }
}

/// Treat a zero or missing amount as "use the default".
pub(crate) fn amount_or(amount: Option<f64>, default: f64) -> f64 {
    match amount {
        Some(value) if value != 0.0 => value,
        _ => default,
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize)]
struct AmountPayload {
    amount: Option<f64>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize)]
struct FertilizePayload {
    amount: Option<f64>,
    #[serde(rename = "type")]
    kind: Option<FertilizerKind>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize)]
struct PlantPayload {
    crop: Option<String>,
}

/// Wire shape of an action: `{id, type, payload, day, cost}`.
#[derive(Debug, Serialize, Deserialize)]
struct RawAction {
    id: String,
    #[serde(rename = "type")]
    action_type: ActionType,
    #[serde(default)]
    payload: Value,
    day: u32,
    #[serde(default)]
    cost: Resources,
}

impl TryFrom<RawAction> for Action {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let payload = if raw.payload.is_null() {
            Value::Object(Default::default())
        } else {
            raw.payload
        };
        let invalid = |source| ActionError::Payload {
            id: raw.id.clone(),
            action_type: raw.action_type,
            source,
        };

        let kind = match raw.action_type {
            ActionType::Water => {
                let body: AmountPayload = serde_json::from_value(payload).map_err(invalid)?;
                ActionKind::Water {
                    amount: body.amount,
                }
            }
            ActionType::Fertilize => {
                let body: FertilizePayload = serde_json::from_value(payload).map_err(invalid)?;
                ActionKind::Fertilize {
                    amount: body.amount,
                    kind: body.kind,
                }
            }
            ActionType::Plant => {
                let body: PlantPayload = serde_json::from_value(payload).map_err(invalid)?;
                ActionKind::Plant { crop: body.crop }
            }
            ActionType::Harvest => ActionKind::Harvest,
            ActionType::Wait => ActionKind::Wait,
            ActionType::SolarCharge => ActionKind::SolarCharge,
            ActionType::Irrigate => ActionKind::Irrigate,
        };

        Ok(Action {
            id: raw.id,
            kind,
            day: raw.day,
            cost: raw.cost,
        })
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let action_type = action.action_type();
        let payload = match action.kind {
            ActionKind::Water { amount } => serde_json::to_value(AmountPayload { amount }),
            ActionKind::Fertilize { amount, kind } => {
                serde_json::to_value(FertilizePayload { amount, kind })
            }
            ActionKind::Plant { crop } => serde_json::to_value(PlantPayload { crop }),
            _ => Ok(Value::Object(Default::default())),
        }
        .unwrap_or_default();

        RawAction {
            id: action.id,
            action_type,
            payload,
            day: action.day,
            cost: action.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_payload_parses_amount() {
        let action: Action = serde_json::from_str(
            r#"{"id":"a1","type":"WATER","payload":{"amount":12.5},"day":3,
                "cost":{"water":0,"fertilizer":0,"money":1,"seeds":0}}"#,
        )
        .expect("action parses");
        assert_eq!(action.kind, ActionKind::Water { amount: Some(12.5) });
        assert_eq!(action.day, 3);
        assert_eq!(action.cost.money, 1.0);
    }

    #[test]
    fn missing_payload_and_cost_default() {
        let action: Action =
            serde_json::from_str(r#"{"id":"w","type":"WAIT","day":0}"#).expect("action parses");
        assert_eq!(action.kind, ActionKind::Wait);
        assert_eq!(action.cost, Resources::default());
    }

    #[test]
    fn fertilizer_type_maps_known_and_unknown_names() {
        let action: Action = serde_json::from_str(
            r#"{"id":"f","type":"FERTILIZE","payload":{"amount":4,"type":"manure"},"day":1}"#,
        )
        .expect("action parses");
        assert_eq!(
            action.kind,
            ActionKind::Fertilize {
                amount: Some(4.0),
                kind: Some(FertilizerKind::Other("manure".to_string())),
            }
        );
        assert!(!action.is_organic_fertilize());
    }

    #[test]
    fn default_fertilizer_type_is_not_counted_as_organic() {
        let action = Action::new(
            "f",
            0,
            ActionKind::Fertilize {
                amount: None,
                kind: None,
            },
            Resources::default(),
        );
        assert!(!action.is_organic_fertilize());
        assert_eq!(action.submitted_fertilizer(), 0.0);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let err = serde_json::from_str::<Action>(
            r#"{"id":"bad","type":"WATER","payload":{"amount":"lots"},"day":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        assert!(serde_json::from_str::<Action>(r#"{"id":"x","type":"DANCE","day":0}"#).is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let action = Action::new(
            "c1",
            4,
            ActionKind::Fertilize {
                amount: Some(2.0),
                kind: Some(FertilizerKind::Compost),
            },
            Resources::default(),
        );
        let value = serde_json::to_value(&action).expect("action serializes");
        assert_eq!(value["type"], "FERTILIZE");
        assert_eq!(value["payload"]["type"], "compost");
        assert_eq!(value["payload"]["amount"], 2.0);
        assert_eq!(value["cost"]["solarEnergy"], 0.0);
    }

    #[test]
    fn zero_amount_falls_back_to_default() {
        assert_eq!(amount_or(Some(0.0), DEFAULT_WATER_AMOUNT), 10.0);
        assert_eq!(amount_or(None, DEFAULT_FERTILIZER_AMOUNT), 5.0);
        assert_eq!(amount_or(Some(7.0), DEFAULT_WATER_AMOUNT), 7.0);
    }
}
