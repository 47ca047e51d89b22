//! Super vegetables grown from a finished run's scores.
//!
//! Size, colour, shape and texture come from score thresholds, stats are a
//! base block raised by capped score bonuses scaled per location, and
//! abilities unlock above fixed scores. Battle power is a weighted stat sum.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GameState, Scores};

const BONUS_CAP: f64 = 20.0;
const STAT_MAX: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Carrot,
    Tomato,
    Lettuce,
    Corn,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BaseType::Carrot => "carrot",
            BaseType::Tomato => "tomato",
            BaseType::Lettuce => "lettuce",
            BaseType::Corn => "corn",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Arid,
    Temperate,
    Tropical,
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "arid" => Ok(LocationType::Arid),
            "temperate" => Ok(LocationType::Temperate),
            "tropical" => Ok(LocationType::Tropical),
            other => Err(format!(
                "unknown location type {other:?}, expected arid, temperate or tropical"
            )),
        }
    }
}

struct LocationMultipliers {
    growth: f64,
    water: f64,
    solar: f64,
}

impl LocationType {
    fn multipliers(self) -> LocationMultipliers {
        match self {
            LocationType::Arid => LocationMultipliers {
                growth: 0.8,
                water: 1.5,
                solar: 1.3,
            },
            LocationType::Tropical => LocationMultipliers {
                growth: 1.3,
                water: 0.7,
                solar: 0.8,
            },
            LocationType::Temperate => LocationMultipliers {
                growth: 1.0,
                water: 1.0,
                solar: 1.0,
            },
        }
    }

    /// Colours for ordinary, strong (total ≥ 75) and outstanding (total ≥ 90) runs.
    fn palette(self) -> [&'static str; 3] {
        match self {
            LocationType::Arid => ["golden", "amber", "bronze"],
            LocationType::Temperate => ["green", "emerald", "forest"],
            LocationType::Tropical => ["vibrant", "rainbow", "tropical"],
        }
    }

    fn feature(self) -> &'static str {
        match self {
            LocationType::Arid => "desert-adaptation",
            LocationType::Tropical => "tropical-resilience",
            LocationType::Temperate => "seasonal-adaptation",
        }
    }

    fn ability(self) -> Ability {
        match self {
            LocationType::Arid => Ability::passive(
                "desert-survivor",
                "Desert Survivor",
                "Extra resistance to heat and drought",
                "heat_resistance",
            ),
            LocationType::Tropical => Ability::passive(
                "rain-absorber",
                "Rain Absorber",
                "Turns excess rain into growth",
                "rain_conversion",
            ),
            LocationType::Temperate => Ability::passive(
                "seasonal-adaptation",
                "Seasonal Adaptation",
                "Adapts to changing seasons",
                "seasonal_adaptation",
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
    Giant,
}

impl Size {
    pub fn for_total(total: f64) -> Self {
        if total >= 95.0 {
            Size::Giant
        } else if total >= 85.0 {
            Size::Large
        } else if total >= 70.0 {
            Size::Medium
        } else {
            Size::Small
        }
    }

    /// Render scale of the model.
    pub fn scale(self) -> f64 {
        match self {
            Size::Giant => 2.0,
            Size::Large => 1.5,
            Size::Medium => 1.0,
            Size::Small => 0.7,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Size::Giant => "Giant",
            Size::Large => "Great",
            Size::Medium => "Medium",
            Size::Small => "Small",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    pub size: Size,
    pub color: String,
    pub shape: String,
    pub texture: String,
    pub special_features: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub health: f64,
    pub strength: f64,
    pub speed: f64,
    pub resistance: f64,
    pub growth_rate: f64,
    pub water_efficiency: f64,
    pub solar_efficiency: f64,
}

pub const BASE_STATS: Stats = Stats {
    health: 100.0,
    strength: 50.0,
    speed: 50.0,
    resistance: 50.0,
    growth_rate: 50.0,
    water_efficiency: 50.0,
    solar_efficiency: 50.0,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: String,
}

impl Ability {
    fn passive(id: &str, name: &str, description: &str, effect: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind: "passive".to_string(),
            effect: effect.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub model: String,
    pub texture: String,
    pub animations: Vec<String>,
    pub effects: Vec<String>,
    pub size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperVegetable {
    pub id: String,
    pub player_id: String,
    pub name: String,
    pub base_type: BaseType,
    pub characteristics: Characteristics,
    pub stats: Stats,
    pub abilities: Vec<Ability>,
    pub appearance: Appearance,
    pub created_at: DateTime<Utc>,
}

fn bonus(score: f64) -> f64 {
    (score / 10.0).min(BONUS_CAP)
}

fn raise(base: f64, amount: f64) -> f64 {
    (base + amount).min(STAT_MAX)
}

pub fn characteristics(scores: &Scores, location: LocationType) -> Characteristics {
    let palette = location.palette();
    let color = if scores.total >= 90.0 {
        palette[2]
    } else if scores.total >= 75.0 {
        palette[1]
    } else {
        palette[0]
    };

    let shape = if scores.yield_score >= 90.0 {
        "perfect-sphere"
    } else if scores.efficiency >= 85.0 {
        "streamlined"
    } else if scores.water >= 80.0 {
        "water-drop"
    } else {
        "standard"
    };

    let texture = if scores.environment >= 90.0 {
        "smooth-organic"
    } else if scores.total >= 80.0 {
        "glossy"
    } else {
        "standard"
    };

    let mut special_features: Vec<String> = [
        (scores.water >= 90.0, "water-crystals"),
        (scores.efficiency >= 90.0, "solar-panels"),
        (scores.yield_score >= 95.0, "growth-rings"),
        (scores.environment >= 95.0, "eco-aura"),
    ]
    .into_iter()
    .filter_map(|(earned, feature)| earned.then(|| feature.to_string()))
    .collect();
    special_features.push(location.feature().to_string());

    Characteristics {
        size: Size::for_total(scores.total),
        color: color.to_string(),
        shape: shape.to_string(),
        texture: texture.to_string(),
        special_features,
    }
}

pub fn stats(scores: &Scores, location: LocationType) -> Stats {
    let yield_bonus = bonus(scores.yield_score);
    let water_bonus = bonus(scores.water);
    let environment_bonus = bonus(scores.environment);
    let efficiency_bonus = bonus(scores.efficiency);
    let multipliers = location.multipliers();

    Stats {
        health: raise(BASE_STATS.health, yield_bonus),
        strength: raise(BASE_STATS.strength, yield_bonus),
        speed: raise(BASE_STATS.speed, efficiency_bonus),
        resistance: raise(BASE_STATS.resistance, environment_bonus),
        growth_rate: raise(BASE_STATS.growth_rate, yield_bonus * multipliers.growth),
        water_efficiency: raise(BASE_STATS.water_efficiency, water_bonus * multipliers.water),
        solar_efficiency: raise(BASE_STATS.solar_efficiency, efficiency_bonus * multipliers.solar),
    }
}

/// Score abilities first, in water, solar, yield, environment order, then the
/// location's own ability.
pub fn abilities(scores: &Scores, location: LocationType) -> Vec<Ability> {
    let mut abilities = Vec::new();
    if scores.water > 80.0 {
        abilities.push(Ability::passive(
            "water-master",
            "Water Master",
            "Uses 30% less water in all actions",
            "water_efficiency_boost",
        ));
    }
    if scores.efficiency > 80.0 {
        abilities.push(Ability::passive(
            "solar-charger",
            "Solar Charger",
            "Generates additional solar energy every day",
            "solar_generation_boost",
        ));
    }
    if scores.yield_score > 90.0 {
        abilities.push(Ability::passive(
            "high-yield",
            "High Yield",
            "Increases yield by 25%",
            "yield_boost",
        ));
    }
    if scores.environment > 85.0 {
        abilities.push(Ability::passive(
            "eco-friendly",
            "Eco-Friendly",
            "Reduces environmental impact of all actions",
            "environmental_boost",
        ));
    }
    abilities.push(location.ability());
    abilities
}

fn has_feature(characteristics: &Characteristics, feature: &str) -> bool {
    characteristics.special_features.iter().any(|f| f == feature)
}

fn appearance(characteristics: &Characteristics, stats: &Stats) -> Appearance {
    let mut animations = vec!["idle".to_string(), "grow".to_string()];
    let animation_rules = [
        (stats.speed >= 70.0, "quick-move"),
        (stats.health >= 80.0, "healthy-glow"),
        (has_feature(characteristics, "water-crystals"), "water-shimmer"),
        (has_feature(characteristics, "solar-panels"), "solar-charge"),
    ];
    animations.extend(
        animation_rules
            .into_iter()
            .filter_map(|(on, name)| on.then(|| name.to_string())),
    );

    let effect_rules = [
        (stats.water_efficiency >= 80.0, "water-trail"),
        (stats.solar_efficiency >= 80.0, "solar-aura"),
        (stats.resistance >= 85.0, "protective-shield"),
        (has_feature(characteristics, "eco-aura"), "eco-glow"),
    ];
    let effects = effect_rules
        .into_iter()
        .filter_map(|(on, name)| on.then(|| name.to_string()))
        .collect();

    Appearance {
        model: format!("{}-model", characteristics.shape),
        texture: format!("{}-{}", characteristics.color, characteristics.texture),
        animations,
        effects,
        size: characteristics.size.scale(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_name(base_type: BaseType, characteristics: &Characteristics) -> String {
    format!(
        "{} {} {}",
        characteristics.size.prefix(),
        capitalize(&characteristics.color),
        capitalize(&base_type.to_string())
    )
}

pub fn create_super_vegetable(
    player_id: &str,
    base_type: BaseType,
    scores: &Scores,
    location: LocationType,
    created_at: DateTime<Utc>,
) -> SuperVegetable {
    let characteristics = characteristics(scores, location);
    let stats = stats(scores, location);
    SuperVegetable {
        id: format!("super-{base_type}-{}", created_at.timestamp_millis()),
        player_id: player_id.to_string(),
        name: display_name(base_type, &characteristics),
        base_type,
        appearance: appearance(&characteristics, &stats),
        abilities: abilities(scores, location),
        characteristics,
        stats,
        created_at,
    }
}

/// Carrot grown from the state's final scores.
pub fn from_game_state(
    state: &GameState,
    player_id: &str,
    location: LocationType,
    created_at: DateTime<Utc>,
) -> SuperVegetable {
    create_super_vegetable(player_id, BaseType::Carrot, &state.scores, location, created_at)
}

/// Regrow from newer scores, keeping the special features already earned.
pub fn evolve(
    vegetable: &SuperVegetable,
    scores: &Scores,
    location: LocationType,
    created_at: DateTime<Utc>,
) -> SuperVegetable {
    let mut evolved = create_super_vegetable(
        &vegetable.player_id,
        vegetable.base_type,
        scores,
        location,
        created_at,
    );
    let mut features = vegetable.characteristics.special_features.clone();
    features.append(&mut evolved.characteristics.special_features);
    evolved.characteristics.special_features = features;
    evolved
}

pub fn battle_power(vegetable: &SuperVegetable) -> f64 {
    let stats = &vegetable.stats;
    stats.health * 0.3
        + stats.strength * 0.25
        + stats.speed * 0.2
        + stats.resistance * 0.15
        + stats.growth_rate * 0.1
}

pub fn battle_advantages(vegetable: &SuperVegetable) -> Vec<&'static str> {
    let stats = &vegetable.stats;
    [
        (stats.water_efficiency >= 80.0, "water-advantage"),
        (stats.solar_efficiency >= 80.0, "solar-advantage"),
        (stats.resistance >= 85.0, "defense-advantage"),
        (stats.speed >= 80.0, "speed-advantage"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect()
}
