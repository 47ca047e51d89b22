use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use farm_core::achievements::{AchievementType, Tier};
use farm_core::action::Action;
use farm_core::enhanced::{calculate_enhanced_score, EnhancedScores, UsageMetrics};
use farm_core::environment::EnvironmentInput;
use farm_core::io::seed::Seed;
use farm_core::settings::{GameSettings, SettingsError, SettingsManager, SettingsStorage};
use farm_core::store::{LeaderboardRow, MemoryStore, NewRun, Room, RunStore, StoreError};
use farm_core::{calculate_achievements, simulate, RUN_DAYS, STARTING_RESOURCES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{error, info};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const ANON_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub type SharedSettings = SettingsManager<Box<dyn SettingsStorage + Send>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<MemoryStore>>,
    pub settings: Arc<Mutex<SharedSettings>>,
}

impl AppState {
    pub fn new(store: MemoryStore, settings: SharedSettings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            settings: Arc::new(Mutex::new(settings)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(create_run))
        .route("/leaderboard", get(leaderboard))
        .route("/seeds/:code", get(seed_by_code))
        .route("/rooms", post(create_room))
        .route("/rooms/join", post(join_room))
        .route("/settings", get(get_settings).put(put_settings))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::SeedNotFound(_)
            | StoreError::RoomNotFound(_)
            | StoreError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::DuplicateRoom(_) => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        let status = match err {
            SettingsError::Malformed(_) | SettingsError::Invalid(_) => StatusCode::BAD_REQUEST,
            SettingsError::Io { .. } => {
                error!(error = %err, "settings storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunRequest {
    pub seed_code: String,
    pub level: u32,
    pub actions_log: Vec<Action>,
    #[serde(default)]
    pub duration_s: u64,
    #[serde(default)]
    pub usage: Option<UsageMetrics>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScoreSummary {
    pub total: f64,
    #[serde(rename = "yield")]
    pub yield_score: f64,
    pub water: f64,
    pub environment: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Awarded {
    #[serde(rename = "type")]
    pub kind: AchievementType,
    pub tier: Tier,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankSnapshot {
    pub rank: usize,
    pub total_players: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunResponse {
    pub player_id: String,
    pub scores: ScoreSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded: Option<Awarded>,
    pub rank_snapshot: RankSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<EnhancedScores>,
}

/// `anon_<millis>_<9 base-36 chars>` and `Player-<0..999>`.
fn anonymous_identity(now: DateTime<Utc>) -> (String, String) {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| {
            let index = rng.gen_range(0..ANON_SUFFIX_ALPHABET.len());
            char::from(ANON_SUFFIX_ALPHABET[index])
        })
        .collect();
    let anon_id = format!("anon_{}_{suffix}", now.timestamp_millis());
    let alias = format!("Player-{}", rng.gen_range(0..1000));
    (anon_id, alias)
}

pub async fn create_run(
    State(state): State<AppState>,
    Json(request): Json<CreateRunRequest>,
) -> Result<Json<CreateRunResponse>, ApiError> {
    if !(1..=5).contains(&request.level) {
        return Err(ApiError::bad_request(format!(
            "level must be between 1 and 5, got {}",
            request.level
        )));
    }

    let mut store = state.store.lock().await;
    let seed = store.seed_by_code(&request.seed_code)?;

    let now = Utc::now();
    let (anon_id, alias) = anonymous_identity(now);
    let player = store.create_player(&anon_id, &alias);

    let result = simulate(
        &request.actions_log,
        &seed,
        STARTING_RESOURCES,
        RUN_DAYS,
        &EnvironmentInput::Absent,
    );
    let previous = store.achievements_for_player(&player.id);
    let achievements =
        calculate_achievements(&result.final_state, &result.scores, &previous, now);

    let run = store.insert_run(NewRun {
        player_id: player.id.clone(),
        seed_id: seed.id.clone(),
        level: request.level,
        scores: result.scores,
        duration_s: request.duration_s,
        actions_log: request.actions_log,
    })?;
    store.insert_achievements(&player.id, &seed.id, &achievements)?;

    let rank = store.run_rank(&run.id).unwrap_or(0);
    let total_players = store.run_count(&seed.id).max(1);
    info!(
        seed = %seed.code,
        player = %player.alias,
        total = result.scores.total,
        rank,
        "run recorded"
    );

    Ok(Json(CreateRunResponse {
        player_id: player.id,
        scores: ScoreSummary {
            total: result.scores.total,
            yield_score: result.scores.yield_score,
            water: result.scores.water,
            environment: result.scores.environment,
        },
        awarded: achievements.first().map(|achievement| Awarded {
            kind: achievement.kind,
            tier: achievement.tier,
        }),
        rank_snapshot: RankSnapshot {
            rank,
            total_players,
        },
        enhanced: request
            .usage
            .map(|usage| calculate_enhanced_score(&result.scores, &usage)),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub seed: Option<String>,
    pub room: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub runs: Vec<LeaderboardRow>,
    pub seed: String,
    pub total_players: usize,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let code = query
        .seed
        .ok_or_else(|| ApiError::bad_request("Seed parameter required"))?;
    let store = state.store.lock().await;
    let seed = store.seed_by_code(&code)?;
    let runs = store.leaderboard(
        &seed.id,
        query.room.as_deref(),
        query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT),
    )?;
    Ok(Json(LeaderboardResponse {
        runs,
        total_players: store.run_count(&seed.id),
        seed: code,
    }))
}

pub async fn seed_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Seed>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.seed_by_code(&code)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub code: String,
    pub seed_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub code: String,
    pub player_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub code: String,
    pub seed_code: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub player_alias: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room: RoomSummary,
    pub members: Vec<MemberSummary>,
}

fn room_response(store: &MemoryStore, room: Room, seed_code: String) -> RoomResponse {
    let members = room
        .members
        .iter()
        .map(|member| MemberSummary {
            player_alias: store
                .player_alias(&member.player_id)
                .unwrap_or_else(|| "Anonymous".to_string()),
            joined_at: member.joined_at,
        })
        .collect();
    RoomResponse {
        room: RoomSummary {
            id: room.id,
            code: room.code,
            seed_code,
        },
        members,
    }
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    if request.code.trim().is_empty() {
        return Err(ApiError::bad_request("room code must not be empty"));
    }
    let mut store = state.store.lock().await;
    let room = store.create_room(&request.code, &request.seed_code)?;
    info!(room = %room.code, seed = %request.seed_code, "room created");
    Ok(Json(room_response(&store, room, request.seed_code)))
}

pub async fn join_room(
    State(state): State<AppState>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let mut store = state.store.lock().await;
    let room = store.join_room(&request.code, &request.player_id)?;
    // Rooms store the seed id; the response carries its code.
    let seed_code = store
        .seed_code_for(&room.seed_id)
        .unwrap_or_else(|| room.seed_id.clone());
    Ok(Json(room_response(&store, room, seed_code)))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<GameSettings> {
    let settings = state.settings.lock().await;
    Json(settings.settings().clone())
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<GameSettings>, ApiError> {
    let mut settings = state.settings.lock().await;
    let updated = settings.save(&patch)?.clone();
    Ok(Json(updated))
}
