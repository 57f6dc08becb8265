//! HTTP handlers for the coordinator endpoint
//!
//! Marshals inbound requests into store/gate calls and store snapshots into
//! outbound responses. Request bodies are parsed leniently: an empty body is
//! treated as an all-defaults request and missing fields take their zero
//! values, matching what the sensor reporters actually send. A body that is
//! present but malformed fails the request with 400 and leaves the store
//! untouched.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::mode::ControlMode;
use super::server::AppState;
use super::store::StateSnapshot;

// ============================================================================
// Request Types
// ============================================================================

/// Light sensor ingestion
#[derive(Debug, Default, Deserialize)]
pub struct LightUpdate {
    #[serde(default)]
    pub level: u64,
}

/// Distance sensor ingestion
#[derive(Debug, Default, Deserialize)]
pub struct DistanceUpdate {
    #[serde(default)]
    pub distance: i64,
}

/// Temperature/humidity sensor ingestion
#[derive(Debug, Default, Deserialize)]
pub struct DhtUpdate {
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub humidity: f64,
}

/// LED control command
#[derive(Debug, Default, Deserialize)]
pub struct LedCommand {
    #[serde(default)]
    pub status: bool,
}

/// Fan control command
#[derive(Debug, Default, Deserialize)]
pub struct FanCommand {
    #[serde(default)]
    pub speed: i64,
}

// ============================================================================
// Response Types
// ============================================================================

const STATUS_SUCCESS: &str = "success";
const STATUS_REJECTED: &str = "rejected";
const STATUS_ERROR: &str = "error";

#[derive(Debug, Serialize)]
pub struct LightResponse {
    pub status: &'static str,
    pub light_level: u64,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub status: &'static str,
    pub distance: i64,
}

#[derive(Debug, Serialize)]
pub struct DhtResponse {
    pub status: &'static str,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Serialize)]
pub struct LedResponse {
    pub status: &'static str,
    pub led_status: bool,
}

/// Fan command outcome
///
/// `fan_speed` always reflects the value actually stored, not merely the
/// request; when the write is rejected in AUTOMATIC mode `status` says so
/// instead of masking the rejection as a success.
#[derive(Debug, Serialize)]
pub struct FanResponse {
    pub status: &'static str,
    pub fan_speed: i64,
    pub mode: ControlMode,
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub status: &'static str,
    pub mode: ControlMode,
}

#[derive(Debug, Serialize)]
pub struct ModeStatus {
    pub mode: ControlMode,
}

/// Full-state wire snapshot served to pollers
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub light_level: u64,
    pub distance: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub led_status: bool,
    pub fan_speed: i64,
    pub buzzer_status: bool,
}

impl From<&StateSnapshot> for StatusResponse {
    fn from(snapshot: &StateSnapshot) -> Self {
        Self {
            light_level: snapshot.light_level,
            distance: snapshot.distance,
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            led_status: snapshot.led_on,
            fan_speed: snapshot.fan_speed,
            buzzer_status: snapshot.alarm_active,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_secs: u64,
    pub last_update: chrono::DateTime<chrono::Utc>,
}

/// Client-error response for malformed bodies
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            error: message.into(),
        }
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Read endpoints
        .route("/status", get(read_status))
        .route("/mode", get(read_mode))
        .route("/health", get(health_check))
        // Sensor ingestion
        .route("/update_light", post(update_light))
        .route("/update_distance", post(update_distance))
        .route("/update_dht", post(update_dht))
        // Actuator control
        .route("/control_led", post(control_led))
        .route("/control_fan", post(control_fan))
        .route("/control_mode", post(control_mode))
        .with_state(state)
}

/// Parse a JSON request body, defaulting missing fields.
///
/// An empty body maps to the type's all-defaults value. Anything else must be
/// valid JSON of the expected shape or the request fails with 400.
fn parse_body<T: DeserializeOwned + Default>(bytes: &Bytes) -> Result<T, Response> {
    if bytes.is_empty() {
        return Ok(T::default());
    }

    serde_json::from_slice(bytes).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("invalid request body: {e}"))),
        )
            .into_response()
    })
}

// ============================================================================
// Read Handlers
// ============================================================================

/// Serve the full state snapshot to any poller, unfiltered
async fn read_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.get_snapshot().await;
    Json(StatusResponse::from(&snapshot))
}

/// Current control mode
async fn read_mode(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModeStatus {
        mode: state.gate.current(),
    })
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.get_snapshot().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        last_update: snapshot.updated_at,
    })
}

// ============================================================================
// Ingestion Handlers
// ============================================================================

/// Ingest a light sensor reading
async fn update_light(State(state): State<AppState>, body: Bytes) -> Response {
    let update: LightUpdate = match parse_body(&body) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    state.store.set_light(update.level).await;
    tracing::debug!(level = update.level, "light reading ingested");

    Json(LightResponse {
        status: STATUS_SUCCESS,
        light_level: update.level,
    })
    .into_response()
}

/// Ingest a distance reading and recompute the proximity alarm
async fn update_distance(State(state): State<AppState>, body: Bytes) -> Response {
    let update: DistanceUpdate = match parse_body(&body) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let alarm = state.store.set_distance(update.distance).await;
    tracing::debug!(
        distance = update.distance,
        alarm,
        "distance reading ingested"
    );

    Json(DistanceResponse {
        status: STATUS_SUCCESS,
        distance: update.distance,
    })
    .into_response()
}

/// Ingest a combined temperature/humidity reading
async fn update_dht(State(state): State<AppState>, body: Bytes) -> Response {
    let update: DhtUpdate = match parse_body(&body) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    state.store.set_dht(update.temperature, update.humidity).await;
    tracing::debug!(
        temperature = update.temperature,
        humidity = update.humidity,
        "dht reading ingested"
    );

    Json(DhtResponse {
        status: STATUS_SUCCESS,
        temperature: update.temperature,
        humidity: update.humidity,
    })
    .into_response()
}

// ============================================================================
// Control Handlers
// ============================================================================

/// Apply an LED command, unconditionally (LED is not mode-gated)
async fn control_led(State(state): State<AppState>, body: Bytes) -> Response {
    let command: LedCommand = match parse_body(&body) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    state.store.set_led(command.status).await;
    tracing::info!(on = command.status, "led switched");

    Json(LedResponse {
        status: STATUS_SUCCESS,
        led_status: command.status,
    })
    .into_response()
}

/// Apply a fan command, subject to the mode gate
async fn control_fan(State(state): State<AppState>, body: Bytes) -> Response {
    let command: FanCommand = match parse_body(&body) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    // The gate decision is sampled once and passed in; the store applies the
    // write atomically under its own lock.
    let mode = state.gate.current();
    let applied = state.store.try_set_fan(command.speed, mode).await;

    if applied {
        tracing::info!(speed = command.speed, "fan speed set");
        Json(FanResponse {
            status: STATUS_SUCCESS,
            fan_speed: command.speed,
            mode,
        })
        .into_response()
    } else {
        let stored = state.store.get_snapshot().await.fan_speed;
        tracing::info!(
            requested = command.speed,
            stored,
            "fan write rejected in automatic mode"
        );
        Json(FanResponse {
            status: STATUS_REJECTED,
            fan_speed: stored,
            mode,
        })
        .into_response()
    }
}

/// Toggle the process-wide control mode
async fn control_mode(State(state): State<AppState>) -> impl IntoResponse {
    let mode = state.gate.toggle();
    tracing::info!(%mode, "control mode toggled");

    Json(ModeResponse {
        status: STATUS_SUCCESS,
        mode,
    })
}

// ============================================================================
// Tests
// ============================================================================
