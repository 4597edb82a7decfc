// HTTP request handlers
use crate::domain::error::MonitorError;
use crate::domain::machine::{BadgeColor, Machine, MachineListing, MachineStatus};
use crate::domain::prediction::{FieldError, PredictionForm};
use crate::domain::telemetry::{Channel, ChannelInfo, Sample, Snapshot};
use crate::infrastructure::chunked_json::stream_from_watch;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const LIST_PATH: &str = "/machines";
pub const NO_MACHINES_MESSAGE: &str = "No machines found";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: MachineStatus,
    pub badge_color: BadgeColor,
}

impl From<Machine> for MachineView {
    fn from(machine: Machine) -> Self {
        let badge_color = machine.status.badge_color();
        Self {
            id: machine.id,
            name: machine.name,
            location: machine.location,
            status: machine.status,
            badge_color,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ListState {
    Loaded,
    Empty,
    Error,
}

#[derive(Debug, Serialize)]
pub struct MachineListView {
    pub state: ListState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub machines: Vec<MachineView>,
}

impl From<MachineListing> for MachineListView {
    fn from(listing: MachineListing) -> Self {
        match listing {
            MachineListing::Loaded(machines) => Self {
                state: ListState::Loaded,
                message: None,
                machines: machines.into_iter().map(MachineView::from).collect(),
            },
            MachineListing::Empty => Self {
                state: ListState::Empty,
                message: Some(NO_MACHINES_MESSAGE.to_string()),
                machines: Vec::new(),
            },
            MachineListing::Unavailable(_) => Self {
                state: ListState::Error,
                message: Some("Machines could not be loaded".to_string()),
                machines: Vec::new(),
            },
        }
    }
}

/// Snapshot plus the current value of every channel (`null` until sampled)
#[derive(Debug, Serialize)]
pub struct MonitorView<'a> {
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
    pub latest: BTreeMap<Channel, Option<&'a Sample>>,
}

impl<'a> From<&'a Snapshot> for MonitorView<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            latest: snapshot.latest_values(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationView<'a> {
    errors: &'a [FieldError],
}

#[derive(Debug, Serialize)]
struct MessageView<'a> {
    message: &'a str,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response {
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all machines; failures render as an error state, not a server error
pub async fn list_machines(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let listing = state.machine_service.list_machines().await;
    let view = MachineListView::from(listing);
    respond(StatusCode::OK, &view, accepts_brotli(&headers)).await
}

/// Machine detail; unknown ids send the client back to the list
pub async fn get_machine(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.machine_service.get_machine(&id).await {
        Ok(machine) => respond(StatusCode::OK, &MachineView::from(machine), accepts_brotli(&headers)).await,
        Err(e) => {
            tracing::info!("Redirecting to machine list: {}", e);
            Redirect::to(LIST_PATH).into_response()
        }
    }
}

/// Display metadata for every metric channel
pub async fn list_channels(headers: HeaderMap) -> Response {
    let channels: Vec<ChannelInfo> = Channel::ALL.iter().map(Channel::info).collect();
    respond(StatusCode::OK, &channels, accepts_brotli(&headers)).await
}

/// Select a machine and start collecting its metrics
pub async fn start_monitoring(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let machine = match state.machine_service.get_machine(&id).await {
        Ok(machine) => machine,
        Err(e) => {
            tracing::info!("Redirecting to machine list: {}", e);
            return Redirect::to(LIST_PATH).into_response();
        }
    };

    match state.monitor_session.select(&machine.id).await {
        Ok(snapshot) => {
            respond(StatusCode::OK, &MonitorView::from(&*snapshot), accepts_brotli(&headers)).await
        }
        Err(e) => {
            tracing::error!("Failed to start collector for {}: {}", machine.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Stop the running collector, if any
pub async fn stop_monitoring(State(state): State<Arc<AppState>>) -> StatusCode {
    let phase = state.monitor_session.phase().await;
    if !state.monitor_session.deselect().await {
        tracing::debug!(?phase, "Stop requested while idle");
    }
    StatusCode::NO_CONTENT
}

/// Latest snapshot of the running collector
pub async fn current_snapshot(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.monitor_session.snapshot().await {
        Some(snapshot) => {
            respond(StatusCode::OK, &MonitorView::from(&*snapshot), accepts_brotli(&headers)).await
        }
        None => {
            let view = MessageView {
                message: "No machine selected",
            };
            respond(StatusCode::NOT_FOUND, &view, false).await
        }
    }
}

/// Stream snapshots of the running collector, one frame per tick
pub async fn stream_snapshots(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.monitor_session.subscribe().await {
        Some(rx) => stream_from_watch(rx, accepts_brotli(&headers)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Validate the form and return the predictor's answer (or a fallback)
pub async fn predict(State(state): State<Arc<AppState>>, Json(form): Json<PredictionForm>) -> Response {
    match state.prediction_service.submit(&form).await {
        Ok(result) => {
            tracing::debug!(fallback = result.is_fallback(), "Serving prediction");
            respond(StatusCode::OK, result.outcome(), false).await
        }
        Err(MonitorError::Validation(errors)) => {
            respond(StatusCode::UNPROCESSABLE_ENTITY, &ValidationView { errors: &errors }, false).await
        }
        Err(e) => {
            tracing::error!("Prediction failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
