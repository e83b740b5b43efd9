//! HTTP handlers for submitting grids and reading back results

use crate::store::{RecordStore, StoreError};
use crate::submission::{normalize, render_grid, render_moves, GridValidator};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use core_sp::grid::{CoreError, GridSearch};
use core_sp::messages::{
    ErrorMessage, LookupQuery, Record, RecordListing, SubmissionResult, SubmitGrid,
};
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything a handler needs, passed in through [`State`]
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub validator: Arc<GridValidator>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Incorrect user input. Please provide input like omo-xxo-xpo")]
    InvalidInput,

    #[error("Invalid grid: {0}")]
    Search(#[from] CoreError),

    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("No submission with id {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput | ApiError::Search(_) | ApiError::Body(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        let body = ErrorMessage {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(submit_grid).get(lookup_submission))
        .route("/admin", get(list_submissions))
        .with_state(state)
}

/// Find the shortest path through a submitted grid and store the result
async fn submit_grid(
    State(state): State<AppState>,
    payload: Result<Json<SubmitGrid>, JsonRejection>,
) -> Result<Json<SubmissionResult>, ApiError> {
    let Json(request) = payload?;
    if !state.validator.validate(&request.data, request.size) {
        return Err(ApiError::InvalidInput);
    }

    let rows = normalize(&request.data);
    let moves = GridSearch::new(&rows, request.size)?.moves()?;

    let record = Record {
        id: Uuid::new_v4().simple().to_string(),
        grid: render_grid(&rows),
        time: chrono::Local::now().format(TIME_FORMAT).to_string(),
        result: render_moves(&moves),
    };

    let store = state.store.clone();
    let stored = record.clone();
    tokio::task::spawn_blocking(move || store.insert(stored)).await??;

    info!("Stored submission {} with {} moves", record.id, moves.len());
    Ok(Json(record.into()))
}

async fn lookup_submission(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<SubmissionResult>, ApiError> {
    match state.store.get(&query.id)? {
        Some(record) => Ok(Json(record.into())),
        None => Err(ApiError::NotFound(query.id)),
    }
}

/// Every stored submission, keyed by position
async fn list_submissions(State(state): State<AppState>) -> Result<Json<RecordListing>, ApiError> {
    Ok(Json(RecordListing(state.store.all()?)))
}
