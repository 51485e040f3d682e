use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::Staff;
use crate::errors::AppError;
use crate::models::{Booking, BookingFilter, BookingRequest, BookingStatus};
use crate::state::AppState;

fn parse_status(s: &str) -> Result<BookingStatus, AppError> {
    BookingStatus::parse(s).ok_or_else(|| AppError::Validation(format!("unknown status: {s}")))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.coordinator.submit_booking(body)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub is_read: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _staff: Staff,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let filter = BookingFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        is_read: query.is_read,
        limit: query.limit,
        offset: query.offset,
    };

    Ok(Json(state.store.list(&filter)?))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _staff: Staff,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.coordinator.view_booking(&id)?))
}

// PUT /api/bookings/:id/status
#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    staff: Staff,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<Booking>, AppError> {
    let status = parse_status(&body.status)?;
    let booking = state
        .coordinator
        .update_status(&id, status, body.admin_notes, &staff.actor_id)?;
    Ok(Json(booking))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    staff: Staff,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.delete(&id)?;
    tracing::info!(booking_id = %id, actor = %staff.actor_id, "booking deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}

// PUT /api/bookings/mark-read
#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub ids: Vec<String>,
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    _staff: Staff,
    Json(body): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = state.store.mark_read(&body.ids)?;
    Ok(Json(serde_json::json!({ "ok": true, "updated": updated })))
}

// GET /api/bookings/stats
#[derive(Serialize)]
pub struct StatsResponse {
    total: i64,
    unread: i64,
    by_status: BTreeMap<BookingStatus, i64>,
}

pub async fn booking_stats(
    State(state): State<Arc<AppState>>,
    _staff: Staff,
) -> Result<Json<StatsResponse>, AppError> {
    let by_status = state.store.count_by_status()?;
    let unread = state.store.count_unread()?;

    Ok(Json(StatsResponse {
        total: by_status.values().sum(),
        unread,
        by_status,
    }))
}

// GET /api/bookings/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    _staff: Staff,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = state.store.count_unread()?;
    Ok(Json(serde_json::json!({ "count": count })))
}
