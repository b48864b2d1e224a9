use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::queries::BookingFilter;
use crate::errors::AppError;
use crate::handlers::auth::authorize;
use crate::models::{Booking, BookingEdit, BookingStatus, Capability, NewBooking};
use crate::services::booking::{self, MoveRequest, StatusChange};
use crate::services::conflict::{Candidate, ConflictDetail};
use crate::state::AppState;

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<NaiveDate>,
    pub therapist_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;

    let status = match query.status.as_deref() {
        Some(s) => Some(
            BookingStatus::parse(s)
                .ok_or_else(|| AppError::validation(format!("unknown status: {s}")))?,
        ),
        None => None,
    };
    let filter = BookingFilter {
        date: query.date,
        therapist_id: query.therapist_id,
        status,
        limit: query.limit,
    };

    Ok(Json(booking::list(&state, &filter)?))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    authorize(&headers, &state.config, Capability::ManageBookings)?;
    let created = booking::create(&state, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/bookings/check
#[derive(Deserialize)]
pub struct ConflictCheckRequest {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub exclude_id: Option<String>,
}

#[derive(Serialize)]
pub struct ConflictCheckResponse {
    conflict: bool,
    booking: Option<ConflictDetail>,
}

pub async fn check_conflict(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ConflictCheckRequest>,
) -> Result<Json<ConflictCheckResponse>, AppError> {
    authorize(&headers, &state.config, Capability::ManageBookings)?;
    let found = booking::check_conflict(&state, &body.candidate, body.exclude_id.as_deref())?;
    Ok(Json(ConflictCheckResponse {
        conflict: found.is_some(),
        booking: found,
    }))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;
    Ok(Json(booking::get(&state, &id)?))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<BookingEdit>,
) -> Result<Json<Booking>, AppError> {
    authorize(&headers, &state.config, Capability::ManageBookings)?;
    Ok(Json(booking::update(&state, &id, body).await?))
}

// POST /api/bookings/:id/status
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<Booking>, AppError> {
    authorize(&headers, &state.config, Capability::UpdateStatus)?;
    Ok(Json(booking::change_status(&state, &id, body).await?))
}

// POST /api/bookings/:id/move
pub async fn move_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<MoveRequest>,
) -> Result<Json<Booking>, AppError> {
    authorize(&headers, &state.config, Capability::UpdateStatus)?;
    Ok(Json(booking::move_booking(&state, &id, body).await?))
}
