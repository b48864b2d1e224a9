use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::auth::authorize;
use crate::models::{
    Capability, Service, ServiceInput, ShopConfig, ShopConfigUpdate, Therapist, TherapistInput,
    TherapistStatus,
};
use crate::services::catalog;
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Service>>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;
    Ok(Json(state.services()?))
}

// POST /api/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    authorize(&headers, &state.config, Capability::ManageCatalog)?;
    Ok((StatusCode::CREATED, Json(catalog::create_service(&state, body)?)))
}

// PUT /api/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ServiceInput>,
) -> Result<Json<Service>, AppError> {
    authorize(&headers, &state.config, Capability::ManageCatalog)?;
    Ok(Json(catalog::update_service(&state, &id, body)?))
}

// GET /api/therapists
pub async fn list_therapists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Therapist>>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;
    Ok(Json(state.therapists()?))
}

// POST /api/therapists
pub async fn create_therapist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<TherapistInput>,
) -> Result<(StatusCode, Json<Therapist>), AppError> {
    authorize(&headers, &state.config, Capability::ManageTherapists)?;
    Ok((StatusCode::CREATED, Json(catalog::create_therapist(&state, body)?)))
}

// POST /api/therapists/:id/status
#[derive(Deserialize)]
pub struct TherapistStatusRequest {
    pub status: TherapistStatus,
}

pub async fn set_therapist_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TherapistStatusRequest>,
) -> Result<Json<Therapist>, AppError> {
    authorize(&headers, &state.config, Capability::ManageTherapists)?;
    Ok(Json(catalog::set_therapist_status(&state, &id, body.status)?))
}

// GET /api/config
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ShopConfig>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;
    Ok(Json(state.shop_config()?))
}

// PUT /api/config
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ShopConfigUpdate>,
) -> Result<Json<ShopConfig>, AppError> {
    authorize(&headers, &state.config, Capability::EditConfig)?;
    Ok(Json(catalog::update_config(&state, body)?))
}
