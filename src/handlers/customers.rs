use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::authorize;
use crate::models::{Capability, Customer};
use crate::state::AppState;

// GET /api/customers: autocomplete for the booking form
#[derive(Deserialize)]
pub struct CustomerQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub async fn search_customers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    authorize(&headers, &state.config, Capability::ManageBookings)?;

    let q = query.q.unwrap_or_default();
    let limit = query.limit.unwrap_or(10).clamp(1, 50);
    Ok(Json(queries::search_customers(&state.db(), &q, limit)?))
}
