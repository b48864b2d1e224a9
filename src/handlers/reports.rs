use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::authorize;
use crate::models::Capability;
use crate::services::reports::{earnings_report, EarningsReport};
use crate::state::AppState;

// GET /api/reports/earnings
#[derive(Deserialize)]
pub struct EarningsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn earnings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<EarningsQuery>,
) -> Result<Json<EarningsReport>, AppError> {
    authorize(&headers, &state.config, Capability::ViewReports)?;

    let today = Local::now().date_naive();
    let to = query.to.unwrap_or(today);
    let from = query.from.unwrap_or(to);
    if from > to {
        return Err(AppError::validation("`from` must not be after `to`"));
    }

    let bookings = queries::get_done_bookings_between(&state.db(), &from, &to)?;
    let services = state.services()?;
    let therapists = state.therapists()?;
    let rate = state.shop_config()?.commission_rate;

    Ok(Json(earnings_report(
        from,
        to,
        &bookings,
        &services,
        &therapists,
        rate,
    )))
}
