use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_stream::StreamExt;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::{authorize, role_for_token};
use crate::models::Capability;
use crate::services::reports::{build_board, QueueBoard};
use crate::state::AppState;

// GET /api/queue
#[derive(Deserialize)]
pub struct BoardQuery {
    pub date: Option<NaiveDate>,
}

pub async fn get_board(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BoardQuery>,
) -> Result<Json<QueueBoard>, AppError> {
    authorize(&headers, &state.config, Capability::ViewQueue)?;

    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let bookings = queries::get_bookings_for_day(&state.db(), &date)?;

    Ok(Json(build_board(date, bookings, state.config.poll_interval_secs)))
}

// GET /api/queue/events (SSE)
#[derive(Deserialize)]
pub struct EventsQuery {
    pub token: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // EventSource can't set headers, so the token rides in the query string.
    let token = query.token.as_deref().unwrap_or("");
    let role = role_for_token(token, &state.config).ok_or(AppError::Unauthorized)?;
    if !role.can(Capability::ViewQueue) {
        return Err(AppError::Forbidden);
    }

    let live_stream = BroadcastStream::new(state.queue_tx.subscribe()).filter_map(|result| {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event).unwrap_or_default();
                Some(Ok(Event::default().data(data).event(event.kind.as_str())))
            }
            // Missed events are covered by the next refresh tick.
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                tracing::debug!(skipped = n, "queue event subscriber lagged");
                None
            }
        }
    });

    let period = Duration::from_secs(state.config.poll_interval_secs.max(1));
    let refresh_stream = IntervalStream::new(tokio::time::interval(period))
        .map(|_| Ok(Event::default().event("refresh").data("{}")));

    Ok(Sse::new(live_stream.merge(refresh_stream)).keep_alive(KeepAlive::default()))
}
