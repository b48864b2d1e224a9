use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Booking, BookingEdit, BookingStatus, Completion, NewBooking, Service, Therapist,
    TherapistStatus, ALLOWED_DURATIONS,
};
use crate::services::conflict::{find_conflict, Candidate, ConflictDetail};
use crate::services::notify::{QueueEvent, QueueEventKind};
use crate::services::queue::{self, Pricing, Transition};
use crate::state::AppState;

const LONGEST_SESSION_MINUTES: i64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: BookingStatus,
    pub completion: Option<Completion>,
}

/// A card dropped on the queue board: a column and, optionally, a therapist lane.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub status: BookingStatus,
    pub therapist_id: Option<String>,
    pub completion: Option<Completion>,
}

pub fn get(state: &AppState, id: &str) -> Result<Booking, AppError> {
    queries::get_booking_by_id(&state.db(), id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

pub fn list(state: &AppState, filter: &queries::BookingFilter) -> Result<Vec<Booking>, AppError> {
    Ok(queries::list_bookings(&state.db(), filter)?)
}

/// Advisory pre-check for the booking form. Nothing is reserved.
pub fn check_conflict(
    state: &AppState,
    candidate: &Candidate,
    exclude_id: Option<&str>,
) -> Result<Option<ConflictDetail>, AppError> {
    let nearby = bookings_near(&state.db(), candidate)?;
    Ok(find_conflict(candidate, &nearby, exclude_id).map(ConflictDetail::from))
}

pub async fn create(state: &AppState, input: NewBooking) -> Result<Booking, AppError> {
    let customer_name = required("customer name", &input.customer_name)?;
    let customer_phone = required("customer phone", &input.customer_phone)?;
    check_duration(input.duration_minutes)?;
    let service = lookup_service(state, &input.service_id)?;
    price_for(&service, input.duration_minutes)?;
    lookup_active_therapist(state, &input.therapist_id)?;

    let now = queries::now();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        customer_name,
        customer_phone,
        service_id: service.id,
        therapist_id: input.therapist_id,
        start_time: input.start_time,
        duration_minutes: input.duration_minutes,
        status: BookingStatus::Pending,
        final_price: None,
        discount: None,
        shop_revenue: None,
        therapist_commission: None,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db();
        ensure_slot_free(&db, &booking, None)?;
        queries::create_booking(&db, &booking)?;
        queries::upsert_customer(
            &db,
            &booking.customer_phone,
            &booking.customer_name,
            &booking.start_time,
        )?;
    }

    tracing::info!(
        booking_id = %booking.id,
        therapist_id = %booking.therapist_id,
        start = %booking.start_time,
        "booking created"
    );
    announce(
        state,
        QueueEvent::new(
            QueueEventKind::BookingCreated,
            &booking.id,
            format!(
                "New booking: {} at {}",
                booking.customer_name,
                booking.start_time.format("%H:%M")
            ),
        ),
    )
    .await;

    Ok(booking)
}

pub async fn update(state: &AppState, id: &str, edit: BookingEdit) -> Result<Booking, AppError> {
    let current = get(state, id)?;
    let mut updated = current.clone();

    if let Some(name) = &edit.customer_name {
        updated.customer_name = required("customer name", name)?;
    }
    if let Some(phone) = &edit.customer_phone {
        updated.customer_phone = required("customer phone", phone)?;
    }
    if let Some(service_id) = edit.service_id {
        updated.service_id = service_id;
    }
    if let Some(therapist_id) = edit.therapist_id {
        updated.therapist_id = therapist_id;
    }
    if let Some(start_time) = edit.start_time {
        updated.start_time = start_time;
    }
    if let Some(duration) = edit.duration_minutes {
        check_duration(duration)?;
        updated.duration_minutes = duration;
    }
    if let Some(notes) = edit.notes {
        updated.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }

    let service = lookup_service(state, &updated.service_id)?;
    let original_price = price_for(&service, updated.duration_minutes)?;
    if updated.therapist_id != current.therapist_id {
        lookup_active_therapist(state, &updated.therapist_id)?;
    }

    let repriced = edit.discount.is_some()
        || edit.final_price.is_some()
        || updated.service_id != current.service_id
        || updated.duration_minutes != current.duration_minutes;
    if updated.status == BookingStatus::Done {
        if repriced {
            // A manual final price only survives when the edit restates it.
            let completion = Completion {
                discount: edit.discount.or(current.discount),
                final_price: edit.final_price,
            };
            queue::validate_completion(&completion)?;
            let rate = state.shop_config()?.commission_rate;
            queue::stamp_earnings(
                &mut updated,
                &completion,
                Pricing {
                    original_price,
                    commission_rate: rate,
                },
            );
        }
    } else if edit.discount.is_some() || edit.final_price.is_some() {
        return Err(AppError::validation(
            "discount and final price can only be set on completed bookings",
        ));
    }

    updated.updated_at = queries::now();
    {
        let db = state.db();
        if updated.is_active() {
            ensure_slot_free(&db, &updated, Some(updated.id.as_str()))?;
        }
        if !queries::update_booking(&db, &updated)? {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
    }

    tracing::info!(booking_id = %updated.id, "booking updated");
    announce(
        state,
        QueueEvent::new(
            QueueEventKind::BookingUpdated,
            &updated.id,
            format!("Booking updated: {}", updated.customer_name),
        ),
    )
    .await;

    Ok(updated)
}

pub async fn change_status(
    state: &AppState,
    id: &str,
    change: StatusChange,
) -> Result<Booking, AppError> {
    let mut booking = get(state, id)?;
    let from = booking.status;

    let key = price_key(&booking);
    queue::apply(&mut booking, change.status, change.completion, || {
        pricing_for(state, &key)
    })?;
    if booking.status == from {
        return Ok(booking);
    }

    booking.updated_at = queries::now();
    save(state, &booking)?;

    tracing::info!(
        booking_id = %booking.id,
        from = from.as_str(),
        to = booking.status.as_str(),
        "booking status changed"
    );
    announce(
        state,
        QueueEvent::new(
            QueueEventKind::StatusChanged,
            &booking.id,
            format!("{}: {} → {}", booking.customer_name, from, booking.status),
        ),
    )
    .await;

    Ok(booking)
}

pub async fn move_booking(
    state: &AppState,
    id: &str,
    request: MoveRequest,
) -> Result<Booking, AppError> {
    let mut booking = get(state, id)?;
    let plan = queue::plan_move(&booking, request.status, request.therapist_id.as_deref())?;

    if plan.transition == Transition::Unchanged && plan.reassign_to.is_none() {
        return Ok(booking);
    }

    if let Some(therapist_id) = &plan.reassign_to {
        lookup_active_therapist(state, therapist_id)?;
        booking.therapist_id = therapist_id.clone();
    }

    let key = price_key(&booking);
    queue::apply(&mut booking, request.status, request.completion, || {
        pricing_for(state, &key)
    })?;
    booking.updated_at = queries::now();

    {
        let db = state.db();
        if plan.reassign_to.is_some() && booking.is_active() {
            ensure_slot_free(&db, &booking, Some(booking.id.as_str()))?;
        }
        if !queries::update_booking(&db, &booking)? {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
    }

    tracing::info!(
        booking_id = %booking.id,
        therapist_id = %booking.therapist_id,
        status = booking.status.as_str(),
        "booking moved"
    );
    announce(
        state,
        QueueEvent::new(
            QueueEventKind::BookingMoved,
            &booking.id,
            format!("{} moved to {}", booking.customer_name, booking.status),
        ),
    )
    .await;

    Ok(booking)
}

// ── helpers ──

/// Service and duration a booking is priced from.
struct PriceKey {
    service_id: String,
    duration_minutes: i32,
}

fn price_key(booking: &Booking) -> PriceKey {
    PriceKey {
        service_id: booking.service_id.clone(),
        duration_minutes: booking.duration_minutes,
    }
}

fn pricing_for(state: &AppState, key: &PriceKey) -> Result<Pricing, AppError> {
    let service = lookup_service(state, &key.service_id)?;
    Ok(Pricing {
        original_price: price_for(&service, key.duration_minutes)?,
        commission_rate: state.shop_config()?.commission_rate,
    })
}

fn save(state: &AppState, booking: &Booking) -> Result<(), AppError> {
    if !queries::update_booking(&state.db(), booking)? {
        return Err(AppError::NotFound(format!("booking {}", booking.id)));
    }
    Ok(())
}

/// Bookings that could overlap the candidate: anything starting up to one
/// longest session before it, through its end.
fn bookings_near(conn: &Connection, candidate: &Candidate) -> Result<Vec<Booking>, AppError> {
    let from: NaiveDateTime = candidate.start_time - Duration::minutes(LONGEST_SESSION_MINUTES);
    Ok(queries::get_bookings_in_range(conn, &from, &candidate.end_time())?)
}

fn ensure_slot_free(
    conn: &Connection,
    booking: &Booking,
    exclude_id: Option<&str>,
) -> Result<(), AppError> {
    let candidate = Candidate {
        therapist_id: booking.therapist_id.clone(),
        start_time: booking.start_time,
        duration_minutes: booking.duration_minutes,
    };
    let nearby = bookings_near(conn, &candidate)?;
    if let Some(existing) = find_conflict(&candidate, &nearby, exclude_id) {
        tracing::warn!(
            therapist_id = %candidate.therapist_id,
            start = %candidate.start_time,
            conflicting = %existing.id,
            "booking rejected: therapist busy"
        );
        return Err(AppError::Conflict(ConflictDetail::from(existing)));
    }
    Ok(())
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn check_duration(minutes: i32) -> Result<(), AppError> {
    if !ALLOWED_DURATIONS.contains(&minutes) {
        return Err(AppError::validation(format!(
            "duration must be one of {ALLOWED_DURATIONS:?} minutes, got {minutes}"
        )));
    }
    Ok(())
}

fn lookup_service(state: &AppState, id: &str) -> Result<Service, AppError> {
    state
        .find_service(id)?
        .ok_or_else(|| AppError::validation(format!("unknown service: {id}")))
}

fn price_for(service: &Service, duration: i32) -> Result<i64, AppError> {
    service.price_for(duration).ok_or_else(|| {
        AppError::validation(format!("{} has no price for {duration} minutes", service.name))
    })
}

fn lookup_active_therapist(state: &AppState, id: &str) -> Result<Therapist, AppError> {
    let therapist = state
        .find_therapist(id)?
        .ok_or_else(|| AppError::validation(format!("unknown therapist: {id}")))?;
    if therapist.status != TherapistStatus::Active {
        return Err(AppError::validation(format!(
            "{} is not taking bookings",
            therapist.name
        )));
    }
    Ok(therapist)
}

async fn announce(state: &AppState, event: QueueEvent) {
    if let Err(e) = state.notifier.notify(event).await {
        tracing::error!(error = %e, "failed to deliver queue notification");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::config::AppConfig;
    use crate::db;
    use crate::models::{Discount, Service};
    use crate::services::cache::{CachePolicy, CatalogCache};
    use crate::services::notify::Notifier;

    struct RecordingNotifier {
        events: Arc<Mutex<Vec<QueueEvent>>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, event: QueueEvent) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            port: 3000,
            database_url: ":memory:".to_string(),
            admin_token: "admin".to_string(),
            staff_token: "staff".to_string(),
            cache_ttl_secs: 0,
            poll_interval_secs: 15,
            default_commission_rate: 0.4,
        }
    }

    fn setup() -> (AppState, Arc<Mutex<Vec<QueueEvent>>>) {
        let conn = db::init_db(":memory:").unwrap();
        queries::save_service(
            &conn,
            &Service {
                id: "thai".to_string(),
                name: "Thai massage".to_string(),
                category: "massage".to_string(),
                prices: [(60, 300), (90, 450)].into_iter().collect(),
            },
        )
        .unwrap();
        for (id, name, status) in [
            ("T", "Nok", TherapistStatus::Active),
            ("U", "Ploy", TherapistStatus::Active),
            ("X", "Away", TherapistStatus::Inactive),
        ] {
            queries::create_therapist(
                &conn,
                &Therapist {
                    id: id.to_string(),
                    name: name.to_string(),
                    status,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                },
            )
            .unwrap();
        }

        let events = Arc::new(Mutex::new(vec![]));
        let (queue_tx, _) = tokio::sync::broadcast::channel(16);
        let state = AppState {
            db: Arc::new(Mutex::new(conn)),
            config: test_config(),
            catalog: CatalogCache::new(CachePolicy::disabled()),
            notifier: Box::new(RecordingNotifier {
                events: Arc::clone(&events),
            }),
            queue_tx,
        };
        (state, events)
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn new_booking(therapist: &str, start: &str, minutes: i32) -> NewBooking {
        NewBooking {
            customer_name: "Alice".to_string(),
            customer_phone: "0812345678".to_string(),
            service_id: "thai".to_string(),
            therapist_id: therapist.to_string(),
            start_time: dt(start),
            duration_minutes: minutes,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_overlap_is_rejected() {
        let (state, events) = setup();
        let existing = create(&state, new_booking("T", "2025-06-16 10:30", 60))
            .await
            .unwrap();
        assert_eq!(existing.status, BookingStatus::Pending);

        let err = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap_err();
        match err {
            AppError::Conflict(detail) => {
                assert_eq!(detail.booking_id, existing.id);
                assert_eq!(detail.start_time, "10:30");
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        // touching the end of the existing booking is fine
        create(&state, new_booking("T", "2025-06-16 11:30", 60))
            .await
            .unwrap();
        // another therapist at the same time is fine
        create(&state, new_booking("U", "2025-06-16 10:00", 60))
            .await
            .unwrap();

        assert_eq!(events.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (state, _) = setup();

        let mut blank = new_booking("T", "2025-06-16 10:00", 60);
        blank.customer_name = "  ".to_string();
        assert!(matches!(create(&state, blank).await, Err(AppError::Validation(_))));

        let odd = new_booking("T", "2025-06-16 10:00", 45);
        assert!(matches!(create(&state, odd).await, Err(AppError::Validation(_))));

        let unpriced = new_booking("T", "2025-06-16 10:00", 30);
        assert!(matches!(create(&state, unpriced).await, Err(AppError::Validation(_))));

        let inactive = new_booking("X", "2025-06-16 10:00", 60);
        assert!(matches!(create(&state, inactive).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_overlap_across_midnight() {
        let (state, _) = setup();
        create(&state, new_booking("T", "2025-06-16 23:30", 90))
            .await
            .unwrap();
        let err = create(&state, new_booking("T", "2025-06-17 00:30", 60)).await;
        assert!(matches!(err, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_queue_flow_computes_earnings() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();

        let started = change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::InProgress,
                completion: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(started.status, BookingStatus::InProgress);

        let done = change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::Done,
                completion: Some(Completion {
                    discount: Some(Discount::Flat { amount: 50 }),
                    final_price: None,
                }),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.final_price, Some(250));
        assert_eq!(done.therapist_commission, Some(120));
        assert_eq!(done.shop_revenue, Some(130));

        let stored = get(&state, &b.id).unwrap();
        assert_eq!(stored.status, BookingStatus::Done);
        assert_eq!(stored.shop_revenue, Some(130));
    }

    #[tokio::test]
    async fn test_skipping_a_state_is_rejected_and_nothing_saved() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        let err = change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::Done,
                completion: Some(Completion::default()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(get(&state, &b.id).unwrap().status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_commission_follows_config_rate() {
        let (state, _) = setup();
        queries::save_shop_config(&state.db(), &crate::models::ShopConfig::with_rate(0.5)).unwrap();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 90))
            .await
            .unwrap();
        for status in [BookingStatus::InProgress, BookingStatus::Done] {
            change_status(
                &state,
                &b.id,
                StatusChange {
                    status,
                    completion: Some(Completion::default()),
                },
            )
            .await
            .unwrap();
        }
        let done = get(&state, &b.id).unwrap();
        assert_eq!(done.therapist_commission, Some(225));
        assert_eq!(done.shop_revenue, Some(225));
    }

    #[tokio::test]
    async fn test_drag_to_busy_therapist_is_a_conflict() {
        let (state, _) = setup();
        create(&state, new_booking("U", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        let b = create(&state, new_booking("T", "2025-06-16 10:30", 60))
            .await
            .unwrap();

        let err = move_booking(
            &state,
            &b.id,
            MoveRequest {
                status: BookingStatus::Pending,
                therapist_id: Some("U".to_string()),
                completion: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(get(&state, &b.id).unwrap().therapist_id, "T");
    }

    #[tokio::test]
    async fn test_drag_to_free_therapist_and_start() {
        let (state, events) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:30", 60))
            .await
            .unwrap();

        let moved = move_booking(
            &state,
            &b.id,
            MoveRequest {
                status: BookingStatus::InProgress,
                therapist_id: Some("U".to_string()),
                completion: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.therapist_id, "U");
        assert_eq!(moved.status, BookingStatus::InProgress);

        let last = events.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.kind, QueueEventKind::BookingMoved);
    }

    #[tokio::test]
    async fn test_edit_reschedules_and_excludes_itself() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        let edited = update(
            &state,
            &b.id,
            BookingEdit {
                start_time: Some(dt("2025-06-16 10:30")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.start_time, dt("2025-06-16 10:30"));

        let err = update(
            &state,
            &b.id,
            BookingEdit {
                discount: Some(Discount::Flat { amount: 10 }),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_edit_done_booking_recomputes_split() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        for status in [BookingStatus::InProgress, BookingStatus::Done] {
            change_status(
                &state,
                &b.id,
                StatusChange {
                    status,
                    completion: Some(Completion::default()),
                },
            )
            .await
            .unwrap();
        }

        let edited = update(
            &state,
            &b.id,
            BookingEdit {
                discount: Some(Discount::Percent { percent: 10.0 }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.final_price, Some(270));
        assert_eq!(edited.therapist_commission, Some(120));
        assert_eq!(edited.shop_revenue, Some(150));
    }

    #[tokio::test]
    async fn test_reprice_replaces_manual_override() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::InProgress,
                completion: None,
            },
        )
        .await
        .unwrap();
        let done = change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::Done,
                completion: Some(Completion {
                    discount: None,
                    final_price: Some(200),
                }),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.final_price, Some(200));

        // a longer session is priced from the catalog again
        let longer = update(
            &state,
            &b.id,
            BookingEdit {
                duration_minutes: Some(90),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(longer.final_price, Some(450));
        assert_eq!(longer.therapist_commission, Some(180));
        assert_eq!(longer.shop_revenue, Some(270));

        let overridden = update(
            &state,
            &b.id,
            BookingEdit {
                duration_minutes: Some(60),
                final_price: Some(200),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(overridden.final_price, Some(200));
        assert_eq!(overridden.therapist_commission, Some(120));
        assert_eq!(get(&state, &b.id).unwrap().shop_revenue, Some(80));
    }

    #[tokio::test]
    async fn test_huge_override_is_rejected() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:00", 60))
            .await
            .unwrap();
        change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::InProgress,
                completion: None,
            },
        )
        .await
        .unwrap();
        let err = change_status(
            &state,
            &b.id,
            StatusChange {
                status: BookingStatus::Done,
                completion: Some(Completion {
                    discount: None,
                    final_price: Some(i64::MAX),
                }),
            },
        )
        .await;
        assert!(matches!(err, Err(AppError::Validation(_))));
        assert_eq!(get(&state, &b.id).unwrap().status, BookingStatus::InProgress);
    }

    #[tokio::test]
    async fn test_check_conflict_is_advisory() {
        let (state, _) = setup();
        let b = create(&state, new_booking("T", "2025-06-16 10:30", 60))
            .await
            .unwrap();
        let candidate = Candidate {
            therapist_id: "T".to_string(),
            start_time: dt("2025-06-16 10:00"),
            duration_minutes: 60,
        };
        let found = check_conflict(&state, &candidate, None).unwrap().unwrap();
        assert_eq!(found.booking_id, b.id);
        assert!(check_conflict(&state, &candidate, Some(b.id.as_str())).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_booking_is_not_found() {
        let (state, _) = setup();
        assert!(matches!(get(&state, "nope"), Err(AppError::NotFound(_))));
        let err = change_status(
            &state,
            "nope",
            StatusChange {
                status: BookingStatus::InProgress,
                completion: None,
            },
        )
        .await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }
}
