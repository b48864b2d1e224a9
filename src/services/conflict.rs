use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Booking;

/// A proposed therapist time slot.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub therapist_id: String,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
}

impl Candidate {
    pub fn end_time(&self) -> NaiveDateTime {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }
}

/// What the front desk is told about the booking that blocks a slot.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictDetail {
    pub booking_id: String,
    pub therapist_id: String,
    pub customer_name: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&Booking> for ConflictDetail {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id.clone(),
            therapist_id: booking.therapist_id.clone(),
            customer_name: booking.customer_name.clone(),
            start_time: booking.start_time.format("%H:%M").to_string(),
            end_time: booking.end_time().format("%H:%M").to_string(),
        }
    }
}

/// Returns the first booking (by start time) of the same therapist whose
/// [start, end) window overlaps the candidate's. Completed bookings and the
/// booking being edited (`exclude_id`) are ignored.
pub fn find_conflict<'a>(
    candidate: &Candidate,
    existing: &'a [Booking],
    exclude_id: Option<&str>,
) -> Option<&'a Booking> {
    let proposed_start = candidate.start_time;
    let proposed_end = candidate.end_time();

    existing
        .iter()
        .filter(|b| b.therapist_id == candidate.therapist_id)
        .filter(|b| b.is_active())
        .filter(|b| Some(b.id.as_str()) != exclude_id)
        .filter(|b| proposed_start < b.end_time() && proposed_end > b.start_time)
        .min_by_key(|b| b.start_time)
}
