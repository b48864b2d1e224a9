use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Booking, BookingStatus, Completion, Service, Therapist};
use crate::services::earnings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSummary {
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub revenue: i64,
    pub therapist_commission: i64,
    pub shop_revenue: i64,
}

/// One day's bookings split into board columns.
#[derive(Debug, Clone, Serialize)]
pub struct QueueBoard {
    pub date: NaiveDate,
    pub pending: Vec<Booking>,
    pub in_progress: Vec<Booking>,
    pub done: Vec<Booking>,
    pub summary: QueueSummary,
    /// How often a board without an event stream should refetch.
    pub poll_interval_secs: u64,
}

pub fn build_board(date: NaiveDate, bookings: Vec<Booking>, poll_interval_secs: u64) -> QueueBoard {
    let mut board = QueueBoard {
        date,
        pending: vec![],
        in_progress: vec![],
        done: vec![],
        summary: QueueSummary::default(),
        poll_interval_secs,
    };

    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => board.pending.push(booking),
            BookingStatus::InProgress => board.in_progress.push(booking),
            BookingStatus::Done => {
                board.summary.revenue += booking.final_price.unwrap_or(0);
                board.summary.therapist_commission += booking.therapist_commission.unwrap_or(0);
                board.summary.shop_revenue += booking.shop_revenue.unwrap_or(0);
                board.done.push(booking);
            }
        }
    }

    board.summary.pending = board.pending.len();
    board.summary.in_progress = board.in_progress.len();
    board.summary.done = board.done.len();
    board
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EarningsTotals {
    pub bookings: usize,
    /// Sum of final (post-discount) prices.
    pub gross: i64,
    pub therapist_commission: i64,
    pub shop_revenue: i64,
}

impl EarningsTotals {
    fn add(&mut self, split: &Split) {
        self.bookings += 1;
        self.gross += split.final_price;
        self.therapist_commission += split.therapist_commission;
        self.shop_revenue += split.shop_revenue;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TherapistEarnings {
    pub therapist_id: String,
    pub therapist_name: String,
    pub totals: EarningsTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyEarnings {
    pub date: NaiveDate,
    pub totals: EarningsTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarningsReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: EarningsTotals,
    pub by_therapist: Vec<TherapistEarnings>,
    pub by_day: Vec<DailyEarnings>,
}

struct Split {
    final_price: i64,
    therapist_commission: i64,
    shop_revenue: i64,
}

/// Uses the split cached at completion; older rows without one are priced
/// from the current catalog and commission rate.
fn settle(booking: &Booking, services: &[Service], commission_rate: f64) -> Option<Split> {
    if let (Some(final_price), Some(therapist_commission), Some(shop_revenue)) = (
        booking.final_price,
        booking.therapist_commission,
        booking.shop_revenue,
    ) {
        return Some(Split {
            final_price,
            therapist_commission,
            shop_revenue,
        });
    }

    let original_price = services
        .iter()
        .find(|s| s.id == booking.service_id)
        .and_then(|s| s.price_for(booking.duration_minutes))?;
    let completion = Completion {
        discount: booking.discount,
        final_price: booking.final_price,
    };
    let e = earnings::compute(original_price, &completion, commission_rate);
    Some(Split {
        final_price: e.final_price,
        therapist_commission: e.therapist_commission,
        shop_revenue: e.shop_revenue,
    })
}

pub fn earnings_report(
    from: NaiveDate,
    to: NaiveDate,
    bookings: &[Booking],
    services: &[Service],
    therapists: &[Therapist],
    commission_rate: f64,
) -> EarningsReport {
    let mut totals = EarningsTotals::default();
    let mut by_therapist: BTreeMap<&str, EarningsTotals> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, EarningsTotals> = BTreeMap::new();

    for booking in bookings.iter().filter(|b| b.status == BookingStatus::Done) {
        let date = booking.start_time.date();
        if date < from || date > to {
            continue;
        }
        let Some(split) = settle(booking, services, commission_rate) else {
            tracing::warn!(
                booking_id = %booking.id,
                service_id = %booking.service_id,
                "no price for completed booking, left out of report"
            );
            continue;
        };
        totals.add(&split);
        by_therapist
            .entry(booking.therapist_id.as_str())
            .or_default()
            .add(&split);
        by_day.entry(date).or_default().add(&split);
    }

    let by_therapist = by_therapist
        .into_iter()
        .map(|(id, totals)| TherapistEarnings {
            therapist_id: id.to_string(),
            therapist_name: therapists
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| id.to_string()),
            totals,
        })
        .collect();

    EarningsReport {
        from,
        to,
        totals,
        by_therapist,
        by_day: by_day
            .into_iter()
            .map(|(date, totals)| DailyEarnings { date, totals })
            .collect(),
    }
}
