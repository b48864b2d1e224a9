use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Session lengths the shop sells, in minutes.
pub const ALLOWED_DURATIONS: [i32; 4] = [30, 60, 90, 120];

/// Ceiling for any single price or flat discount. Keeps daily and report sums well inside `i64`.
pub const MAX_PRICE: i64 = 100_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: String,
    pub therapist_id: String,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub final_price: Option<i64>,
    pub discount: Option<Discount>,
    pub shop_revenue: Option<i64>,
    pub therapist_commission: Option<i64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn end_time(&self) -> NaiveDateTime {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }

    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Done
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    InProgress,
    Done,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::InProgress,
        BookingStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "in_progress" => Some(BookingStatus::InProgress),
            "done" => Some(BookingStatus::Done),
            _ => None,
        }
    }

    /// The single forward step from this state, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            BookingStatus::Pending => Some(BookingStatus::InProgress),
            BookingStatus::InProgress => Some(BookingStatus::Done),
            BookingStatus::Done => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shop-granted price reduction applied when a booking is completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    Flat { amount: i64 },
    Percent { percent: f64 },
}

impl Discount {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Discount::Flat { amount } if *amount < 0 => {
                Err(format!("discount amount must not be negative: {amount}"))
            }
            Discount::Flat { amount } if *amount > MAX_PRICE => {
                Err(format!("discount amount must not exceed {MAX_PRICE}: {amount}"))
            }
            Discount::Percent { percent } if !(0.0..=100.0).contains(percent) => {
                Err(format!("discount percent must be within 0-100: {percent}"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: String,
    pub therapist_id: String,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// Partial edit from the booking modal; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingEdit {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub service_id: Option<String>,
    pub therapist_id: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub discount: Option<Discount>,
    pub final_price: Option<i64>,
}

/// Data that must accompany a move into `done`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Completion {
    pub discount: Option<Discount>,
    pub final_price: Option<i64>,
}
