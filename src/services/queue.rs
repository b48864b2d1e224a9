use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Completion, MAX_PRICE};
use crate::services::earnings::{self, Earnings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Dropped back onto its own column.
    Unchanged,
    Start,
    Complete,
}

/// Only single forward steps are legal; there is no way back from `done`.
pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<Transition, AppError> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    match (from.next(), to) {
        (Some(BookingStatus::InProgress), BookingStatus::InProgress) => Ok(Transition::Start),
        (Some(BookingStatus::Done), BookingStatus::Done) => Ok(Transition::Complete),
        _ => Err(AppError::InvalidTransition { from, to }),
    }
}

/// What a completion is priced against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub original_price: i64,
    pub commission_rate: f64,
}

/// Moves `booking` to `to`, stamping earnings on completion. `pricing` is only
/// consulted when the booking enters `done`.
pub fn apply(
    booking: &mut Booking,
    to: BookingStatus,
    completion: Option<Completion>,
    pricing: impl FnOnce() -> Result<Pricing, AppError>,
) -> Result<Option<Earnings>, AppError> {
    match transition(booking.status, to)? {
        Transition::Unchanged => Ok(None),
        Transition::Start => {
            booking.status = BookingStatus::InProgress;
            Ok(None)
        }
        Transition::Complete => {
            let completion = completion.ok_or_else(|| {
                AppError::validation("completing a booking requires discount or final price data")
            })?;
            validate_completion(&completion)?;
            let pricing = pricing()?;
            booking.status = BookingStatus::Done;
            Ok(Some(stamp_earnings(booking, &completion, pricing)))
        }
    }
}

pub fn validate_completion(completion: &Completion) -> Result<(), AppError> {
    if let Some(discount) = &completion.discount {
        discount.validate().map_err(AppError::Validation)?;
    }
    match completion.final_price {
        Some(p) if p < 0 => Err(AppError::validation("final price must not be negative")),
        Some(p) if p > MAX_PRICE => Err(AppError::validation(format!(
            "final price must not exceed {MAX_PRICE}: {p}"
        ))),
        _ => Ok(()),
    }
}

/// Writes discount, final price and the commission split onto the booking.
pub fn stamp_earnings(booking: &mut Booking, completion: &Completion, pricing: Pricing) -> Earnings {
    let earnings = earnings::compute(pricing.original_price, completion, pricing.commission_rate);
    booking.discount = completion.discount;
    booking.final_price = Some(earnings.final_price);
    booking.therapist_commission = Some(earnings.therapist_commission);
    booking.shop_revenue = Some(earnings.shop_revenue);
    earnings
}

/// Result of dropping a card on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub transition: Transition,
    /// New therapist, when the card landed in another therapist's lane.
    pub reassign_to: Option<String>,
}

pub fn plan_move(
    booking: &Booking,
    target_status: BookingStatus,
    target_therapist: Option<&str>,
) -> Result<MovePlan, AppError> {
    let transition = transition(booking.status, target_status)?;

    let reassign_to = match target_therapist {
        Some(id) if id != booking.therapist_id => {
            if booking.status != BookingStatus::Pending {
                return Err(AppError::validation(
                    "only pending bookings can be moved to another therapist",
                ));
            }
            Some(id.to_string())
        }
        _ => None,
    };

    Ok(MovePlan {
        transition,
        reassign_to,
    })
}
