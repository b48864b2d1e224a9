use serde::Serialize;

use crate::models::{Completion, Discount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Earnings {
    pub original_price: i64,
    pub final_price: i64,
    pub therapist_commission: i64,
    pub shop_revenue: i64,
}

/// Price after the discount, never below zero.
pub fn discounted_price(original_price: i64, discount: Option<&Discount>) -> i64 {
    let reduction = match discount {
        None => 0,
        Some(Discount::Flat { amount }) => *amount,
        Some(Discount::Percent { percent }) => (original_price as f64 * percent / 100.0).floor() as i64,
    };
    (original_price - reduction).max(0)
}

/// Splits a completed booking between therapist and shop.
///
/// The commission is always taken from the undiscounted price, so the shop
/// alone absorbs any discount. Shop revenue is allowed to go negative when
/// the final price drops below the commission.
pub fn compute(original_price: i64, completion: &Completion, commission_rate: f64) -> Earnings {
    let final_price = completion
        .final_price
        .unwrap_or_else(|| discounted_price(original_price, completion.discount.as_ref()));
    let therapist_commission = (original_price as f64 * commission_rate).floor() as i64;

    Earnings {
        original_price,
        final_price,
        therapist_commission,
        shop_revenue: final_price - therapist_commission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(discount: Option<Discount>, final_price: Option<i64>) -> Completion {
        Completion {
            discount,
            final_price,
        }
    }

    #[test]
    fn test_no_discount() {
        let e = compute(300, &completion(None, None), 0.4);
        assert_eq!(e.therapist_commission, 120);
        assert_eq!(e.final_price, 300);
        assert_eq!(e.shop_revenue, 180);
    }

    #[test]
    fn test_flat_discount_comes_out_of_shop_share() {
        let e = compute(300, &completion(Some(Discount::Flat { amount: 50 }), None), 0.4);
        assert_eq!(e.final_price, 250);
        assert_eq!(e.therapist_commission, 120);
        assert_eq!(e.shop_revenue, 130);
    }

    #[test]
    fn test_percent_discount() {
        let e = compute(300, &completion(Some(Discount::Percent { percent: 10.0 }), None), 0.4);
        assert_eq!(e.final_price, 270);
        assert_eq!(e.therapist_commission, 120);
        assert_eq!(e.shop_revenue, 150);
    }

    #[test]
    fn test_commission_truncates() {
        // 450 * 0.35 = 157.5
        let e = compute(450, &completion(None, None), 0.35);
        assert_eq!(e.therapist_commission, 157);
        assert_eq!(e.shop_revenue, 293);
    }

    #[test]
    fn test_large_discount_goes_negative() {
        let e = compute(300, &completion(Some(Discount::Flat { amount: 250 }), None), 0.4);
        assert_eq!(e.final_price, 50);
        assert_eq!(e.shop_revenue, -70);
        assert_ne!(e.shop_revenue + e.therapist_commission, e.original_price);
    }

    #[test]
    fn test_override_wins_over_discount() {
        let e = compute(
            300,
            &completion(Some(Discount::Flat { amount: 50 }), Some(200)),
            0.4,
        );
        assert_eq!(e.final_price, 200);
        assert_eq!(e.therapist_commission, 120);
        assert_eq!(e.shop_revenue, 80);
    }

    #[test]
    fn test_discount_never_below_zero() {
        assert_eq!(discounted_price(300, Some(&Discount::Flat { amount: 500 })), 0);
        assert_eq!(discounted_price(300, Some(&Discount::Percent { percent: 100.0 })), 0);
    }
}
