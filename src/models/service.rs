use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Price keyed by session length in minutes.
    pub prices: BTreeMap<i32, i64>,
}

impl Service {
    pub fn price_for(&self, duration_minutes: i32) -> Option<i64> {
        self.prices.get(&duration_minutes).copied()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub category: String,
    pub prices: BTreeMap<i32, i64>,
}

impl ServiceInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("service name is required".to_string());
        }
        if self.prices.is_empty() {
            return Err("service needs at least one price".to_string());
        }
        for (duration, price) in &self.prices {
            if !super::booking::ALLOWED_DURATIONS.contains(duration) {
                return Err(format!("unsupported duration: {duration} minutes"));
            }
            if *price < 0 {
                return Err(format!("price for {duration} minutes must not be negative"));
            }
            if *price > super::booking::MAX_PRICE {
                return Err(format!("price for {duration} minutes is too large: {price}"));
            }
        }
        Ok(())
    }
}
