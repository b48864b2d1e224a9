use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub total_visits: i64,
    pub last_visit: NaiveDateTime,
}
