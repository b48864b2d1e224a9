use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: String,
    pub name: String,
    pub status: TherapistStatus,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TherapistStatus {
    Active,
    Inactive,
}

impl TherapistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TherapistStatus::Active => "active",
            TherapistStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TherapistStatus::Active),
            "inactive" => Some(TherapistStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TherapistInput {
    pub name: String,
    pub start_date: Option<NaiveDate>,
}
