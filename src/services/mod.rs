pub mod booking;
pub mod cache;
pub mod catalog;
pub mod conflict;
pub mod earnings;
pub mod notify;
pub mod queue;
pub mod reports;
