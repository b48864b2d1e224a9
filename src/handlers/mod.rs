pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod queue;
pub mod reports;
