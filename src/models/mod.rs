pub mod booking;
pub mod customer;
pub mod role;
pub mod service;
pub mod shop_config;
pub mod therapist;

pub use booking::{
    Booking, BookingEdit, BookingStatus, Completion, Discount, NewBooking, ALLOWED_DURATIONS,
    MAX_PRICE,
};
pub use customer::Customer;
pub use role::{Capability, Role};
pub use service::{Service, ServiceInput};
pub use shop_config::{ShopConfig, ShopConfigUpdate};
pub use therapist::{Therapist, TherapistInput, TherapistStatus};
