pub mod api;
pub mod booking;
pub mod payment;
pub mod preferences;
pub mod slots;
