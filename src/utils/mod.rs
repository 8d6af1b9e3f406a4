pub mod booking_rules;
pub mod errors;
