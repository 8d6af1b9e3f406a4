pub mod booking;
pub mod payment;
pub mod review;
pub mod user;
pub mod vehicle;
