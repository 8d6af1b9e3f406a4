pub mod booking_repository;
pub mod payment_repository;
pub mod review_repository;
pub mod user_repository;
pub mod vehicle_repository;
