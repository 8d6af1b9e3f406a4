pub mod stripe_service;
