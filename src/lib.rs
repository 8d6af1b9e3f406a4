//! Backend de reservas de alquiler de vehículos
//!
//! Expone los módulos como librería para que los tests de integración
//! puedan montar el router real.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
