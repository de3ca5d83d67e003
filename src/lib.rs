pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod resources;
pub mod services;
pub mod state;
pub mod views;
