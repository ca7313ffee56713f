pub mod api;
pub mod app_state;
pub mod cache;
pub mod config;
pub mod detector;
pub mod entities;
pub mod fetcher;
pub mod health;
pub mod service;
pub mod telemetry;
