// src/lib.rs
//! Typed client for the hiring board REST API: services for every endpoint
//! and the client-side stores that drive job browsing, applications,
//! profiles, auth and the admin dashboard.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod services;
pub mod stores;
pub mod types;
pub mod utils;

pub use app::AppContext;
pub use config::{ClientConfig, ConfigManager};
pub use error::{ApiError, ApiResult};
