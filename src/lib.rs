#![forbid(unsafe_code)]

pub mod api;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod message;
pub mod messaging;
pub mod models;
pub mod persistence;
pub mod scheduler;
pub mod store;

pub use config::ServerConfig;
pub use errors::{AppError, Result};
