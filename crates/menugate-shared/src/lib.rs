//! # Menugate Shared
//! 
//! Configuration, constants, error types and telemetry shared by the menu
//! gating crates.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::AppError;
