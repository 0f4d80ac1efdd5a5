//! Core types and shared functionality for jobscout.
//!
//! This crate provides:
//! - Unified error types
//! - Layered application configuration

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
