//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A single-request OpenWeather client with a typed error taxonomy
//! - The normalized weather record shown to users
//! - A persisted, bounded list of recent searches
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod model;

pub use client::WeatherClient;
pub use config::Config;
pub use error::LookupError;
pub use history::HistoryStore;
pub use model::{Condition, WeatherRecord};
