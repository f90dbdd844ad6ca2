//! Core library for the `weather` client.
//!
//! This crate defines:
//! - Configuration handling
//! - The backend API client and its trait seam
//! - Shared domain models (conditions, forecasts, saved searches)
//! - Forecast day reduction and condition icons
//! - View orchestration and the saved-search list
//!
//! It is used by `weather-cli`, but carries no terminal code of its own.

pub mod client;
pub mod config;
pub mod forecast;
pub mod history;
pub mod icon;
pub mod model;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientError, HttpBackend, WeatherBackend, backend_from_config};
pub use config::Config;
pub use history::{Confirm, HistoryList};
pub use icon::{DayPart, WeatherIcon};
pub use model::{
    CurrentConditions, ExportFormat, Forecast, ForecastEntry, HistoryRecord, LocationQuery,
    TravelVideo, TripRange,
};
pub use orchestrator::{Orchestrator, Phase, ViewState};
