//! `DroneWx` - Weather-aware flight safety for drone operators
//!
//! This library scores hourly weather for drone flight safety, extracts safe
//! flight windows from forecasts and plans flights around them. The same core
//! backs the CLI and the dashboard HTTP API.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod logging;
pub mod models;
pub mod planner;
pub mod safety;
pub mod weather;
pub mod web;
pub mod windows;

// Re-export core types for public API
pub use config::DroneWxConfig;
pub use error::DroneWxError;
pub use forecast::ForecastService;
pub use models::{ForecastPoint, Location, SafeWindow, WeatherData, WeatherObservation};
pub use planner::{FlightPlan, FlightPlanRequest, FlightPlanner, PlanningMode};
pub use safety::{SafetyAssessment, SafetyClass, SafetyReport, assess};
pub use weather::{ForecastSource, SyntheticSource};
pub use windows::extract_safe_windows;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DroneWxError>;
