//! Data models for the DroneWx application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Weather: Hourly weather observations
//! - Forecast: Scored forecast points, safe windows and the weather response

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{ForecastPoint, SafeWindow, WeatherData};
pub use location::Location;
pub use weather::WeatherObservation;
