//! Command-line interface parsing
//!
//! Subcommands mirror the dashboard operations: current conditions, hourly
//! forecast, flight planning and the HTTP server that backs the dashboard.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::models::Location;
use crate::planner::PlanningMode;

/// Weather-aware flight safety for drone operators
#[derive(Parser, Debug)]
#[command(name = "dronewx")]
#[command(about = "Drone flight safety scoring, safe windows and flight planning")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current conditions and the short-range outlook
    Current {
        /// Coordinates as "lat,lon"
        #[arg(short, long, value_parser = Location::parse, allow_hyphen_values = true)]
        location: Location,

        /// Drone the request is made for
        #[arg(short, long)]
        drone: Option<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show the hourly forecast with safe windows
    Forecast {
        /// Coordinates as "lat,lon"
        #[arg(short, long, value_parser = Location::parse, allow_hyphen_values = true)]
        location: Location,

        /// Forecast horizon in hours, the configured default when omitted
        #[arg(short = 'H', long)]
        hours: Option<u32>,

        #[arg(short, long)]
        drone: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Plan a flight and pick its start time
    Plan {
        #[arg(short, long, value_parser = Location::parse, allow_hyphen_values = true)]
        location: Location,

        #[arg(short, long)]
        drone: String,

        /// Planned start (RFC 3339), now when omitted
        #[arg(short, long)]
        start: Option<DateTime<Utc>>,

        /// Flight duration in minutes
        #[arg(long, default_value_t = 30)]
        duration: u32,

        #[arg(short, long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,

        #[arg(long)]
        json: bool,
    },

    /// Run the dashboard HTTP API
    Serve {
        /// Port to listen on, overrides the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Manual,
}

impl From<ModeArg> for PlanningMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => PlanningMode::Auto,
            ModeArg::Manual => PlanningMode::Manual,
        }
    }
}
