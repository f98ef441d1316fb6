use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use dronewx::cli::{Cli, Commands};
use dronewx::planner::{FlightPlan, FlightPlanRequest, FlightPlanner, Route};
use dronewx::{DroneWxConfig, ForecastService, SafetyReport, WeatherData, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DroneWxConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    let Some(command) = cli.command else {
        print_status(&config);
        return Ok(());
    };

    let forecasts = ForecastService::synthetic(&config);

    match command {
        Commands::Current {
            location,
            drone,
            json,
        } => {
            let data = forecasts
                .get_current_weather(location.latitude, location.longitude, drone)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if json {
                print_json(&data)?;
            } else {
                print_current(&data);
            }
        }
        Commands::Forecast {
            location,
            hours,
            drone,
            json,
        } => {
            let hours = hours.unwrap_or(config.forecast.default_hours);
            let data = forecasts
                .get_forecast(location.latitude, location.longitude, hours, drone)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if json {
                print_json(&data)?;
            } else {
                print_forecast(&data);
            }
        }
        Commands::Plan {
            location,
            drone,
            start,
            duration,
            mode,
            json,
        } => {
            let planner = FlightPlanner::new(forecasts, config.planning.lookahead_hours);
            let request = FlightPlanRequest {
                drone_id: drone,
                location,
                planned_start: start.unwrap_or_else(Utc::now),
                duration_minutes: duration,
                mode: mode.into(),
            };
            let plan = planner
                .plan_flight(&request)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if json {
                print_json(&plan)?;
            } else {
                print_plan(&plan);
            }
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(&config, forecasts).await?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_status(config: &DroneWxConfig) {
    println!("dronewx v{}", dronewx::VERSION);
    println!();
    match DroneWxConfig::get_config_path() {
        Some(path) if path.exists() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not found, using defaults)", path.display()),
        None => println!("Config file: none (using defaults)"),
    }
    println!("Safe threshold: {}", config.safety.safe_threshold);
    println!(
        "Forecast horizon: {}h default, {}h max",
        config.forecast.default_hours, config.forecast.max_hours
    );
    println!("Server: {}", config.bind_address());
    println!();
    println!("Try: dronewx forecast --location \"55.75,37.62\" --hours 12");
    println!("Run 'dronewx --help' for all commands.");
}

fn print_current(data: &WeatherData) {
    let now = &data.current;
    let obs = &now.observation;
    let class = now.safety_class();

    println!("Current conditions at {}", data.location.format_coordinates());
    if let Some(drone) = &data.drone_id {
        println!("Drone: {drone}");
    }
    println!();
    println!(
        "{} {} (safety index {})",
        class.symbol(),
        class.label(),
        now.safety_index()
    );
    println!("  {}", class.message());
    println!();
    println!("  Temperature:   {}", obs.format_temperature());
    println!("  Wind:          {}", obs.format_wind());
    println!("  Precipitation: {}", obs.format_precipitation());
    println!("  Visibility:    {}", obs.format_visibility());
    println!("  Pressure:      {}", obs.format_pressure());
    println!("  Cloud cover:   {}", obs.format_cloud_cover());

    let report = SafetyReport::analyze(obs);
    let limiting = report.limiting_factors();
    if !limiting.is_empty() {
        println!();
        println!("Limiting factors:");
        for factor in limiting {
            println!("  {:>4}  {}", factor.delta, factor.description);
        }
    }

    print_windows(data);
}

fn print_forecast(data: &WeatherData) {
    println!(
        "{}h forecast for {}",
        data.forecast.len(),
        data.location.format_coordinates()
    );
    println!();
    println!(
        "{:<17} {:>7} {:>13} {:>8} {:>7} {:>6}  Safety",
        "Time (UTC)", "Temp", "Wind/Gust", "Precip", "Vis", "Cloud"
    );

    for point in &data.forecast {
        let obs = &point.observation;
        println!(
            "{:<17} {:>6.1}° {:>5.1}/{:<5.1}m/s {:>6.1}mm {:>5.1}km {:>5.0}%  {} {:>3} {}",
            obs.time.format("%Y-%m-%d %H:%M"),
            obs.temp_c,
            obs.wind_speed_mps,
            obs.wind_gust_mps,
            obs.precip_mmph,
            obs.visibility_km,
            obs.cloud_cover_pct,
            point.safety_class().symbol(),
            point.safety_index(),
            point.safety_class().label(),
        );
    }

    print_windows(data);
}

fn print_windows(data: &WeatherData) {
    println!();
    if data.safe_windows.is_empty() {
        println!("No safe flight windows in this period.");
        return;
    }

    println!("Safe flight windows:");
    for window in &data.safe_windows {
        println!(
            "  {} - {}  peak {}",
            window.start.format("%Y-%m-%d %H:%M"),
            window.end.format("%H:%M"),
            window.max_safety_index
        );
    }
}

fn print_plan(plan: &FlightPlan) {
    println!("Flight plan for {}", plan.drone_id);
    println!(
        "Recommended start: {}",
        plan.recommended_start.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    println!("Primary route:");
    print_route(&plan.route);

    for (i, route) in plan.alternative_routes.iter().enumerate() {
        println!();
        println!("Alternative {}:", i + 1);
        print_route(route);
    }
}

fn print_route(route: &Route) {
    for waypoint in &route.waypoints {
        println!(
            "  {}  {}  {:>5.0}m  {} {}",
            waypoint.eta.format("%H:%M"),
            waypoint.position.format_coordinates(),
            waypoint.altitude_m,
            waypoint.safety_class.symbol(),
            waypoint.safety_index
        );
    }
    println!(
        "  {:.2} km, max {:.0} m, avg safety {:.1} ({})",
        route.distance_km,
        route.max_altitude_m,
        route.avg_safety_index,
        route.avg_safety_class.label()
    );
}
