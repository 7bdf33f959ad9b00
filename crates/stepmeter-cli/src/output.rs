//! Output formatting module

use std::path::Path;

use stepmeter_app::CaptureOutcome;
use stepmeter_domain::Dashboard;
use stepmeter_types::{AppState, OutputFormat, Reading, Result};

const GAUGE_WIDTH: usize = 30;
const CHART_BAR_WIDTH: f64 = 20.0;

pub fn print_capture(format: OutputFormat, outcome: &CaptureOutcome) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome.extraction)?);
        return Ok(());
    }

    println!("\nReading Accepted");
    println!("================");
    println!("Value:       {:.1} kWh", outcome.reading.value);
    println!("Consumption: {:+.1} kWh", outcome.reading.consumption);
    println!(
        "Model:       {}{}",
        outcome.extraction.model_used,
        if outcome.from_cache { " (cached)" } else { "" }
    );
    Ok(())
}

/// Compact dashboard recap shown right after a capture
pub fn print_capture_summary(state: &AppState, dashboard: &Dashboard) {
    println!();
    println!(
        "Remaining:   {:.1} of {:.1} steps ({:.1}%)",
        dashboard.remaining_allowance, state.allowed_steps, dashboard.progress_percent
    );
    match dashboard.estimated_exhaustion {
        Some(date) => println!("Exhausted by: {}", date.format("%Y-%m-%d")),
        None => println!("Exhausted by: insufficient data"),
    }
}

pub fn print_status(format: OutputFormat, state: &AppState, dashboard: &Dashboard) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(dashboard)?);
        return Ok(());
    }

    println!("\nSeason Status");
    println!("=============");
    println!(
        "Remaining:   {:.1} of {:.1} steps ({:.1}%)",
        dashboard.remaining_allowance, state.allowed_steps, dashboard.progress_percent
    );
    println!("[{}]", gauge(dashboard.progress_percent));
    println!("Used:        {:.1} kWh total", dashboard.total_consumption);
    println!("Daily avg:   {:.1} kWh", dashboard.daily_average);
    println!("Weekly avg:  {:.1} kWh", dashboard.weekly_average);
    println!("Monthly avg: {:.1} kWh", dashboard.monthly_average);
    match dashboard.estimated_exhaustion {
        Some(date) => println!("Exhausted by: {}", date.format("%Y-%m-%d")),
        None => println!("Exhausted by: insufficient data"),
    }

    if let Some(alert) = &dashboard.anomaly {
        println!();
        println!(
            "Alert: consumption spike +{:.0}% above the prior average ({:.1} vs {:.1} kWh)",
            alert.severity_percent, alert.recent, alert.prior_mean
        );
    }

    if !dashboard.chart.is_empty() {
        println!("\nLast readings");
        println!("-------------");
        let max = dashboard
            .chart
            .iter()
            .map(|p| p.consumption)
            .fold(0.0_f64, f64::max);
        for point in &dashboard.chart {
            println!(
                "{}  {:>8.1}  {}",
                point.date.format("%Y-%m-%d"),
                point.consumption,
                chart_bar(point.consumption, max)
            );
        }
    }

    if state.has_photo() {
        println!("\nReference photo: stored (write it out with `stepmeter photo`)");
    }
    Ok(())
}

pub fn print_history(format: OutputFormat, readings: &[Reading], limit: usize) -> Result<()> {
    let newest_first: Vec<&Reading> = readings.iter().rev().take(limit).collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&newest_first)?);
        return Ok(());
    }

    if newest_first.is_empty() {
        println!("No readings recorded yet");
        return Ok(());
    }

    println!("\nReadings History");
    println!("================");
    println!("{:<18} {:>12} {:>14}", "Date", "Value", "Consumption");
    println!("{}", "-".repeat(46));
    for reading in &newest_first {
        println!(
            "{:<18} {:>12.1} {:>+14.1}",
            reading.date.format("%Y-%m-%d %H:%M").to_string(),
            reading.value,
            reading.consumption
        );
    }
    println!(
        "\nShowing {} of {} readings",
        newest_first.len(),
        readings.len()
    );
    Ok(())
}

pub fn print_settings(format: OutputFormat, state: &AppState, snapshot: &Path) -> Result<()> {
    if format == OutputFormat::Json {
        let settings = serde_json::json!({
            "onboarded": state.onboarded,
            "apiKey": mask_key(&state.api_key),
            "allowedSteps": state.allowed_steps,
            "seasonLimit": state.season_limit,
            "readings": state.readings.len(),
            "snapshot": snapshot.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("\nStepmeter Settings");
    println!("==================");
    println!("Onboarded:     {}", if state.onboarded { "yes" } else { "no" });
    println!("API key:       {}", mask_key(&state.api_key));
    println!("Allowed steps: {}", state.allowed_steps);
    if state.readings.is_empty() {
        println!("Season limit:  (set by the first reading)");
    } else {
        println!("Season limit:  {}", state.season_limit);
    }
    println!("Readings:      {}", state.readings.len());
    println!("Snapshot:      {}", snapshot.display());
    Ok(())
}

/// Remaining-allowance gauge; the bar saturates at 100% even though the
/// printed percentage can exceed it
fn gauge(percent: f64) -> String {
    let filled =
        ((percent.clamp(0.0, 100.0) / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled)
    )
}

fn chart_bar(consumption: f64, max: f64) -> String {
    if max <= 0.0 || consumption <= 0.0 {
        return String::new();
    }
    let width = ((consumption / max) * CHART_BAR_WIDTH).round() as usize;
    "#".repeat(width)
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}
