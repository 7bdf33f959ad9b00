//! Dashboard calculator
//!
//! Derived figures only; nothing here is persisted. Every call recomputes
//! from the full ledger, which stays cheap at a few readings per week.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use stepmeter_types::AppState;

/// Minimum readings before the spike check can run
const ANOMALY_MIN_READINGS: usize = 3;
/// A recent consumption above mean * this factor raises an alert
const ANOMALY_FACTOR: f64 = 1.5;
/// Chart shows this many most recent readings
const CHART_POINTS: usize = 7;

/// Consumption spike alert
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyAlert {
    /// Most recent consumption delta
    pub recent: f64,
    /// Mean of all earlier consumption deltas, baseline 0 included
    pub prior_mean: f64,
    /// How far above the mean, as a percentage
    pub severity_percent: f64,
}

/// One bar of the consumption chart
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: DateTime<Utc>,
    pub consumption: f64,
}

/// Derived dashboard figures over the readings ledger
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Steps left before the season limit, clamped at 0
    pub remaining_allowance: f64,
    /// Remaining share of the allowance; above 100 when the latest value
    /// sits below the baseline, never negative
    pub progress_percent: f64,
    /// Sum of all consumption deltas
    pub total_consumption: f64,
    /// kWh per day over the ledger's time span
    pub daily_average: f64,
    pub weekly_average: f64,
    pub monthly_average: f64,
    /// Projected date the allowance runs out; None while the daily average
    /// is not positive
    pub estimated_exhaustion: Option<DateTime<Utc>>,
    pub anomaly: Option<AnomalyAlert>,
    /// Up to the last 7 readings, oldest first
    pub chart: Vec<ChartPoint>,
}

impl Dashboard {
    /// Compute every dashboard figure from the current state.
    pub fn compute(state: &AppState, now: DateTime<Utc>) -> Self {
        let Some(latest) = state.readings.last() else {
            return Self::empty(state);
        };

        let remaining_allowance = (state.season_limit - latest.value).max(0.0);
        let progress_percent = (remaining_allowance / state.allowed_steps * 100.0).max(0.0);

        let total_consumption = state.total_consumption();
        let daily_average = total_consumption / span_days(state).max(1.0);

        let estimated_exhaustion = if daily_average > 0.0 {
            let days_left = remaining_allowance / daily_average;
            Duration::try_seconds((days_left * 86_400.0) as i64)
                .and_then(|d| now.checked_add_signed(d))
        } else {
            None
        };

        Dashboard {
            remaining_allowance,
            progress_percent,
            total_consumption,
            daily_average,
            weekly_average: daily_average * 7.0,
            monthly_average: daily_average * 30.0,
            estimated_exhaustion,
            anomaly: detect_anomaly(state),
            chart: chart_series(state),
        }
    }

    /// Before the first reading the whole allowance is intact and no
    /// averages exist.
    fn empty(state: &AppState) -> Self {
        Dashboard {
            remaining_allowance: state.allowed_steps,
            progress_percent: 0.0,
            total_consumption: 0.0,
            daily_average: 0.0,
            weekly_average: 0.0,
            monthly_average: 0.0,
            estimated_exhaustion: None,
            anomaly: None,
            chart: Vec::new(),
        }
    }
}

/// Fractional days between the first and last reading
fn span_days(state: &AppState) -> f64 {
    match (state.readings.first(), state.readings.last()) {
        (Some(first), Some(last)) => {
            (last.date - first.date).num_milliseconds() as f64 / 86_400_000.0
        }
        _ => 0.0,
    }
}

fn detect_anomaly(state: &AppState) -> Option<AnomalyAlert> {
    if state.readings.len() < ANOMALY_MIN_READINGS {
        return None;
    }
    let consumptions: Vec<f64> = state.readings.iter().map(|r| r.consumption).collect();
    anomaly_from_series(&consumptions)
}

/// Flag the newest consumption when it exceeds 1.5x the mean of all earlier
/// ones. The baseline's 0 is part of the mean and drags it down, so early
/// seasons alert more eagerly than late ones.
pub fn anomaly_from_series(consumptions: &[f64]) -> Option<AnomalyAlert> {
    let (&recent, prior) = consumptions.split_last()?;
    if prior.is_empty() {
        return None;
    }
    let prior_mean = prior.iter().sum::<f64>() / prior.len() as f64;
    if recent > prior_mean * ANOMALY_FACTOR {
        Some(AnomalyAlert {
            recent,
            prior_mean,
            severity_percent: (recent / prior_mean - 1.0) * 100.0,
        })
    } else {
        None
    }
}

fn chart_series(state: &AppState) -> Vec<ChartPoint> {
    let skip = state.readings.len().saturating_sub(CHART_POINTS);
    state
        .readings
        .iter()
        .skip(skip)
        .map(|r| ChartPoint {
            date: r.date,
            consumption: r.consumption,
        })
        .collect()
}
