//! Append-only readings ledger

use chrono::{DateTime, Utc};
use stepmeter_types::{AppState, Reading};

/// Append an accepted meter value to the ledger.
///
/// The first reading of a season becomes the baseline: its consumption is 0,
/// the season limit derives from it, and its photo is kept as the season
/// reference image. Every later reading records the delta against its
/// predecessor. Values are accepted as-is, so a value lower than the previous
/// one yields a negative consumption (meter replacement, misread that was
/// accepted anyway).
pub fn add_reading(
    state: &mut AppState,
    value: f64,
    photo: Option<String>,
    taken_at: DateTime<Utc>,
) -> Reading {
    let consumption = match state.readings.last() {
        None => {
            state.season_limit = value + state.allowed_steps;
            state.initial_photo = photo;
            0.0
        }
        Some(previous) => value - previous.value,
    };

    let reading = Reading {
        date: taken_at,
        value,
        consumption,
    };
    state.readings.push(reading.clone());
    reading
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, 10, 0, 0).unwrap()
    }

    fn onboarded_state(allowed_steps: f64) -> AppState {
        AppState {
            onboarded: true,
            api_key: "key".to_string(),
            allowed_steps,
            ..AppState::default()
        }
    }

    #[test]
    fn first_reading_becomes_baseline() {
        let mut state = onboarded_state(500.0);
        let reading = add_reading(&mut state, 12345.0, Some("b64".to_string()), at(1));

        assert_eq!(reading.consumption, 0.0);
        assert_eq!(state.season_limit, 12845.0);
        assert_eq!(state.initial_photo.as_deref(), Some("b64"));
        assert_eq!(state.readings.len(), 1);
    }

    #[test]
    fn later_readings_record_delta_against_predecessor() {
        let mut state = onboarded_state(500.0);
        add_reading(&mut state, 100.0, None, at(1));
        add_reading(&mut state, 110.0, None, at(2));
        let third = add_reading(&mut state, 125.0, None, at(3));

        let consumptions: Vec<f64> = state.readings.iter().map(|r| r.consumption).collect();
        assert_eq!(consumptions, vec![0.0, 10.0, 15.0]);
        assert_eq!(third.value, 125.0);
        assert_eq!(state.total_consumption(), 25.0);
    }

    #[test]
    fn decreasing_value_yields_negative_consumption() {
        let mut state = onboarded_state(50.0);
        add_reading(&mut state, 100.0, None, at(1));
        let second = add_reading(&mut state, 90.0, None, at(2));

        assert_eq!(second.consumption, -10.0);
        assert_eq!(state.readings.len(), 2);
    }

    #[test]
    fn only_first_photo_is_kept() {
        let mut state = onboarded_state(500.0);
        add_reading(&mut state, 100.0, Some("first".to_string()), at(1));
        add_reading(&mut state, 110.0, Some("second".to_string()), at(2));

        assert_eq!(state.initial_photo.as_deref(), Some("first"));
    }

    #[test]
    fn season_limit_unchanged_by_later_readings() {
        let mut state = onboarded_state(500.0);
        add_reading(&mut state, 100.0, None, at(1));
        add_reading(&mut state, 700.0, None, at(2));

        assert_eq!(state.season_limit, 600.0);
    }
}
