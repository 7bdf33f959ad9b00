//! Onboarding and settings updates

use stepmeter_types::{AppState, Error, Result};

/// First-run setup: record the season allowance and credential.
pub fn onboard(state: &mut AppState, allowed_steps: f64, api_key: String) -> Result<()> {
    validate_steps(allowed_steps)?;
    state.allowed_steps = allowed_steps;
    state.api_key = api_key;
    state.onboarded = true;
    Ok(())
}

/// Change the credential and/or the season allowance.
///
/// The season limit is recomputed whenever a baseline reading exists, which
/// keeps `season_limit == readings[0].value + allowed_steps` holding even for
/// imported snapshots where the two had drifted apart.
pub fn update_settings(
    state: &mut AppState,
    api_key: Option<String>,
    allowed_steps: Option<f64>,
) -> Result<()> {
    if let Some(key) = api_key {
        state.api_key = key;
    }
    if let Some(steps) = allowed_steps {
        validate_steps(steps)?;
        state.allowed_steps = steps;
    }
    if let Some(first) = state.readings.first() {
        state.season_limit = first.value + state.allowed_steps;
    }
    Ok(())
}

fn validate_steps(steps: f64) -> Result<()> {
    if !steps.is_finite() || steps <= 0.0 {
        return Err(Error::Config(format!(
            "allowed steps must be a positive number, got {}",
            steps
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::add_reading;
    use chrono::{TimeZone, Utc};

    #[test]
    fn onboard_records_allowance_and_credential() {
        let mut state = AppState::default();
        onboard(&mut state, 500.0, "secret".to_string()).unwrap();

        assert!(state.onboarded);
        assert_eq!(state.allowed_steps, 500.0);
        assert_eq!(state.api_key, "secret");
    }

    #[test]
    fn onboard_rejects_non_positive_allowance() {
        let mut state = AppState::default();
        assert!(onboard(&mut state, 0.0, String::new()).is_err());
        assert!(onboard(&mut state, -10.0, String::new()).is_err());
        assert!(onboard(&mut state, f64::NAN, String::new()).is_err());
        assert!(!state.onboarded);
    }

    #[test]
    fn changing_allowance_recomputes_season_limit() {
        let mut state = AppState::default();
        onboard(&mut state, 500.0, "k".to_string()).unwrap();
        add_reading(
            &mut state,
            12345.0,
            None,
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(state.season_limit, 12845.0);

        update_settings(&mut state, None, Some(600.0)).unwrap();
        assert_eq!(state.allowed_steps, 600.0);
        assert_eq!(state.season_limit, 12945.0);
    }

    #[test]
    fn changing_allowance_before_first_reading_leaves_limit_alone() {
        let mut state = AppState::default();
        onboard(&mut state, 500.0, "k".to_string()).unwrap();

        update_settings(&mut state, None, Some(600.0)).unwrap();
        assert_eq!(state.season_limit, 0.0);
    }

    #[test]
    fn updating_only_the_key_keeps_allowance() {
        let mut state = AppState::default();
        onboard(&mut state, 500.0, "old".to_string()).unwrap();

        update_settings(&mut state, Some("new".to_string()), None).unwrap();
        assert_eq!(state.api_key, "new");
        assert_eq!(state.allowed_steps, 500.0);
    }

    #[test]
    fn settings_save_repairs_drifted_limit() {
        let mut state = AppState {
            onboarded: true,
            allowed_steps: 500.0,
            season_limit: 999.0,
            ..AppState::default()
        };
        add_reading(
            &mut state,
            100.0,
            None,
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        );
        state.season_limit = 999.0;

        update_settings(&mut state, Some("k".to_string()), None).unwrap();
        assert_eq!(state.season_limit, 600.0);
    }
}
