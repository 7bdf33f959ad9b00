//! Domain services over the readings ledger
//!
//! Everything in this crate is pure: state comes in, state or derived
//! figures go out. Persistence and HTTP live elsewhere.

pub mod dashboard;
pub mod ledger;
pub mod settings;

pub use dashboard::{AnomalyAlert, ChartPoint, Dashboard};
pub use ledger::add_reading;
pub use settings::{onboard, update_settings};
