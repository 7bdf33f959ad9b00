//! Application service layer
//!
//! Wires the domain, vision, and store crates into the capture use case and
//! resolves where state and cache live on disk.

pub mod paths;
pub mod scanner;
pub mod service;

pub use service::{capture_reading, CaptureOutcome};
