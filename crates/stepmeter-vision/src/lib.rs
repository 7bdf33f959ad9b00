//! Vision module - extracts a numeric meter reading from a photo
//!
//! A fixed list of models is tried strictly in order. Models that are gone
//! (404) or out of quota (429) are skipped quietly; any other failure is
//! recorded and the next model gets its turn. The first reply that parses
//! into a number wins and no further models are contacted.

pub mod api;
pub mod cache;
pub mod image_prep;
pub mod prompts;
pub mod transport;

pub use cache::{CacheStats, ExtractionCache};
pub use image_prep::{compress, prepare_image, CompressedImage};
pub use transport::{ApiResponse, HttpTransport, ModelTransport};

use std::time::Duration;

use log::{debug, warn};
use stepmeter_types::{Error, ExtractionResult, Result};

use crate::api::{GenerateContentRequest, GenerateContentResponse};

/// Default endpoint host
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Candidate models, tried strictly in this order
pub const MODEL_FALLBACK_LIST: &[&str] = &[
    "gemini-3-flash",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2-flash",
];

/// Receives human-readable progress lines during extraction. Notified
/// synchronously before each model attempt; has no effect on control flow.
pub trait ProgressObserver {
    fn on_status(&self, status: &str);
}

/// Extractor configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub base_url: String,
    pub models: Vec<String>,
    pub timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            models: MODEL_FALLBACK_LIST.iter().map(|m| m.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ExtractorConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the reading-extraction fallback pipeline
pub struct ReadingExtractor {
    transport: Box<dyn ModelTransport>,
    models: Vec<String>,
}

impl ReadingExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            transport: Box::new(HttpTransport::new(&config.base_url, config.timeout)),
            models: config.models.clone(),
        }
    }

    /// Custom transport, used by tests.
    pub fn with_transport(transport: Box<dyn ModelTransport>, models: Vec<String>) -> Self {
        Self { transport, models }
    }

    /// Run the fallback loop until one model yields a parseable reading.
    ///
    /// 404 and 429 responses skip to the next model without being recorded;
    /// every other failure becomes the candidate message for the final
    /// `ExtractionFailed` should all models run out.
    pub fn extract(
        &self,
        image: &CompressedImage,
        credential: &str,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<ExtractionResult> {
        let notify = |status: &str| {
            if let Some(observer) = progress {
                observer.on_status(status);
            }
        };

        let request = GenerateContentRequest::for_image(prompts::READING_PROMPT, &image.base64);
        let mut last_error: Option<Error> = None;

        for model in &self.models {
            notify(&format!("Trying {}...", model));

            let response = match self.transport.send(model, credential, &request) {
                Ok(r) => r,
                Err(e) => {
                    warn!("{}: transport failure: {}", model, e);
                    last_error = Some(e);
                    continue;
                }
            };

            if response.status == 404 || response.status == 429 {
                debug!("{} returned {}, trying next model", model, response.status);
                continue;
            }

            if !response.is_success() {
                let message = api::error_message(&response.body);
                warn!("{} returned HTTP {}: {}", model, response.status, message);
                last_error = Some(Error::Api {
                    model: model.clone(),
                    status: response.status,
                    message,
                });
                continue;
            }

            let text = match reply_text(&response.body) {
                Ok(t) => t,
                Err(e) => {
                    warn!("{}: {}", model, e);
                    last_error = Some(e);
                    continue;
                }
            };

            match parse_reading(&text) {
                Ok(reading) => {
                    debug!("{} read {} from {:?}", model, reading, text);
                    return Ok(ExtractionResult {
                        reading,
                        model_used: model.clone(),
                    });
                }
                Err(e) => {
                    warn!("{}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        let message = match last_error {
            Some(e) => e.to_string(),
            None => "all models failed".to_string(),
        };
        Err(Error::ExtractionFailed(message))
    }
}

/// Pull the first candidate's text out of a success body.
fn reply_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    response
        .first_text()
        .map(str::to_string)
        .ok_or(Error::EmptyReply)
}

/// Parse a numeric reading out of free-form model output.
///
/// Strips everything but ASCII digits and dots, then takes the longest
/// leading number with at most one dot. Model replies routinely carry units
/// or a trailing sentence period, so "12345.6 kWh" and "Reading: 12345."
/// both come out as expected.
pub fn parse_reading(text: &str) -> Result<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut number = String::new();
    let mut seen_dot = false;
    for c in stripped.chars() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        number.push(c);
    }

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::ParseFailure(text.to_string()));
    }

    number
        .parse::<f64>()
        .map_err(|_| Error::ParseFailure(text.to_string()))
}
