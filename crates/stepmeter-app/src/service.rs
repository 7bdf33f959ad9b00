//! Capture use case
//!
//! The one flow that crosses every layer: validate the photo, compress it,
//! consult the cache, run the extraction fallback, append to the ledger,
//! persist the snapshot. Strictly sequential; once extraction starts there
//! is no cancellation, and the snapshot is only written after the reading
//! has been accepted.

use std::path::Path;

use chrono::Utc;
use log::{debug, info};

use stepmeter_domain::ledger;
use stepmeter_store::StateStore;
use stepmeter_types::{AppState, Error, ExtractionResult, Reading, Result};
use stepmeter_vision::{
    prepare_image, ExtractionCache, ProgressObserver, ReadingExtractor,
};

use crate::scanner::validate_image;

/// What a capture produced
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub extraction: ExtractionResult,
    pub reading: Reading,
    pub from_cache: bool,
}

/// Run the full capture flow for `image_path`, mutating `state` and saving
/// the snapshot on success.
///
/// Passing `None` for the cache disables it entirely; cache read or write
/// trouble is logged and never fails a capture that the API answered.
pub fn capture_reading(
    store: &StateStore,
    state: &mut AppState,
    extractor: &ReadingExtractor,
    cache: Option<&ExtractionCache>,
    image_path: &Path,
    progress: Option<&dyn ProgressObserver>,
) -> Result<CaptureOutcome> {
    if !state.onboarded {
        return Err(Error::NotOnboarded);
    }
    if state.api_key.is_empty() {
        return Err(Error::MissingCredential);
    }

    validate_image(image_path)?;
    let image = prepare_image(image_path)?;
    debug!(
        "compressed {} to {}x{}",
        image_path.display(),
        image.width,
        image.height
    );

    let cached = cache.and_then(|c| c.get(image_path).ok().flatten());
    let (extraction, from_cache) = match cached {
        Some(hit) => {
            info!("cache hit for {}", image_path.display());
            (hit, true)
        }
        None => {
            let result = extractor.extract(&image, &state.api_key, progress)?;
            if let Some(cache) = cache {
                if let Err(e) = cache.set(image_path, &result) {
                    debug!("could not cache extraction result: {}", e);
                }
            }
            (result, false)
        }
    };

    let reading = ledger::add_reading(
        state,
        extraction.reading,
        Some(image.base64.clone()),
        Utc::now(),
    );
    store.save(state)?;

    Ok(CaptureOutcome {
        extraction,
        reading,
        from_cache,
    })
}
