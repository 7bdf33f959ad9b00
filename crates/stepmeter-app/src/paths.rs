//! Directory resolution for the snapshot and the extraction cache

use std::path::PathBuf;

use stepmeter_types::{Error, Result};

const APP_DIR: &str = "stepmeter";

/// Directory holding `state.json`. An explicit override wins; otherwise the
/// platform data dir gets a `stepmeter` subdirectory.
pub fn data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| Error::Config("could not determine a data directory".to_string()))
}

/// Directory for cached extraction results. With an override everything
/// stays under that one root, which keeps tests hermetic.
pub fn cache_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.join("cache"));
    }
    dirs::cache_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| Error::Config("could not determine a cache directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_used_verbatim_for_data() {
        let dir = data_dir(Some(PathBuf::from("/tmp/somewhere"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn override_nests_the_cache() {
        let dir = cache_dir(Some(PathBuf::from("/tmp/somewhere"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/somewhere/cache"));
    }
}
