//! Cache for extraction results
//!
//! Re-running a capture on the same photo file reuses the stored result
//! instead of spending another API call. Keyed by content hash, so a
//! renamed or copied photo still hits.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use stepmeter_types::{ExtractionResult, Result};

/// Content-addressed store of extraction results
pub struct ExtractionCache {
    cache_dir: PathBuf,
}

impl ExtractionCache {
    /// Open the cache, creating its directory when missing.
    pub fn open(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Cache key for a photo file (streaming hash, photos can be large)
    fn cache_key(image_path: &Path) -> Result<String> {
        let file = File::open(image_path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Cached extraction for a photo, if any.
    pub fn get(&self, image_path: &Path) -> Result<Option<ExtractionResult>> {
        let key = Self::cache_key(image_path)?;
        let entry_path = self.cache_dir.join(format!("{}.json", key));

        if !entry_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&entry_path)?;
        let result: ExtractionResult = serde_json::from_str(&content)?;
        Ok(Some(result))
    }

    /// Store an extraction result for a photo.
    pub fn set(&self, image_path: &Path, result: &ExtractionResult) -> Result<()> {
        let key = Self::cache_key(image_path)?;
        let entry_path = self.cache_dir.join(format!("{}.json", key));

        let content = serde_json::to_string_pretty(result)?;
        fs::write(&entry_path, content)?;
        Ok(())
    }

    /// Remove every cached extraction, returning how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let mut count = 0;

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                fs::remove_file(&path)?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Entry count and disk footprint.
    pub fn stats(&self) -> Result<CacheStats> {
        let mut count = 0;
        let mut total_size = 0u64;

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                count += 1;
                if let Ok(metadata) = fs::metadata(&path) {
                    total_size += metadata.len();
                }
            }
        }

        Ok(CacheStats {
            entry_count: count,
            total_size_bytes: total_size,
            cache_dir: self.cache_dir.clone(),
        })
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: u64,
    pub cache_dir: PathBuf,
}

impl CacheStats {
    pub fn display(&self) -> String {
        let size_kb = self.total_size_bytes as f64 / 1024.0;
        format!(
            "Cache Statistics\n\
             ================\n\
             Entries:    {}\n\
             Total size: {:.2} KB\n\
             Location:   {}",
            self.entry_count,
            size_kb,
            self.cache_dir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmeter_types::ExtractionResult;
    use tempfile::tempdir;

    fn sample() -> ExtractionResult {
        ExtractionResult {
            reading: 12345.6,
            model_used: "gemini-2.5-flash".to_string(),
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("meter.jpg");
        fs::write(&photo, b"not really a jpeg").unwrap();

        let cache = ExtractionCache::open(dir.path().join("cache")).unwrap();
        assert!(cache.get(&photo).unwrap().is_none());

        cache.set(&photo, &sample()).unwrap();
        assert_eq!(cache.get(&photo).unwrap(), Some(sample()));
    }

    #[test]
    fn same_content_hits_under_a_different_name() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.jpg");
        let second = dir.path().join("b.jpg");
        fs::write(&first, b"same bytes").unwrap();
        fs::write(&second, b"same bytes").unwrap();

        let cache = ExtractionCache::open(dir.path().join("cache")).unwrap();
        cache.set(&first, &sample()).unwrap();
        assert_eq!(cache.get(&second).unwrap(), Some(sample()));
    }

    #[test]
    fn different_content_misses() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.jpg");
        let second = dir.path().join("b.jpg");
        fs::write(&first, b"one photo").unwrap();
        fs::write(&second, b"another photo").unwrap();

        let cache = ExtractionCache::open(dir.path().join("cache")).unwrap();
        cache.set(&first, &sample()).unwrap();
        assert!(cache.get(&second).unwrap().is_none());
    }

    #[test]
    fn clear_reports_removed_entries() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("meter.jpg");
        fs::write(&photo, b"bytes").unwrap();

        let cache = ExtractionCache::open(dir.path().join("cache")).unwrap();
        cache.set(&photo, &sample()).unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.get(&photo).unwrap().is_none());
        assert_eq!(cache.stats().unwrap().entry_count, 0);
    }
}
