use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::api::DetailPage;
use crate::models::Mypage;

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Integer division rounding half up, for non-negative values.
fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// Short relative age, rounded to the nearest minute, hour or day.
    pub fn age_display(&self) -> String {
        match self.age_minutes() {
            m if m < 1 => "just now".to_string(),
            m if m < MINUTES_PER_HOUR => format!("{}m ago", m),
            m if m < MINUTES_PER_DAY => format!("{}h ago", round_div(m, MINUTES_PER_HOUR)),
            m => format!("{}d ago", round_div(m, MINUTES_PER_DAY)),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Keep cache file names to letters, digits and underscores.
    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        debug!(cache = name, age = %cached.age_display(), "Loaded from cache");
        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    // ===== Regions =====

    pub fn load_regions(&self) -> Result<Option<CachedData<Vec<String>>>> {
        self.load("regions")
    }

    pub fn save_regions(&self, regions: &[String]) -> Result<()> {
        self.save("regions", &regions)
    }

    pub fn load_districts(&self, city: &str) -> Result<Option<CachedData<Vec<String>>>> {
        self.load(&format!("districts_{}", Self::sanitize_key(city)))
    }

    pub fn save_districts(&self, city: &str, districts: &[String]) -> Result<()> {
        self.save(&format!("districts_{}", Self::sanitize_key(city)), &districts)
    }

    // ===== Member =====

    pub fn load_mypage(&self) -> Result<Option<CachedData<Mypage>>> {
        self.load("mypage")
    }

    pub fn save_mypage(&self, mypage: &Mypage) -> Result<()> {
        self.save("mypage", mypage)
    }

    // ===== Subscription Detail =====

    pub fn load_detail_page(&self, id: &str) -> Result<Option<CachedData<DetailPage>>> {
        self.load(&format!("subscription_{}", Self::sanitize_key(id)))
    }

    pub fn save_detail_page(&self, id: &str, page: &DetailPage) -> Result<()> {
        self.save(&format!("subscription_{}", Self::sanitize_key(id)), page)
    }

    /// Load cached data, logging read errors instead of failing
    pub fn load_or_none<T>(
        &self,
        name: &str,
        loader: impl FnOnce(&Self) -> Result<Option<CachedData<T>>>,
    ) -> Option<CachedData<T>> {
        match loader(self) {
            Ok(cached) => cached,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
