use std::collections::HashMap;

use async_trait::async_trait;
use model::CountryCode;
use tokio::sync::RwLock;
use utility::geo::grid_key;

use crate::{ResolutionError, ReverseGeocoder};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    fn measure(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

/// Remembers successful lookups so that repeated positions cost only one
/// request. Positions are keyed by the E7 grid cell they fall into; with a
/// grid of one only identical coordinates share an entry.
/// Failed lookups are not remembered.
pub struct CachedGeocoder<G> {
    inner: G,
    grid_e7: i64,
    entries: RwLock<HashMap<(i64, i64), CountryCode>>,
    stats: RwLock<CacheStats>,
}

impl<G: ReverseGeocoder> CachedGeocoder<G> {
    pub fn new(inner: G, grid_e7: i64) -> Self {
        Self {
            inner,
            grid_e7: grid_e7.max(1),
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

#[async_trait]
impl<G: ReverseGeocoder> ReverseGeocoder for CachedGeocoder<G> {
    async fn resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CountryCode, ResolutionError> {
        let key = grid_key(latitude, longitude, self.grid_e7);

        let cached = self.entries.read().await.get(&key).cloned();
        self.stats.write().await.measure(cached.is_some());
        if let Some(country) = cached {
            return Ok(country);
        }

        let country = self.inner.resolve(latitude, longitude).await?;
        self.entries.write().await.insert(key, country.clone());
        Ok(country)
    }
}
