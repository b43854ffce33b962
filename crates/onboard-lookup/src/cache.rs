//! Memoizing wrapper for geographic lookups.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{LookupProvider, Result};

/// Caches country and state answers of an inner provider.
///
/// Only geography is cached. Persisted-record checks always reach the inner
/// provider so each run sees the current store. Failed lookups are not cached.
#[derive(Debug)]
pub struct CachedLookup<L> {
    inner: L,
    countries: DashMap<String, bool>,
    states: DashMap<(String, String), bool>,
}

impl<L> CachedLookup<L> {
    #[must_use]
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            countries: DashMap::new(),
            states: DashMap::new(),
        }
    }

    #[must_use]
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Number of memoized geography answers.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.countries.len() + self.states.len()
    }

    pub fn clear(&self) {
        self.countries.clear();
        self.states.clear();
    }
}

fn cache_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[async_trait]
impl<L: LookupProvider> LookupProvider for CachedLookup<L> {
    async fn country_exists(&self, iso_code: &str) -> Result<bool> {
        let key = cache_key(iso_code);
        if let Some(hit) = self.countries.get(&key) {
            return Ok(*hit);
        }
        let exists = self.inner.country_exists(iso_code).await?;
        self.countries.insert(key, exists);
        Ok(exists)
    }

    async fn state_exists(
        &self,
        country_iso_code: &str,
        state_name_or_code: &str,
    ) -> Result<bool> {
        let key = (cache_key(country_iso_code), cache_key(state_name_or_code));
        if let Some(hit) = self.states.get(&key) {
            return Ok(*hit);
        }
        let exists = self
            .inner
            .state_exists(country_iso_code, state_name_or_code)
            .await?;
        self.states.insert(key, exists);
        Ok(exists)
    }

    async fn business_name_exists(&self, name: &str) -> Result<bool> {
        self.inner.business_name_exists(name).await
    }

    async fn contact_email_exists(&self, email: &str) -> Result<bool> {
        self.inner.contact_email_exists(email).await
    }
}
