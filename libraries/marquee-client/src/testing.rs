//! Scriptable in-memory backend for unit tests.

use crate::api::CatalogApi;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use marquee_core::types::{CreateEntity, CreatePart, CreatedEntity, DuplicateQuery, EntityKind};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Backend whose answers and latencies are set per name.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    duplicates: Mutex<HashSet<String>>,
    composite_duplicates: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
    latency: Mutex<HashMap<String, Duration>>,
    titles: Mutex<Vec<String>>,
    pub(crate) duplicate_calls: Mutex<Vec<DuplicateQuery>>,
    pub(crate) suggest_calls: Mutex<Vec<(String, u32)>>,
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_duplicate(self, name: &str) -> Self {
        self.duplicates.lock().unwrap().insert(name.to_string());
        self
    }

    pub(crate) fn with_composite_duplicate(self, name: &str) -> Self {
        self.composite_duplicates
            .lock()
            .unwrap()
            .insert(name.to_string());
        self
    }

    pub(crate) fn with_failure(self, name: &str) -> Self {
        self.failing.lock().unwrap().insert(name.to_string());
        self
    }

    pub(crate) fn with_latency(self, name: &str, latency: Duration) -> Self {
        self.latency
            .lock()
            .unwrap()
            .insert(name.to_string(), latency);
        self
    }

    pub(crate) fn with_titles(self, titles: &[&str]) -> Self {
        *self.titles.lock().unwrap() = titles.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub(crate) fn duplicate_call_count(&self) -> usize {
        self.duplicate_calls.lock().unwrap().len()
    }

    pub(crate) fn suggest_call_count(&self) -> usize {
        self.suggest_calls.lock().unwrap().len()
    }

    async fn delay_for(&self, name: &str) {
        let latency = self.latency.lock().unwrap().get(name).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn fails(&self, name: &str) -> bool {
        self.failing.lock().unwrap().contains(name)
    }
}

fn unavailable() -> ClientError {
    ClientError::ServerUnreachable("fake backend offline".to_string())
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn check_duplicate(&self, _kind: EntityKind, query: &DuplicateQuery) -> Result<bool> {
        self.duplicate_calls.lock().unwrap().push(query.clone());
        self.delay_for(&query.name).await;

        if self.fails(&query.name) {
            return Err(unavailable());
        }

        let set = if query.is_composite() {
            &self.composite_duplicates
        } else {
            &self.duplicates
        };
        let duplicate = set.lock().unwrap().contains(&query.name);
        Ok(duplicate)
    }

    async fn suggest(&self, _kind: EntityKind, query: &str, limit: u32) -> Result<Vec<String>> {
        self.suggest_calls
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        self.delay_for(query).await;

        if self.fails(query) {
            return Err(unavailable());
        }

        let needle = query.to_lowercase();
        let titles = self
            .titles
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(titles)
    }

    async fn create_entity(&self, _kind: EntityKind, _body: &CreateEntity) -> Result<CreatedEntity> {
        Err(ClientError::InvalidInput(
            "FakeCatalog does not create entities".to_string(),
        ))
    }

    async fn create_part(&self, _kind: EntityKind, _body: &CreatePart) -> Result<()> {
        Err(ClientError::InvalidInput(
            "FakeCatalog does not create parts".to_string(),
        ))
    }

    async fn next_number(&self, _kind: EntityKind) -> Result<i64> {
        Ok(1)
    }
}
