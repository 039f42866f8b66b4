use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::Coordinates;
use crate::ports::{LocationError, LocationProvider, PortError, PortResult, SessionStorage};

/// In-memory `SessionStorage` for tests and for clients without a disk.
///
/// Clones share the same map, so a "restart" can be simulated by building a
/// second store over a clone.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

fn poisoned() -> PortError {
    PortError::Storage("memory storage lock poisoned".to_string())
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries.lock().map_err(|_| poisoned())?.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

/// A `LocationProvider` that always answers with the same result.
#[derive(Clone, Debug)]
pub struct StaticLocation(pub Result<Coordinates, LocationError>);

impl StaticLocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self(Ok(Coordinates {
            latitude,
            longitude,
        }))
    }

    pub fn failing(error: LocationError) -> Self {
        Self(Err(error))
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.0.clone()
    }
}
