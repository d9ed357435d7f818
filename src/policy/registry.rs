//! In-memory registry of issued seeds.

use crate::clock::{Clock, SystemClock};
use crate::errors::CollaboratorError;
use crate::policy::SeedAvailabilityChecker;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Tracks which seeds have been issued and when.
///
/// Seeds are keyed by their uppercase key-prefix hex form. Nothing is
/// persisted; a process restart starts from an empty registry.
pub struct MemorySeedRegistry {
    clock: Arc<dyn Clock>,
    issued: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemorySeedRegistry {
    /// Registry stamping issues with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Registry stamping issues with the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Record a seed as issued.
    ///
    /// Returns `false` if the seed was already recorded; the original issue
    /// time is kept.
    pub fn record(&self, seed_hex: &str) -> Result<bool, CollaboratorError> {
        let now = self.clock.now_utc();
        let mut issued = self.lock()?;
        if issued.contains_key(&seed_hex.to_uppercase()) {
            return Ok(false);
        }
        issued.insert(seed_hex.to_uppercase(), now);
        Ok(true)
    }

    /// When a seed was issued, if it was.
    pub fn issued_at(&self, seed_hex: &str) -> Result<Option<DateTime<Utc>>, CollaboratorError> {
        Ok(self.lock()?.get(&seed_hex.to_uppercase()).copied())
    }

    /// Number of issued seeds.
    ///
    /// Still counts after a holder of the lock panicked; the map is only
    /// ever changed by a single insert, so it is never left half-written.
    pub fn len(&self) -> usize {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no seed has been issued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>>, CollaboratorError> {
        self.issued
            .lock()
            .map_err(|_| CollaboratorError::new("seed registry lock poisoned"))
    }
}

impl Default for MemorySeedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedAvailabilityChecker for MemorySeedRegistry {
    fn is_seed_available(&self, seed_hex: &str) -> Result<bool, CollaboratorError> {
        Ok(!self.lock()?.contains_key(&seed_hex.to_uppercase()))
    }
}
