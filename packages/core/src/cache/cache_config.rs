//! Cache configuration and preset limits
//!
//! Provides `CacheConfig` for sizing the slot array and the byte ceilings
//! applied to individual objects and to the cache as a whole.

use serde::{Deserialize, Serialize};

use crate::config::validation::{ConfigResult, ConfigurationError, Validator};

/// Total bytes the cache may hold across all occupied slots
pub const MAX_CACHE_SIZE: usize = 1_049_000;
/// Responses of this many bytes or more are never cached
pub const MAX_OBJECT_SIZE: usize = 102_400;
/// Number of slots in the cache
pub const SLOT_COUNT: usize = 10;

/// Cache configuration and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of fixed slots
    pub slot_count: usize,
    /// Maximum bytes held across all occupied slots
    pub max_cache_size: usize,
    /// Exclusive upper bound on the size of a single cached object
    pub max_object_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            slot_count: SLOT_COUNT,
            max_cache_size: MAX_CACHE_SIZE,
            max_object_size: MAX_OBJECT_SIZE,
        }
    }
}

impl CacheConfig {
    /// Create a small configuration for tests and constrained deployments
    #[must_use]
    pub fn tiny() -> Self {
        Self {
            slot_count: 4,
            max_cache_size: 4 * 1024,
            max_object_size: 1024,
        }
    }

    #[must_use]
    pub fn with_slot_count(mut self, slot_count: usize) -> Self {
        self.slot_count = slot_count;
        self
    }

    #[must_use]
    pub fn with_max_object_size(mut self, max_object_size: usize) -> Self {
        self.max_object_size = max_object_size;
        self
    }

    #[must_use]
    pub fn with_max_cache_size(mut self, max_cache_size: usize) -> Self {
        self.max_cache_size = max_cache_size;
        self
    }

    /// Raise the total budget, if needed, so every slot can hold an object just
    /// under the per-object ceiling. Never lowers it.
    #[must_use]
    pub fn grow_budget(mut self) -> Self {
        let worst_case = self.slot_count.saturating_mul(self.max_object_size);
        self.max_cache_size = self.max_cache_size.max(worst_case);
        self
    }

    /// Whether an object of `len` bytes may be cached
    #[inline]
    #[must_use]
    pub fn admits(&self, len: usize) -> bool {
        len < self.max_object_size
    }
}

impl Validator for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.slot_count == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "slot_count must be at least 1".to_string(),
            ));
        }

        if self.max_object_size == 0 {
            return Err(ConfigurationError::InvalidBufferSize(
                "max_object_size must be at least 1".to_string(),
            ));
        }

        // Every slot may hold an object just under the ceiling, so the worst case
        // must fit in the total budget.
        let worst_case = self.slot_count.checked_mul(self.max_object_size).ok_or_else(|| {
            ConfigurationError::Conflict("slot_count * max_object_size overflows".to_string())
        })?;
        if worst_case > self.max_cache_size {
            return Err(ConfigurationError::Conflict(format!(
                "{} slots of up to {} bytes exceed the cache budget of {} bytes",
                self.slot_count, self.max_object_size, self.max_cache_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_fit_budget() {
        let config = CacheConfig::default();
        assert_eq!(config.slot_count, 10);
        assert!(config.validate().is_ok());
        assert!(config.admits(MAX_OBJECT_SIZE - 1));
        assert!(!config.admits(MAX_OBJECT_SIZE));
    }

    #[test]
    fn test_budget_conflict_rejected() {
        let config = CacheConfig::default().with_max_cache_size(1000);
        assert!(matches!(config.validate(), Err(ConfigurationError::Conflict(_))));
    }

    #[test]
    fn test_zero_slots_rejected() {
        let config = CacheConfig::default().with_slot_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grow_budget_fits_more_slots() {
        let config = CacheConfig::default().with_slot_count(32);
        assert!(config.validate().is_err());

        let config = config.grow_budget();
        assert_eq!(config.max_cache_size, 32 * MAX_OBJECT_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grow_budget_fits_larger_objects() {
        let config = CacheConfig::default().with_max_object_size(204_800).grow_budget();
        assert_eq!(config.max_cache_size, 10 * 204_800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grow_budget_never_shrinks() {
        let config = CacheConfig::tiny().with_max_cache_size(1 << 20).grow_budget();
        assert_eq!(config.max_cache_size, 1 << 20);
    }
}
