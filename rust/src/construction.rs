//! Construction and initialization logic for BucketIndex.
//!
//! This module contains threshold validation, the default configuration and
//! the sizing heuristics used when a caller does not pick a threshold.

use parking_lot::RwLock;

use crate::error::{IndexError, InitResult};
use crate::types::{BucketIndex, IndexShape, MAX_THRESHOLD, MIN_THRESHOLD};

/// Default split threshold for buckets
pub const DEFAULT_THRESHOLD: u64 = 128;

impl<K> BucketIndex<K> {
    /// Create an empty index that splits buckets once they hold `threshold`
    /// entries.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Bucket size that triggers a split (minimum 2)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BucketIndex)` if the threshold is valid, `Err(IndexError)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_index::BucketIndex;
    ///
    /// let index = BucketIndex::<u64>::new(64).unwrap();
    /// assert!(index.is_empty());
    /// assert!(BucketIndex::<u64>::new(1).is_err());
    /// ```
    pub fn new(threshold: u64) -> InitResult<Self> {
        validation::validate_threshold(threshold)?;

        Ok(Self {
            threshold,
            shape: RwLock::new(IndexShape::default()),
        })
    }

    /// Create an index with the default threshold.
    ///
    /// This is equivalent to calling `new(DEFAULT_THRESHOLD)`.
    pub fn with_default_threshold() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            shape: RwLock::new(IndexShape::default()),
        }
    }

    /// The bucket size that triggers a split.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }
}

impl<K> Default for BucketIndex<K> {
    fn default() -> Self {
        Self::with_default_threshold()
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that a threshold can drive bucket splits.
    ///
    /// Below `MIN_THRESHOLD` a split would leave an empty bucket behind; above
    /// `MAX_THRESHOLD` a bucket could outgrow its entry arena.
    pub fn validate_threshold(threshold: u64) -> InitResult<()> {
        if (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold) {
            Ok(())
        } else {
            Err(IndexError::InvalidThreshold {
                threshold,
                minimum: MIN_THRESHOLD,
                maximum: MAX_THRESHOLD,
            })
        }
    }

    /// Get the recommended threshold for an expected number of entries.
    ///
    /// Small indexes favor short chains; large ones favor fewer buckets so the
    /// bucket array stays cheap to shift on split and removal.
    pub fn recommended_threshold(expected_entries: u64) -> u64 {
        if expected_entries < 1_000 {
            16
        } else if expected_entries < 100_000 {
            DEFAULT_THRESHOLD
        } else if expected_entries < 10_000_000 {
            512
        } else {
            2048
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_construction() {
        let index = BucketIndex::<i32>::new(16).unwrap();
        assert_eq!(index.threshold(), 16);
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 0);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            BucketIndex::<i32>::new(0),
            Err(IndexError::InvalidThreshold { threshold: 0, .. })
        ));
        assert!(BucketIndex::<i32>::new(1).is_err());
        assert!(BucketIndex::<i32>::new(MIN_THRESHOLD).is_ok());
        assert!(BucketIndex::<i32>::new(MAX_THRESHOLD + 1).is_err());
    }

    #[test]
    fn test_index_default() {
        let index = BucketIndex::<String>::default();
        assert_eq!(index.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_validation() {
        assert!(validation::validate_threshold(2).is_ok());
        assert!(validation::validate_threshold(MAX_THRESHOLD).is_ok());
        assert!(validation::validate_threshold(1).is_err());
    }

    #[test]
    fn test_recommended_threshold() {
        assert_eq!(validation::recommended_threshold(50), 16);
        assert_eq!(validation::recommended_threshold(5_000), DEFAULT_THRESHOLD);
        assert_eq!(validation::recommended_threshold(500_000), 512);
        assert_eq!(validation::recommended_threshold(50_000_000), 2048);
    }
}
