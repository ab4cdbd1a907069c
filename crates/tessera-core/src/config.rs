//! Growth configuration for amortized append.

use crate::error::{AllocError, ConfigError};

/// How a full array picks its next capacity.
///
/// The next capacity is `max(min_capacity, capacity * factor)`. The
/// defaults reproduce classic doubling: an empty array grows to one slot,
/// then 2, 4, 8, ... Validated at construction; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GrowthConfig {
    /// Multiplier applied to the current capacity.
    ///
    /// Default: 2. Must be at least 2.
    factor: usize,

    /// Capacity chosen when growing from an empty buffer.
    ///
    /// Default: 1. Must be non-zero.
    min_capacity: usize,
}

impl GrowthConfig {
    /// Default growth multiplier.
    pub const DEFAULT_FACTOR: usize = 2;

    /// Default first non-zero capacity.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// The default doubling configuration.
    pub const DEFAULT: Self = Self {
        factor: Self::DEFAULT_FACTOR,
        min_capacity: Self::DEFAULT_MIN_CAPACITY,
    };

    /// Create a validated growth configuration.
    pub fn new(factor: usize, min_capacity: usize) -> Result<Self, ConfigError> {
        if factor < 2 {
            return Err(ConfigError::GrowthFactorTooSmall { factor });
        }
        if min_capacity == 0 {
            return Err(ConfigError::ZeroMinCapacity);
        }
        Ok(Self {
            factor,
            min_capacity,
        })
    }

    /// The growth multiplier.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// The first non-zero capacity.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Capacity to grow to from `capacity` when the array is full.
    ///
    /// Always strictly greater than `capacity`. Returns
    /// `AllocError::CapacityOverflow` if the product overflows `usize`.
    pub fn next_capacity(&self, capacity: usize) -> Result<usize, AllocError> {
        let grown = capacity
            .checked_mul(self.factor)
            .ok_or(AllocError::CapacityOverflow {
                requested: capacity,
            })?;
        Ok(grown.max(self.min_capacity))
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
