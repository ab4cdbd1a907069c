//! Error types for the Tessera containers.
//!
//! Organized by the layer that raises them: allocation (raw storage),
//! bounds (checked access), element operations (construction, copy, move),
//! and configuration.

use std::error::Error;
use std::fmt;

/// Errors from acquiring raw element storage.
///
/// Allocation failures are raised before any element is touched, so the
/// container that requested the storage is always left as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The byte size of the requested block does not fit in `isize`.
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator could not provide the block.
    OutOfMemory {
        /// Size of the requested block in bytes.
        bytes: usize,
        /// Alignment of the requested block in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots exceed the address space")
            }
            Self::OutOfMemory { bytes, align } => {
                write!(f, "out of memory: could not allocate {bytes} bytes (align {align})")
            }
        }
    }
}

impl Error for AllocError {}

/// A checked access past the live range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexError {
    /// The requested index.
    pub index: usize,
    /// Number of live elements at the time of the request.
    pub len: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} out of range for length {}", self.index, self.len)
    }
}

impl Error for IndexError {}

/// Errors from a mutating array operation.
///
/// `E` is the element type's own failure type (`core::convert::Infallible`
/// for ordinary Rust values). Whether the array is unchanged after an
/// `Element` failure depends on the element type's relocation policy and
/// on the operation; each operation documents its guarantee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError<E> {
    /// Storage for the requested capacity could not be obtained.
    Alloc(AllocError),
    /// A position argument was outside the accepted range.
    OutOfRange {
        /// The requested position.
        index: usize,
        /// Number of live elements at the time of the request.
        len: usize,
    },
    /// An element construction, copy, or move failed.
    Element(E),
}

impl<E> ArrayError<E> {
    /// Whether this is an element-level failure.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// The element failure, if this is one.
    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Element(err) => Some(err),
            _ => None,
        }
    }

    /// Map the element failure type, leaving other variants unchanged.
    pub fn map_element<F>(self, op: impl FnOnce(E) -> F) -> ArrayError<F> {
        match self {
            Self::Alloc(err) => ArrayError::Alloc(err),
            Self::OutOfRange { index, len } => ArrayError::OutOfRange { index, len },
            Self::Element(err) => ArrayError::Element(op(err)),
        }
    }
}

impl<E> From<AllocError> for ArrayError<E> {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl<E> From<IndexError> for ArrayError<E> {
    fn from(err: IndexError) -> Self {
        Self::OutOfRange {
            index: err.index,
            len: err.len,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ArrayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "allocation failed: {err}"),
            Self::OutOfRange { index, len } => {
                write!(f, "position {index} out of range for length {len}")
            }
            Self::Element(err) => write!(f, "element operation failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for ArrayError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::OutOfRange { .. } => None,
            Self::Element(err) => Some(err),
        }
    }
}

/// Errors from validating a [`GrowthConfig`](crate::GrowthConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The growth factor must be at least 2 for amortized O(1) append.
    GrowthFactorTooSmall {
        /// The rejected factor.
        factor: usize,
    },
    /// The first non-zero capacity must hold at least one element.
    ZeroMinCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrowthFactorTooSmall { factor } => {
                write!(f, "growth factor {factor} is below the minimum of 2")
            }
            Self::ZeroMinCapacity => write!(f, "minimum capacity must be non-zero"),
        }
    }
}

impl Error for ConfigError {}
