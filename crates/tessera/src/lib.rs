//! Tessera: growable arrays with explicit failure safety.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tessera sub-crates. For most users, adding `tessera` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let mut v = DynamicArray::new();
//! for i in 0..10 {
//!     v.push_back(10 - i).unwrap();
//! }
//! v.sort();
//! v.erase(0).unwrap();
//! v.insert(0, 1).unwrap();
//! assert_eq!(v, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
//!
//! // Element types with fallible copies pick their own guarantee.
//! #[derive(Debug)]
//! struct Handle(u32);
//!
//! impl Element for Handle {
//!     type Error = &'static str;
//!     type Relocation = CopyOnGrow;
//! }
//! impl TryMove for Handle {
//!     fn try_move_from(src: &mut Self) -> Result<Self, Self::Error> {
//!         Ok(Handle(std::mem::take(&mut src.0)))
//!     }
//! }
//! impl TryClone for Handle {
//!     fn try_clone(&self) -> Result<Self, Self::Error> {
//!         if self.0 == 13 { Err("unlucky") } else { Ok(Handle(self.0)) }
//!     }
//! }
//!
//! let mut handles = DynamicArray::new();
//! handles.push_back(Handle(13)).unwrap();
//! // Growing needs a copy of handle 13, which fails; nothing changes.
//! assert!(handles.push_back(Handle(1)).is_err());
//! assert_eq!(handles.len(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | Errors and growth configuration |
//! | [`raw`] | `tessera-raw` | Uninitialized aligned storage |
//! | [`array`] | `tessera-array` | `DynamicArray`, element traits, relocation policies |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error types and growth configuration (`tessera-core`).
pub use tessera_core as types;

/// Uninitialized aligned storage (`tessera-raw`).
///
/// Only needed when building a container of your own on
/// [`raw::RawBuffer`].
pub use tessera_raw as raw;

/// The growable array (`tessera-array`).
///
/// Besides [`array::DynamicArray`], this holds the element capability
/// traits and the three relocation policies.
pub use tessera_array as array;

pub use tessera_array::{darray, impl_element};

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Container
    pub use tessera_array::{DynamicArray, IntoIter};

    // Element capabilities and policies
    pub use tessera_array::{
        CopyOnGrow, Element, Guarantee, MoveOrAbandon, NoThrowMove, TryClone, TryMove,
    };

    // Errors and configuration
    pub use tessera_core::{AllocError, ArrayError, ConfigError, GrowthConfig, IndexError};
}
