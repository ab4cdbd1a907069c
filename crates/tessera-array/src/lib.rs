//! A growable array with explicit failure safety.
//!
//! [`DynamicArray`] is a contiguous, geometrically growing sequence built on
//! [`RawBuffer`]. What it promises when an element's copy or move fails is
//! chosen per element type through [`Element::Relocation`]:
//!
//! ```text
//! DynamicArray<T>
//! ├── RawBuffer<T>        (uninitialized slots, freed exactly once)
//! ├── len                 (slots [0, len) are live)
//! ├── GrowthConfig        (next capacity when full)
//! └── T::Relocation       (NoThrowMove | CopyOnGrow | MoveOrAbandon)
//! ```
//!
//! # Failure safety
//!
//! - **NoThrowMove:** growth cannot fail once memory is allocated.
//! - **CopyOnGrow:** a failed growth leaves the array untouched (strong).
//! - **MoveOrAbandon:** a failed growth leaves the array empty (basic).
//!
//! Allocation failures are always strong: nothing has been moved yet.
//! Shifting inside [`DynamicArray::insert`] and [`DynamicArray::erase`]
//! gives only the basic guarantee for fallible-move element types.
//!
//! This crate is one of two that may contain `unsafe` code (along with
//! `tessera-raw`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
pub mod cmp;
pub mod element;
pub mod iter;
pub mod relocate;

// Public re-exports for the primary API surface.
pub use array::DynamicArray;
pub use element::{Element, TryClone, TryMove};
pub use iter::IntoIter;
pub use relocate::{CopyOnGrow, Guarantee, MoveOrAbandon, NoThrowMove, Relocation};
pub use tessera_core::{AllocError, ArrayError, ConfigError, GrowthConfig, IndexError};
pub use tessera_raw::RawBuffer;

/// Build a [`DynamicArray`], like `vec!`.
///
/// `darray![v; n]` copies `v` into `n` slots; `darray![a, b, c]` moves the
/// listed values in. Both forms evaluate to a `Result`, since allocation or
/// an element copy may fail.
///
/// ```
/// use tessera_array::darray;
///
/// let filled = darray![7u8; 3].unwrap();
/// assert_eq!(filled, [7, 7, 7]);
///
/// let listed = darray!["a", "b"].unwrap();
/// assert_eq!(listed.len(), 2);
/// ```
#[macro_export]
macro_rules! darray {
    () => {
        ::core::result::Result::<_, $crate::ArrayError<_>>::Ok($crate::DynamicArray::new())
    };
    ($value:expr; $len:expr) => {
        $crate::DynamicArray::from_elem($len, &$value)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::DynamicArray::try_from_iter([$($value),+])
    };
}
