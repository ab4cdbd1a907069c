//! Element capabilities: what an array may do with the values it stores.
//!
//! Rust moves are bitwise and cannot fail, which is exactly what
//! [`NoThrowMove`] relies on. Element types that model a move or copy
//! that *can* fail (handles that must re-register somewhere, values whose
//! duplication acquires a resource) say so through [`TryMove`] and
//! [`TryClone`], and pick the matching relocation policy:
//!
//! | Policy | Requires | Growth guarantee |
//! |--------|----------|------------------|
//! | [`NoThrowMove`] | nothing | no-throw |
//! | [`CopyOnGrow`] | `TryMove + TryClone` | strong |
//! | [`MoveOrAbandon`] | `TryMove` | basic |
//!
//! [`CopyOnGrow`]: crate::CopyOnGrow
//! [`MoveOrAbandon`]: crate::MoveOrAbandon

use std::convert::Infallible;
use std::rc::Rc;
use std::sync::Arc;

use crate::relocate::{NoThrowMove, Relocation};

/// A type that can be stored in a [`DynamicArray`](crate::DynamicArray).
///
/// The relocation policy is fixed per type at compile time; the array never
/// branches on it at run time.
pub trait Element: Sized {
    /// Failure raised by this type's own construction, copy, or move.
    ///
    /// `Infallible` for ordinary Rust values.
    type Error;

    /// How live values are carried into a new buffer and shifted in place.
    type Relocation: Relocation<Self>;
}

/// Move construction and move assignment that may fail.
///
/// A moved-from value stays live: it is destroyed later like any other
/// value, so implementations must leave it in a valid (typically empty)
/// state.
pub trait TryMove: Element {
    /// Move-construct a new value out of `src`.
    ///
    /// On `Err`, `src` must still hold a valid value.
    fn try_move_from(src: &mut Self) -> Result<Self, Self::Error>;

    /// Move-assign `src` into `self`, destroying the previous value of
    /// `self`.
    ///
    /// On `Err`, both `self` and `src` must still hold valid values.
    fn try_move_assign(&mut self, src: &mut Self) -> Result<(), Self::Error> {
        *self = Self::try_move_from(src)?;
        Ok(())
    }
}

/// Copy construction that may fail.
pub trait TryClone: Element {
    /// Produce an independent copy of `self`.
    fn try_clone(&self) -> Result<Self, Self::Error>;
}

/// Implement [`Element`] (with [`NoThrowMove`]) and [`TryClone`] (through
/// `Clone`) for ordinary types.
///
/// ```
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// tessera_array::impl_element!(Point);
///
/// let mut points = tessera_array::DynamicArray::new();
/// points.push_back(Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(points.len(), 1);
/// ```
#[macro_export]
macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Element for $ty {
                type Error = ::core::convert::Infallible;
                type Relocation = $crate::NoThrowMove;
            }

            impl $crate::TryClone for $ty {
                fn try_clone(&self) -> ::core::result::Result<Self, Self::Error> {
                    ::core::result::Result::Ok(::core::clone::Clone::clone(self))
                }
            }
        )*
    };
}

impl_element!(
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    bool,
    char,
    (),
    String,
    &'static str,
);

impl<T: ?Sized> Element for Box<T> {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl<T: ?Sized> TryClone for Box<T>
where
    Box<T>: Clone,
{
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(self.clone())
    }
}

impl<T> Element for Option<T> {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl<T: Clone> TryClone for Option<T> {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(self.clone())
    }
}

impl<T> Element for Vec<T> {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl<T: Clone> TryClone for Vec<T> {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(self.clone())
    }
}

impl<T: ?Sized> Element for Rc<T> {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl<T: ?Sized> TryClone for Rc<T> {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(Rc::clone(self))
    }
}

impl<T: ?Sized> Element for Arc<T> {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl<T: ?Sized> TryClone for Arc<T> {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Ok(Arc::clone(self))
    }
}
