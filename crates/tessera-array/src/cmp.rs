//! Equality, lexicographic ordering, hashing and formatting.
//!
//! Ordering is built from the element type's `<` alone: `a > b` is `b < a`,
//! `a <= b` is `!(b < a)` and `a >= b` is `!(a < b)`. Elements never need
//! a total order, and a type whose `<` is all it offers still orders
//! arrays of itself consistently.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::array::DynamicArray;

/// Lexicographic `a < b` using only `A < B` and `B < A`.
///
/// Walks the common prefix; the first pair where one side is less decides.
/// A strict prefix is less than the longer sequence.
fn less<A, B>(a: &[A], b: &[B]) -> bool
where
    A: PartialOrd<B>,
    B: PartialOrd<A>,
{
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return true;
        }
        if y < x {
            return false;
        }
    }
    a.len() < b.len()
}

impl<T, U> PartialEq<DynamicArray<U>> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T, U> PartialEq<[U]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
    /// `Some` whenever one side is less or the two are equal; `None` for
    /// arrays the element order cannot rank (for example ones holding NaN).
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if less(self.as_slice(), other.as_slice()) {
            Some(Ordering::Less)
        } else if less(other.as_slice(), self.as_slice()) {
            Some(Ordering::Greater)
        } else if self == other {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    fn lt(&self, other: &Self) -> bool {
        less(self.as_slice(), other.as_slice())
    }

    fn gt(&self, other: &Self) -> bool {
        less(other.as_slice(), self.as_slice())
    }

    fn le(&self, other: &Self) -> bool {
        !less(other.as_slice(), self.as_slice())
    }

    fn ge(&self, other: &Self) -> bool {
        !less(self.as_slice(), other.as_slice())
    }
}

impl<T: Ord> Ord for DynamicArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
