//! The growable array.
//!
//! [`DynamicArray`] owns exactly one [`RawBuffer`] and tracks how many
//! leading slots hold live values. Everything else follows from that one
//! invariant: slots `[0, len)` are live, slots `[len, capacity)` are not.

use std::alloc::{handle_alloc_error, Layout};
use std::any::type_name;
use std::convert::Infallible;
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use tessera_core::{AllocError, ArrayError, GrowthConfig, IndexError};
use tessera_raw::RawBuffer;
use tracing::{debug, trace, warn};

use crate::element::{Element, TryClone};
use crate::relocate::{Guarantee, Relocation};

/// A contiguous, growable sequence of `T` with value semantics.
///
/// Capacity grows geometrically on append (see [`GrowthConfig`]), so a
/// sequence of [`push_back`](Self::push_back) calls is amortized O(1).
/// Every operation that grows the buffer carries the values across with
/// the element type's [`Relocation`] policy, which fixes what a failed
/// element copy or move leaves behind.
///
/// Element references and borrowing iterators borrow the array, so the
/// borrow checker rejects holding one across an operation that reallocates
/// or shifts.
pub struct DynamicArray<T> {
    /// Backing storage. Slots `[0, len)` are live.
    buf: RawBuffer<T>,
    /// Number of live values.
    len: usize,
    /// Capacity policy for appends and inserts.
    growth: GrowthConfig,
}

impl<T> DynamicArray<T> {
    /// An empty array. Never allocates.
    pub const fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
            growth: GrowthConfig::DEFAULT,
        }
    }

    /// An empty array that grows according to `growth`.
    pub const fn with_growth(growth: GrowthConfig) -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
            growth,
        }
    }

    /// An empty array with room for exactly `capacity` values.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            buf: RawBuffer::allocate(capacity)?,
            len: 0,
            growth: GrowthConfig::DEFAULT,
        })
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots in the current buffer.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The growth configuration used when the array is full.
    pub fn growth(&self) -> GrowthConfig {
        self.growth
    }

    /// Size of the backing buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.buf.memory_bytes()
    }

    /// Pointer to the first slot. Dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable pointer to the first slot. Dangling when nothing is allocated.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// The live values as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is live and the pointer is non-null and aligned
        // even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live values as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Checked access: `Err` when `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T, IndexError> {
        let len = self.len;
        self.as_slice().get(index).ok_or(IndexError { index, len })
    }

    /// Checked mutable access: `Err` when `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(IndexError { index, len })
    }

    /// The first value, or `None` if empty.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The first value, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// The last value, or `None` if empty.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The last value, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Remove and return the last value.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside `[0, len)`, so its
        // value is read out exactly once.
        Some(unsafe { ptr::read(self.buf.slot(self.len)) })
    }

    /// Destroy the values in `[new_len, len)`. No-op if `new_len >= len`.
    ///
    /// Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.buf.slot(new_len), self.len - new_len);
        // Shrink first so a panicking destructor cannot cause a second drop.
        self.len = new_len;
        // SAFETY: `tail` covers the previously live `[new_len, old_len)`.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Destroy every value. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchange contents (buffer, length and growth configuration) with
    /// `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move the contents out, leaving `self` empty with no buffer.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Hand the buffer (and the values in it) to the caller.
    ///
    /// The array is left empty without dropping anything, so the caller
    /// owns whatever was live in `[0, len)`.
    pub(crate) fn take_buffer(&mut self) -> RawBuffer<T> {
        self.len = 0;
        self.buf.take()
    }

    /// Append without a capacity check.
    ///
    /// # Safety
    ///
    /// `len < capacity`.
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: caller guarantees the slot is within the allocation; it is
        // not live because it lies at `len`.
        unsafe { self.buf.slot(self.len).write(value) };
        self.len += 1;
    }
}

impl<T: Element> DynamicArray<T> {
    /// Build an array from `values`, moved in order.
    ///
    /// Exact-size iterators get exactly the capacity they need.
    pub fn try_from_iter<I>(values: I) -> Result<Self, ArrayError<T::Error>>
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let (lower, _) = values.size_hint();
        let mut array = Self::with_capacity(lower)?;
        for value in values {
            array.push_back(value)?;
        }
        Ok(array)
    }

    /// Ensure capacity for `new_capacity` values in total.
    ///
    /// No-op when `new_capacity <= capacity`. Otherwise allocates exactly
    /// `new_capacity` slots and relocates the live values. The length and
    /// the values themselves never change on success.
    ///
    /// Failure safety follows `T::Relocation`: allocation failures and
    /// [`CopyOnGrow`](crate::CopyOnGrow) copy failures leave the array
    /// untouched; a [`MoveOrAbandon`](crate::MoveOrAbandon) move failure
    /// leaves it empty.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), ArrayError<T::Error>> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.reallocate(new_capacity)
    }

    /// Shrink the buffer to exactly `len` slots.
    ///
    /// Skipped when already exact. An empty array releases its buffer.
    /// Same failure safety as [`reserve`](Self::reserve).
    pub fn shrink_to_fit(&mut self) -> Result<(), ArrayError<T::Error>> {
        if self.capacity() == self.len {
            return Ok(());
        }
        if self.len == 0 {
            trace!(
                element = type_name::<T>(),
                capacity = self.capacity(),
                "releasing empty buffer"
            );
            self.buf = RawBuffer::new();
            return Ok(());
        }
        self.reallocate(self.len)
    }

    /// Append `value`, growing the buffer if it is full.
    ///
    /// If growth fails, `value` is dropped and the array is left as
    /// described for [`reserve`](Self::reserve).
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError<T::Error>> {
        self.grow_for_one()?;
        // SAFETY: `grow_for_one` left at least one free slot.
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Construct a value with `make` and append it.
    ///
    /// `make` runs before any growth, so a failed construction leaves the
    /// array untouched.
    pub fn emplace_back<F>(&mut self, make: F) -> Result<(), ArrayError<T::Error>>
    where
        F: FnOnce() -> Result<T, T::Error>,
    {
        let value = make().map_err(ArrayError::Element)?;
        self.push_back(value)
    }

    /// Insert `value` at `index`, shifting later values one slot right.
    ///
    /// `index` may equal `len` (append). Growth follows
    /// [`reserve`](Self::reserve). Shifting with a fallible move gives only
    /// the basic guarantee: if a move fails partway, every value is still
    /// live and owned by the array, but their order is unspecified and
    /// `len` may have grown by one.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), ArrayError<T::Error>> {
        if index > self.len {
            return Err(ArrayError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.grow_for_one()?;
        let base = self.buf.as_mut_ptr();
        // SAFETY: `[0, len)` is live, slot `len` is within the allocation
        // after `grow_for_one`, and `index <= len`.
        unsafe { T::Relocation::insert(base, index, &mut self.len, value) }
            .map_err(ArrayError::Element)
    }

    /// Construct a value with `make` and insert it at `index`.
    ///
    /// The position is checked and `make` runs before anything else
    /// happens; see [`insert`](Self::insert) for the rest.
    pub fn emplace<F>(&mut self, index: usize, make: F) -> Result<(), ArrayError<T::Error>>
    where
        F: FnOnce() -> Result<T, T::Error>,
    {
        if index > self.len {
            return Err(ArrayError::OutOfRange {
                index,
                len: self.len,
            });
        }
        let value = make().map_err(ArrayError::Element)?;
        self.insert(index, value)
    }

    /// Destroy the value at `index`, shifting later values one slot left.
    ///
    /// Same basic-guarantee caveat as [`insert`](Self::insert) when a
    /// fallible move fails during the shift; `len` is then unchanged.
    pub fn erase(&mut self, index: usize) -> Result<(), ArrayError<T::Error>> {
        if index >= self.len {
            return Err(ArrayError::OutOfRange {
                index,
                len: self.len,
            });
        }
        let base = self.buf.as_mut_ptr();
        // SAFETY: `[0, len)` is live and `index < len`.
        unsafe { T::Relocation::erase(base, index, &mut self.len) }.map_err(ArrayError::Element)
    }

    /// Resize to `new_len`, constructing new values with `make`.
    ///
    /// Shrinking destroys `[new_len, len)`. Growing reserves exactly
    /// `new_len` slots, then constructs values one at a time; if `make`
    /// fails, the values constructed so far are kept and the error is
    /// returned.
    pub fn resize_with<F>(&mut self, new_len: usize, mut make: F) -> Result<(), ArrayError<T::Error>>
    where
        F: FnMut() -> Result<T, T::Error>,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        while self.len < new_len {
            let value = make().map_err(ArrayError::Element)?;
            // SAFETY: `len < new_len <= capacity`.
            unsafe { self.push_unchecked(value) };
        }
        Ok(())
    }

    /// Append every value from `values`, in order.
    ///
    /// Stops at the first failure; values appended before it stay.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), ArrayError<T::Error>>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Replace the contents with `values`.
    ///
    /// The replacement is built completely before the old contents are
    /// destroyed, so a failure leaves the array untouched.
    pub fn assign_iter<I>(&mut self, values: I) -> Result<(), ArrayError<T::Error>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut fresh = Self::try_from_iter(values)?;
        fresh.growth = self.growth;
        self.swap(&mut fresh);
        Ok(())
    }

    fn grow_for_one(&mut self) -> Result<(), ArrayError<T::Error>> {
        if self.len < self.capacity() {
            return Ok(());
        }
        let next = self.growth.next_capacity(self.capacity())?;
        self.reallocate(next)
    }

    /// Move the live values into a new buffer of exactly `new_capacity`.
    fn reallocate(&mut self, new_capacity: usize) -> Result<(), ArrayError<T::Error>> {
        debug_assert!(new_capacity >= self.len);
        let mut fresh = RawBuffer::allocate(new_capacity)?;
        let len = self.len;
        debug!(
            element = type_name::<T>(),
            len,
            old_capacity = self.capacity(),
            new_capacity,
            "reallocating"
        );

        // SAFETY: `[0, len)` of the current buffer is live, `fresh` holds
        // `new_capacity >= len` unused slots, and the blocks are distinct.
        let moved =
            unsafe { T::Relocation::relocate(self.buf.as_mut_ptr(), fresh.as_mut_ptr(), len) };
        if let Err(err) = moved {
            let guarantee = T::Relocation::GUARANTEE;
            warn!(element = type_name::<T>(), len, ?guarantee, "relocation failed");
            if guarantee == Guarantee::Basic {
                self.abandon();
            }
            return Err(ArrayError::Element(err));
        }

        self.buf.swap(&mut fresh);
        if T::Relocation::LEAVES_SOURCE_LIVE {
            // SAFETY: `fresh` now holds the old block, whose first `len`
            // slots are live and no longer counted by `self`.
            unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(fresh.as_mut_ptr(), len)) };
        }
        Ok(())
    }

    fn abandon(&mut self) {
        warn!(
            element = type_name::<T>(),
            discarded = self.len,
            "discarding contents after a failed move"
        );
        self.clear();
    }
}

impl<T: Element + Default> DynamicArray<T> {
    /// An array of `len` default values, with exactly that capacity.
    pub fn with_len(len: usize) -> Result<Self, ArrayError<T::Error>> {
        let mut array = Self::with_capacity(len)?;
        array.resize(len)?;
        Ok(array)
    }

    /// Resize to `new_len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize) -> Result<(), ArrayError<T::Error>> {
        self.resize_with(new_len, || Ok(T::default()))
    }
}

impl<T: TryClone> DynamicArray<T> {
    /// An array of `len` copies of `value`, with exactly that capacity.
    ///
    /// If a copy fails, the copies made so far are destroyed and the
    /// buffer is freed.
    pub fn from_elem(len: usize, value: &T) -> Result<Self, ArrayError<T::Error>> {
        let mut array = Self::with_capacity(len)?;
        array.resize_with(len, || value.try_clone())?;
        Ok(array)
    }

    /// An array holding copies of `values`, in order, with exactly that
    /// capacity.
    pub fn from_slice(values: &[T]) -> Result<Self, ArrayError<T::Error>> {
        let mut array = Self::with_capacity(values.len())?;
        for value in values {
            let copy = value.try_clone().map_err(ArrayError::Element)?;
            // SAFETY: capacity is `values.len()` and at most that many
            // values are appended.
            unsafe { array.push_unchecked(copy) };
        }
        Ok(array)
    }

    /// An independent copy with capacity equal to `len`.
    ///
    /// `self` is never modified. If an element copy fails, every partial
    /// copy is destroyed and the new buffer freed.
    pub fn try_clone(&self) -> Result<Self, ArrayError<T::Error>> {
        let mut copy = Self::from_slice(self.as_slice())?;
        copy.growth = self.growth;
        Ok(copy)
    }

    /// Replace the contents with a copy of `other`.
    ///
    /// The copy is complete before the old contents are destroyed, so a
    /// failure leaves `self` untouched.
    pub fn assign_from(&mut self, other: &Self) -> Result<(), ArrayError<T::Error>> {
        let mut copy = other.try_clone()?;
        self.swap(&mut copy);
        Ok(())
    }

    /// Replace the contents with `len` copies of `value`.
    ///
    /// Built completely before the old contents are destroyed.
    pub fn assign_fill(&mut self, len: usize, value: &T) -> Result<(), ArrayError<T::Error>> {
        let mut fresh = Self::from_elem(len, value)?;
        fresh.growth = self.growth;
        self.swap(&mut fresh);
        Ok(())
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        let live = ptr::slice_from_raw_parts_mut(self.buf.as_mut_ptr(), self.len);
        // SAFETY: `[0, len)` is live; the buffer frees itself afterwards.
        unsafe { ptr::drop_in_place(live) };
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

/// Unchecked-style indexing: panics when out of bounds, like a slice.
/// Use [`DynamicArray::at`] for a checked lookup.
impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: TryClone<Error = Infallible>> Clone for DynamicArray<T> {
    /// Copies every element. Out-of-memory goes to the global allocation
    /// error handler, as with the standard collections.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(ArrayError::Element(never)) => match never {},
            Err(ArrayError::Alloc(AllocError::OutOfMemory { bytes, align })) => {
                match Layout::from_size_align(bytes, align) {
                    Ok(layout) => handle_alloc_error(layout),
                    Err(_) => panic!("clone of {} failed: out of memory", type_name::<Self>()),
                }
            }
            Err(err) => panic!("clone of {} failed: {err}", type_name::<Self>()),
        }
    }
}

impl<T: Element> Element for DynamicArray<T> {
    type Error = ArrayError<T::Error>;
    type Relocation = crate::relocate::NoThrowMove;
}

impl<T: TryClone> TryClone for DynamicArray<T> {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        DynamicArray::try_clone(self)
    }
}
