//! Relocation policies: carrying live values into a new buffer and shifting
//! them within one.
//!
//! Every operation here works on raw slots and states its liveness
//! contract precisely. The array owns the bookkeeping (`len`); a policy
//! only promises which slots are live when it returns, whether it returns
//! `Ok`, `Err`, or unwinds.

use std::ptr;

use crate::element::{Element, TryClone, TryMove};

/// The failure-safety level a policy gives to capacity growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Guarantee {
    /// Growth cannot fail once the new buffer is allocated.
    NoThrow,
    /// A failed growth leaves the array exactly as it was.
    Strong,
    /// A failed growth leaves the array valid but empty.
    Basic,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::NoThrowMove {}
    impl Sealed for super::CopyOnGrow {}
    impl Sealed for super::MoveOrAbandon {}
}

/// A relocation policy for element type `T`.
///
/// Sealed: the three policies in this module are the only implementations.
/// Pick one through [`Element::Relocation`].
pub trait Relocation<T: Element>: sealed::Sealed {
    /// What a failed growth leaves behind.
    const GUARANTEE: Guarantee;

    /// Whether the source slots still hold live values after a successful
    /// [`relocate`](Self::relocate), which the caller must then destroy.
    const LEAVES_SOURCE_LIVE: bool;

    /// Carry `len` live values from `src` into the uninitialized `dst`.
    ///
    /// On `Ok`, `dst[..len]` is live and `src[..len]` is live or dead as
    /// given by [`LEAVES_SOURCE_LIVE`](Self::LEAVES_SOURCE_LIVE). On `Err`
    /// or unwind, `dst[..len]` is dead and `src[..len]` is live.
    ///
    /// # Safety
    ///
    /// `src[..len]` must be live, `dst[..len]` must be valid for writes and
    /// hold nothing live, and the two ranges must not overlap.
    unsafe fn relocate(src: *mut T, dst: *mut T, len: usize) -> Result<(), T::Error>;

    /// Insert `value` at `index`, shifting `base[index..*len]` one slot right.
    ///
    /// On `Ok`, `*len` has grown by one and `base[..*len]` is live. On `Err`
    /// or unwind, `base[..*len]` is live (`*len` may have grown by one) in
    /// an unspecified order, and `value` has been dropped.
    ///
    /// # Safety
    ///
    /// `base[..*len]` must be live, slot `*len` must be within the
    /// allocation, and `index <= *len`.
    unsafe fn insert(base: *mut T, index: usize, len: &mut usize, value: T)
        -> Result<(), T::Error>;

    /// Destroy the value at `index`, shifting `base[index + 1..*len]` one
    /// slot left.
    ///
    /// On `Ok`, `*len` has shrunk by one and `base[..*len]` is live. On
    /// `Err`, `*len` is unchanged and `base[..*len]` is live in an
    /// unspecified order.
    ///
    /// # Safety
    ///
    /// `base[..*len]` must be live and `index < *len`.
    unsafe fn erase(base: *mut T, index: usize, len: &mut usize) -> Result<(), T::Error>;
}

/// Relocate with plain Rust moves. Growth and shifting never fail.
pub enum NoThrowMove {}

/// Relocate by copying during growth; shift with fallible moves.
///
/// A failed copy during growth destroys the copies made so far and leaves
/// the original buffer untouched.
pub enum CopyOnGrow {}

/// Relocate with fallible moves.
///
/// A failed move during growth destroys the values already moved into the
/// new buffer, and the array discards its remaining contents.
pub enum MoveOrAbandon {}

impl<T: Element> Relocation<T> for NoThrowMove {
    const GUARANTEE: Guarantee = Guarantee::NoThrow;
    const LEAVES_SOURCE_LIVE: bool = false;

    unsafe fn relocate(src: *mut T, dst: *mut T, len: usize) -> Result<(), T::Error> {
        // SAFETY: caller guarantees both ranges are valid and disjoint.
        unsafe { ptr::copy_nonoverlapping(src, dst, len) };
        Ok(())
    }

    unsafe fn insert(
        base: *mut T,
        index: usize,
        len: &mut usize,
        value: T,
    ) -> Result<(), T::Error> {
        let end = *len;
        // SAFETY: `base[index..end]` is live and slot `end` is in the
        // allocation, so the shifted range stays in bounds. Nothing here can
        // panic between the copy and the write.
        unsafe {
            ptr::copy(base.add(index), base.add(index + 1), end - index);
            base.add(index).write(value);
        }
        *len = end + 1;
        Ok(())
    }

    unsafe fn erase(base: *mut T, index: usize, len: &mut usize) -> Result<(), T::Error> {
        let end = *len;
        // SAFETY: `index < end`, so the value is live; it is moved out before
        // the tail closes over its slot.
        let removed = unsafe { ptr::read(base.add(index)) };
        // SAFETY: `base[index + 1..end]` is live and the destination range
        // stays within `base[..end]`.
        unsafe { ptr::copy(base.add(index + 1), base.add(index), end - index - 1) };
        *len = end - 1;
        drop(removed);
        Ok(())
    }
}

impl<T: TryMove + TryClone> Relocation<T> for CopyOnGrow {
    const GUARANTEE: Guarantee = Guarantee::Strong;
    const LEAVES_SOURCE_LIVE: bool = true;

    unsafe fn relocate(src: *mut T, dst: *mut T, len: usize) -> Result<(), T::Error> {
        let mut built = Built::new(dst);
        for i in 0..len {
            // SAFETY: `src[i]` is live per the caller's contract.
            let copy = unsafe { (*src.add(i)).try_clone()? };
            // SAFETY: `dst[i]` is valid for writes and not yet live.
            unsafe { dst.add(i).write(copy) };
            built.count += 1;
        }
        built.keep();
        Ok(())
    }

    unsafe fn insert(
        base: *mut T,
        index: usize,
        len: &mut usize,
        value: T,
    ) -> Result<(), T::Error> {
        // SAFETY: forwarded caller contract.
        unsafe { shift_insert(base, index, len, value) }
    }

    unsafe fn erase(base: *mut T, index: usize, len: &mut usize) -> Result<(), T::Error> {
        // SAFETY: forwarded caller contract.
        unsafe { shift_erase(base, index, len) }
    }
}

impl<T: TryMove> Relocation<T> for MoveOrAbandon {
    const GUARANTEE: Guarantee = Guarantee::Basic;
    const LEAVES_SOURCE_LIVE: bool = true;

    unsafe fn relocate(src: *mut T, dst: *mut T, len: usize) -> Result<(), T::Error> {
        let mut built = Built::new(dst);
        for i in 0..len {
            // SAFETY: `src[i]` is live and not aliased by any other reference.
            let moved = unsafe { T::try_move_from(&mut *src.add(i))? };
            // SAFETY: `dst[i]` is valid for writes and not yet live.
            unsafe { dst.add(i).write(moved) };
            built.count += 1;
        }
        built.keep();
        Ok(())
    }

    unsafe fn insert(
        base: *mut T,
        index: usize,
        len: &mut usize,
        value: T,
    ) -> Result<(), T::Error> {
        // SAFETY: forwarded caller contract.
        unsafe { shift_insert(base, index, len, value) }
    }

    unsafe fn erase(base: *mut T, index: usize, len: &mut usize) -> Result<(), T::Error> {
        // SAFETY: forwarded caller contract.
        unsafe { shift_erase(base, index, len) }
    }
}

/// Values constructed so far in a destination range. Dropping it destroys
/// them, which covers both the `Err` and the unwind path.
struct Built<T> {
    dst: *mut T,
    count: usize,
}

impl<T> Built<T> {
    fn new(dst: *mut T) -> Self {
        Self { dst, count: 0 }
    }

    /// The destination range is complete; hand it over without dropping.
    fn keep(mut self) {
        self.count = 0;
    }
}

impl<T> Drop for Built<T> {
    fn drop(&mut self) {
        // SAFETY: exactly `dst[..count]` was constructed by this guard's owner.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.dst, self.count)) };
    }
}

/// Open a slot at `index` using fallible moves, then fill it with `value`.
///
/// # Safety
///
/// Same contract as [`Relocation::insert`].
unsafe fn shift_insert<T: TryMove>(
    base: *mut T,
    index: usize,
    len: &mut usize,
    value: T,
) -> Result<(), T::Error> {
    let end = *len;
    if index == end {
        // SAFETY: slot `end` is in the allocation and not live.
        unsafe { base.add(end).write(value) };
        *len = end + 1;
        return Ok(());
    }

    // The last value is move-constructed into the free slot past the end.
    // SAFETY: `end > index >= 0`, so `base[end - 1]` is live.
    let last = unsafe { T::try_move_from(&mut *base.add(end - 1))? };
    // SAFETY: slot `end` is in the allocation and not live.
    unsafe { base.add(end).write(last) };
    *len = end + 1;

    // The rest is move-assigned one slot right, back to front.
    for i in (index + 1..end).rev() {
        // SAFETY: `i` and `i - 1` are distinct live slots below `end`.
        let (dst, src) = unsafe { (&mut *base.add(i), &mut *base.add(i - 1)) };
        dst.try_move_assign(src)?;
    }

    // `index` now holds a moved-from value: swap the new value in and
    // destroy the leftover only once every slot is accounted for.
    // SAFETY: `base[index]` is live.
    let stale = unsafe { ptr::replace(base.add(index), value) };
    drop(stale);
    Ok(())
}

/// Close the slot at `index` using fallible move assignment.
///
/// # Safety
///
/// Same contract as [`Relocation::erase`].
unsafe fn shift_erase<T: TryMove>(
    base: *mut T,
    index: usize,
    len: &mut usize,
) -> Result<(), T::Error> {
    let end = *len;
    for i in index..end - 1 {
        // SAFETY: `i` and `i + 1` are distinct live slots below `end`.
        let (dst, src) = unsafe { (&mut *base.add(i), &mut *base.add(i + 1)) };
        dst.try_move_assign(src)?;
    }
    *len = end - 1;
    // SAFETY: the last slot is live and already excluded from `*len`, so a
    // panicking destructor cannot lead to a second drop.
    unsafe { ptr::drop_in_place(base.add(end - 1)) };
    Ok(())
}
