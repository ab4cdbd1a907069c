//! The raw storage owner.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tessera_core::AllocError;

/// A block of uninitialized memory sized and aligned for `capacity`
/// values of `T`.
///
/// A `RawBuffer` owns its block exclusively and frees it exactly once when
/// dropped. It never constructs, reads, or drops a `T`: writing values into
/// slots and destroying them again is the caller's job, and any value still
/// in a slot when the buffer is dropped is forgotten, not dropped.
///
/// Capacity 0 allocates nothing. Zero-sized `T` never allocates either; the
/// buffer simply records the requested capacity.
pub struct RawBuffer<T> {
    /// Start of the block. Dangling (but aligned) when nothing is allocated.
    ptr: NonNull<T>,
    /// Number of element slots in the block.
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: a RawBuffer<T> is an owned allocation that may hold `T`s; sending
// or sharing it is sound exactly when sending or sharing those `T`s is.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: see above; `&RawBuffer<T>` only hands out raw pointers.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty buffer: capacity 0, no block.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocate an uninitialized block for `capacity` elements.
    ///
    /// Returns [`AllocError::CapacityOverflow`] if the byte size of the block
    /// does not fit in `isize`, and [`AllocError::OutOfMemory`] if the
    /// global allocator refuses the request. Failures are never retried.
    pub fn allocate(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        if Self::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        let layout = Self::layout_for(capacity)?;
        // SAFETY: `layout` has a non-zero size because `capacity > 0` and
        // `T` is not zero-sized.
        let block = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(block.cast::<T>()).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
            align: layout.align(),
        })?;

        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    fn layout_for(capacity: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow {
            requested: capacity,
        })
    }

    /// Number of element slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this buffer owns a block from the allocator.
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0 && !Self::IS_ZST
    }

    /// Pointer to slot 0. Dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to slot 0. Dangling when nothing is allocated.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `index`.
    ///
    /// Performs no bounds enforcement beyond a debug assertion and says
    /// nothing about whether the slot holds a live value. `index ==
    /// capacity` (one past the end) is a valid address to compute.
    pub fn slot(&self, index: usize) -> *mut T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} past capacity {}",
            self.capacity
        );
        self.ptr.as_ptr().wrapping_add(index)
    }

    /// Move the block out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Exchange blocks with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Size of the owned block in bytes.
    pub fn memory_bytes(&self) -> usize {
        if Self::IS_ZST {
            0
        } else {
            self.capacity * mem::size_of::<T>()
        }
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }
        // The layout was validated when the block was allocated.
        if let Ok(layout) = Self::layout_for(self.capacity) {
            // SAFETY: `ptr` came from `alloc::alloc` with exactly this layout
            // and ownership is exclusive, so this is the only free.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("capacity", &self.capacity)
            .field("allocated", &self.is_allocated())
            .finish()
    }
}
