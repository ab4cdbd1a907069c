//! Owned, aligned, uninitialized element storage.
//!
//! [`RawBuffer`] is the bottom layer of Tessera: it pairs a block from the
//! global allocator with the number of element slots it can hold. It has
//! no notion of which slots contain live values; that bookkeeping belongs
//! to the container built on top of it.
//!
//! This crate is one of two that may contain `unsafe` code (along with
//! `tessera-array`). Every `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod buffer;

pub use buffer::RawBuffer;
pub use tessera_core::AllocError;
