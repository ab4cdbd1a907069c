//! Core types for the Tessera containers.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the raw storage layer and the growable array:
//! allocation, bounds and element failures, and the growth configuration
//! that drives amortized append.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use config::GrowthConfig;
pub use error::{AllocError, ArrayError, ConfigError, IndexError};
