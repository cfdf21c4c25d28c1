//! Asset loading
//!
//! The renderer only needs raw bytes (SPIR-V) from storage; this module
//! provides the loader seam and a filesystem implementation.

mod loader;

pub use loader::{ResourceLoader, FsResourceLoader};
