//! Dispatch engine and program loading.
//!
//! Provides the loop that finds, builds, links and runs translation blocks, and
//! the loader that places guest images in memory.

/// Block dispatcher.
pub mod engine;

/// Raw and ELF image loading.
pub mod loader;

pub use engine::{Engine, StopReason};
pub use loader::{LoadedImage, load_image};
