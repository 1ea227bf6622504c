#![no_std] // The interpreter and its records need nothing beyond alloc

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod attributes;
pub mod model;

// Re-export core types for convenience
pub use attributes::Attributes;
pub use model::*;
