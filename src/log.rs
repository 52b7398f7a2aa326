//! Logging macros for the object walk.
//!
//! The decoder traces each skipped or unknown record, the renderer the
//! computed viewport, and font table entries, tagged objects and per-object
//! diagnostics as they are met. With the `tracing` feature these are
//! `tracing` events; without it the macros expand to nothing.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
