//! Common utilities for the Larch DOM core.
//!
//! This crate provides shared infrastructure used by the DOM and its tools:
//! - **Warning System** - deduplicated warnings for unsupported selector and
//!   markup features, routed through `tracing`

pub mod warning;

pub use warning::{clear_warnings, warn_once};
