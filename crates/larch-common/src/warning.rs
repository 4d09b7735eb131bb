//! Deduplicated warnings for unsupported features.
//!
//! The selector engine sees the same selector strings over and over (a page
//! stylesheet is re-queried on every restyle), so an unsupported pseudo-class
//! would otherwise be reported thousands of times. Each distinct
//! `(component, message)` pair is emitted once per process.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message).
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// warning was already reported earlier.
///
/// # Example
/// ```
/// use larch_common::warn_once;
///
/// let first = warn_once("Selector", "unsupported pseudo-class ':hover'");
/// let second = warn_once("Selector", "unsupported pseudo-class ':hover'");
/// assert!(first);
/// assert!(!second);
/// ```
#[must_use]
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call when loading a new page).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
