//! Deduplicated warnings.
//!
//! Repeated delegation calls tend to hit the same questionable input over and
//! over (a handler bound to a selector runs on every click), so each unique
//! message is reported once. Messages go to `tracing` at `WARN` level under
//! the `rebubble` target; installing a subscriber is the caller's business.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about questionable input (emits once per unique message)
///
/// # Example
/// ```
/// use rebubble_common::warning::{has_warned, warn_once};
///
/// warn_once("Selector", "doubled space in \"ul  li\"");
/// assert!(has_warned("Selector", "doubled space in \"ul  li\""));
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_emit {
        tracing::warn!(target: "rebubble", component, "{message}");
    }
}

/// Whether `warn_once` has already reported this component/message pair.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Forget every warning emitted so far, so each may be reported again.
///
/// Long-running hosts can call this periodically to keep the dedup set
/// from growing with every distinct message.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
