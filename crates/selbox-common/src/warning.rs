//! Sandbox warnings with colored terminal output.
//!
//! Provides deduplication so a pass that hits the same recovery on every
//! keystroke does not spam stderr. Used by the renderer for parse recoveries
//! and by the host session for selector-generation failures.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still recorded but never printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Warn about a recovered condition (prints once per unique message).
///
/// A poisoned lock is recovered; the set stays valid after any panic.
///
/// # Example
/// ```ignore
/// warn_once("HTML", "ignored stray end tag </div>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[selbox {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (called at the start of every pass).
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Silence (or re-enable) printing for the whole process.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The warning set is process-wide, so everything touching it lives in
    // this one test.
    #[test]
    fn test_warnings_deduplicate_until_cleared() {
        set_quiet(true);
        clear_warnings();
        assert_eq!(warning_count(), 0);

        warn_once("HTML", "ignored stray end tag </div>");
        warn_once("HTML", "ignored stray end tag </div>");
        warn_once("SELECT", "ignored stray end tag </div>");
        assert_eq!(warning_count(), 2);

        clear_warnings();
        assert_eq!(warning_count(), 0);
        warn_once("HTML", "ignored stray end tag </div>");
        assert_eq!(warning_count(), 1);
        clear_warnings();
    }
}
