//! Deduplicated warnings with colored terminal output.
//!
//! Layout and rendering report recoverable oddities (a missing font variant,
//! a fallback face, an image that could not be decoded) here instead of
//! failing. Each distinct message is printed once per process.

use owo_colors::OwoColorize;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable condition (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("fonts", "no bold italic monospace face, using bold monospace");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[whynot {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when loading a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(key: &str) -> usize {
        WARNED
            .lock()
            .unwrap()
            .as_ref()
            .map_or(0, |set| set.iter().filter(|k| k.as_str() == key).count())
    }

    #[test]
    fn test_warn_once_records_each_message_once() {
        let message = "unit-test warning that nobody else emits";
        let key = format!("[test] {message}");
        warn_once("test", message);
        warn_once("test", message);
        assert_eq!(recorded(&key), 1);
        warn_once("other", message);
        assert_eq!(recorded(&format!("[other] {message}")), 1);
    }
}
