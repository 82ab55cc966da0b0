//! Idempotent header mutation.
//!
//! `set_or_clear` is the single write path used by every response stage.
//! It scans the whole list once and leaves at most one active entry for the
//! target name, whatever state the list was in before the call.

use crate::headers::list::{HeaderEntry, HeaderError, HeaderList};

/// What a call to [`set_or_clear`] did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// A new entry was appended (no existing entry carried the name).
    pub appended: bool,
    /// Later duplicates that were forcibly deactivated.
    pub collapsed: usize,
}

/// Set `name` to `value`, or suppress it when `value` is empty.
///
/// - The first entry matching `name` (case-insensitive, active or not) is
///   rewritten in place; it becomes active only if `value` is non-empty.
/// - Every later match is deactivated and its value cleared.
/// - With no match, a new entry is appended. An empty `value` still appends
///   an inactive placeholder, which the serializer uses to suppress built-in
///   headers such as `Server`.
///
/// Fails only when a new slot cannot be obtained.
pub fn set_or_clear(list: &mut HeaderList, name: &str, value: &str) -> Result<Mutation, HeaderError> {
    debug_assert!(!name.is_empty(), "header name must not be empty");

    let key = name.to_ascii_lowercase();
    let mut found = false;
    let mut collapsed = 0;

    for entry in list.iter_mut() {
        if entry.lowcase_name() != key {
            continue;
        }

        if found {
            if entry.is_active() {
                collapsed += 1;
            }
            entry.deactivate();
        } else {
            found = true;
            entry.overwrite(name, value);
        }
    }

    if !found {
        list.push(HeaderEntry::with_state(name, value, !value.is_empty()))?;
    }

    tracing::trace!(
        header = %name,
        value = %value,
        appended = !found,
        collapsed,
        "Header mutated"
    );

    Ok(Mutation {
        appended: !found,
        collapsed,
    })
}
