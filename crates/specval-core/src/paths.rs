//! Path algebra for addressing values inside a model graph.
//!
//! A path is a `.` separated list of segments. A segment is either a name
//! (`Address`, `Street`) or a collection index marker: a bare `#` stands for
//! "some item, index not known yet" and `#7` for a concrete index.
//!
//! Relative paths (as authored with `with_path`) may start with a run of `<`
//! characters, each one moving a level up from the base path before the
//! remainder is appended.
//!
//! # Example
//!
//! ```
//! use specval_core::paths;
//!
//! assert_eq!(paths::resolve_path("a.b.c", "<x"), "a.b.x");
//! assert_eq!(paths::get_with_indexes("Items.#.Tags.#", &["2", "5"]), "Items.#5.Tags.#2");
//! assert_eq!(paths::get_without_indexes("Items.#5.Tags.#2"), "Items.#.Tags.#");
//! ```

use std::borrow::Cow;

/// Separator between path segments.
pub const DIVIDER: char = '.';

/// Prefix character of a relative path moving one level up.
pub const UPPER_LEVEL_POINTER: char = '<';

/// Prefix of a collection index segment.
pub const INDEX_PREFIX: char = '#';

/// Generic collection index marker (index not known).
pub const INDEX_MARKER: &str = "#";

/// Resolves `relative` against `base`.
///
/// - empty `relative` returns `base`;
/// - a leading run of `N` upward pointers climbs `N` levels from `base`
///   before appending the rest; climbing past the root yields the rest alone;
/// - otherwise `relative` is appended to `base` as a child.
#[must_use]
pub fn resolve_path(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }

    let ups = relative
        .chars()
        .take_while(|c| *c == UPPER_LEVEL_POINTER)
        .count();

    if ups > 0 {
        let core = &relative[ups..];
        let mut remaining = ups;

        for (i, c) in base.char_indices().rev() {
            if c != DIVIDER {
                continue;
            }
            remaining -= 1;
            if remaining == 0 {
                let prefix = &base[..i];
                return if core.is_empty() {
                    prefix.to_string()
                } else {
                    format!("{prefix}{DIVIDER}{core}")
                };
            }
        }

        return core.to_string();
    }

    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}{DIVIDER}{relative}")
    }
}

/// Returns true if the segment is a collection index (`#` or `#` + digits).
#[must_use]
pub fn is_index_segment(segment: &str) -> bool {
    segment
        .strip_prefix(INDEX_PREFIX)
        .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Builds a concrete index segment (`#3`).
#[must_use]
pub fn index_segment(index: usize) -> String {
    format!("{INDEX_PREFIX}{index}")
}

/// Replaces every concrete index segment with the generic marker.
#[must_use]
pub fn get_without_indexes(path: &str) -> Cow<'_, str> {
    if !path
        .split(DIVIDER)
        .any(|s| is_index_segment(s) && s != INDEX_MARKER)
    {
        return Cow::Borrowed(path);
    }

    let joined = path
        .split(DIVIDER)
        .map(|s| if is_index_segment(s) { INDEX_MARKER } else { s })
        .collect::<Vec<_>>()
        .join(".");

    Cow::Owned(joined)
}

/// Substitutes generic index markers with concrete indexes.
///
/// `indexes` is ordered innermost first: the rightmost marker receives the
/// innermost index that still applies. When the path has fewer markers than
/// there are indexes (the path was moved above some collections), the
/// innermost surplus indexes are skipped. Markers left without an index stay
/// generic. Already concrete segments are not touched.
#[must_use]
pub fn get_with_indexes<S: AsRef<str>>(path: &str, indexes: &[S]) -> String {
    if indexes.is_empty() {
        return path.to_string();
    }

    let mut segments: Vec<Cow<'_, str>> = path.split(DIVIDER).map(Cow::Borrowed).collect();
    let markers: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.as_ref() == INDEX_MARKER)
        .map(|(i, _)| i)
        .collect();

    if markers.is_empty() {
        return path.to_string();
    }

    let skip = indexes.len().saturating_sub(markers.len());

    for (nth, position) in markers.iter().rev().enumerate() {
        let Some(index) = indexes.get(skip + nth) else {
            break;
        };
        segments[*position] = Cow::Owned(format!("{INDEX_PREFIX}{}", index.as_ref()));
    }

    segments.join(".")
}

/// Returns true if the path contains at least one index segment.
#[must_use]
pub fn contains_indexes(path: &str) -> bool {
    path.split(DIVIDER).any(is_index_segment)
}

/// Counts index segments (generic or concrete) in the path.
#[must_use]
pub fn get_indexes_amount(path: &str) -> usize {
    path.split(DIVIDER).filter(|s| is_index_segment(s)).count()
}

/// Returns the last segment of the path, or the whole path without dividers.
#[must_use]
pub fn get_last_level(path: &str) -> &str {
    path.rsplit(DIVIDER).next().unwrap_or(path)
}

/// Checks the syntax of an authored (possibly relative) path.
///
/// After the leading upward pointers, the path must not start or end with the
/// divider and must not contain two consecutive dividers.
#[must_use]
pub fn is_valid_as_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    let core = path.trim_start_matches(UPPER_LEVEL_POINTER);
    if core.is_empty() {
        // a bare run of pointers is a legal "move up" path
        return true;
    }

    !(core.starts_with(DIVIDER)
        || core.ends_with(DIVIDER)
        || core.contains("..")
        || core.contains(UPPER_LEVEL_POINTER))
}

/// Checks the syntax of an authored name. Same rules as [`is_valid_as_path`].
#[must_use]
pub fn is_valid_as_name(name: &str) -> bool {
    is_valid_as_path(name)
}

/// Turns arbitrary text (e.g. a dictionary key) into a path segment sequence.
///
/// Upward pointers are removed wherever they appear, surrounding dividers
/// are trimmed and runs of dividers collapse into one. An empty result
/// becomes `_`.
#[must_use]
pub fn normalize_path(text: &str) -> Cow<'_, str> {
    if is_valid_as_path(text) && !text.contains(UPPER_LEVEL_POINTER) {
        return Cow::Borrowed(text);
    }

    let stripped = text.replace(UPPER_LEVEL_POINTER, "");
    let normalized = stripped
        .split(DIVIDER)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".");

    if normalized.is_empty() {
        Cow::Borrowed("_")
    } else {
        Cow::Owned(normalized)
    }
}
