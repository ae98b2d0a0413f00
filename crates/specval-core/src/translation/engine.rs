//! Template expansion.
//!
//! Rendering runs in two stages. [`translate_messages`] happens once per
//! error and translation: dictionary lookup, arg substitution and one level of
//! `{_translation|key=..}` expansion. Placeholders depending on the final
//! path (`_name`, `_path`) are left in place and indexed. Once the path is
//! known, [`translate_messages_with_path_placeholders`] fills them in.

use super::placeholder::{parse_placeholders, substitute, ArgPlaceholder};
use super::Dictionary;
use crate::args::FORMAT_PARAM;
use crate::paths;
use crate::registry::ErrorDefinition;

/// Placeholder replaced by the last segment of the error's path.
pub const NAME_PLACEHOLDER: &str = "_name";

/// Placeholder replaced by the error's path.
pub const PATH_PLACEHOLDER: &str = "_path";

/// Placeholder replaced by another entry of the same dictionary.
pub const TRANSLATION_PLACEHOLDER: &str = "_translation";

/// Parameter of `_translation` naming the dictionary key.
pub const KEY_PARAM: &str = "key";

/// `format` value of `_name` splitting the name into capitalized words.
pub const TITLE_CASE_FORMAT: &str = "titleCase";

/// Messages of one error in one translation, with the pending path
/// placeholders of each message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedMessages {
    /// Rendered messages; may still contain `_name`/`_path` placeholders.
    pub messages: Vec<String>,
    /// `(message index, placeholders)` for messages that still need the path.
    pub path_placeholders: Vec<(usize, Vec<ArgPlaceholder>)>,
}

/// Renders every message of `error` with `dictionary`.
///
/// A message found as a key in the dictionary is replaced by its template;
/// any other message is its own template. Unknown keys and malformed or
/// unknown placeholders are never an error: they stay as literal text.
#[must_use]
pub fn translate_messages(dictionary: &Dictionary, error: &ErrorDefinition) -> TranslatedMessages {
    let mut translated = TranslatedMessages::default();

    for (index, key) in error.all_messages().enumerate() {
        let template = dictionary.get(key).map_or(key, String::as_str);
        let with_args = substitute_args(template, error);
        let message = substitute(&with_args, |placeholder| {
            expand_translation(dictionary, error, placeholder)
        });

        let pending: Vec<ArgPlaceholder> = parse_placeholders(&message)
            .into_iter()
            .filter(|p| p.name == NAME_PLACEHOLDER || p.name == PATH_PLACEHOLDER)
            .collect();
        if !pending.is_empty() {
            translated.path_placeholders.push((index, pending));
        }
        translated.messages.push(message);
    }

    translated
}

fn substitute_args(template: &str, error: &ErrorDefinition) -> String {
    substitute(template, |placeholder| {
        error
            .args()
            .iter()
            .find(|arg| arg.name() == placeholder.name)
            .map(|arg| arg.format(&placeholder.params))
    })
}

/// One level only: the expanded entry gets its args but its own
/// `_translation` placeholders stay as written.
fn expand_translation(
    dictionary: &Dictionary,
    error: &ErrorDefinition,
    placeholder: &ArgPlaceholder,
) -> Option<String> {
    if placeholder.name != TRANSLATION_PLACEHOLDER {
        return None;
    }
    let key = placeholder.param(KEY_PARAM)?;
    Some(match dictionary.get(key) {
        Some(template) => substitute_args(template, error),
        None => key.to_string(),
    })
}

/// Fills `_path` and `_name` placeholders of already translated messages.
///
/// `_path` takes no parameters; `_name` accepts `format=titleCase`. Other
/// combinations are left untouched.
#[must_use]
pub fn translate_messages_with_path_placeholders(
    path: &str,
    messages: &[String],
    path_placeholders: &[(usize, Vec<ArgPlaceholder>)],
) -> Vec<String> {
    let mut result = messages.to_vec();
    let name = paths::get_last_level(path);

    for (index, _) in path_placeholders {
        let Some(message) = result.get_mut(*index) else {
            continue;
        };
        *message = substitute(message, |placeholder| {
            match (placeholder.name.as_str(), placeholder.params.as_slice()) {
                (PATH_PLACEHOLDER, []) => Some(path.to_string()),
                (NAME_PLACEHOLDER, []) => Some(name.to_string()),
                (NAME_PLACEHOLDER, [(param, value)])
                    if param == FORMAT_PARAM && value == TITLE_CASE_FORMAT =>
                {
                    Some(to_title_case(name))
                }
                _ => None,
            }
        });
    }

    result
}

/// Splits an identifier into capitalized words.
///
/// Words break at `_`, `-` and spaces, and where a lowercase letter is
/// followed by an uppercase letter or a digit, or a digit by a letter.
/// Uppercase runs stay together (`HTTPServer` is one word).
#[must_use]
pub fn to_title_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, c) in chars.iter().copied().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = i.checked_sub(1).map(|p| chars[p]) {
            let boundary = (prev.is_lowercase() && (c.is_uppercase() || c.is_ascii_digit()))
                || (prev.is_ascii_digit() && c.is_alphabetic());
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut letters = word.chars();
            match letters.next() {
                Some(first) => first.to_uppercase().chain(letters).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Arg;

    fn dictionary(entries: &[(&str, &str)]) -> Dictionary {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn unknown_key_is_literal() {
        let error = ErrorDefinition::new("unknownKey", vec![]);
        let translated = translate_messages(&dictionary(&[]), &error);
        assert_eq!(translated.messages, vec!["unknownKey"]);
        assert!(translated.path_placeholders.is_empty());
    }

    #[test]
    fn substitutes_args_with_params() {
        let dict = dictionary(&[("Numbers.Between", "Between {min|format=0.00} and {max}")]);
        let error = ErrorDefinition::new(
            "Numbers.Between",
            vec![Arg::float("min", 1.5), Arg::integer("max", 10)],
        );
        assert_eq!(translate_messages(&dict, &error).messages, vec!["Between 1.50 and 10"]);
    }

    #[test]
    fn self_translation_expands_once() {
        let dict = dictionary(&[("key1", "message1 {_translation|key=key1}")]);
        let error = ErrorDefinition::new("key1", vec![]);
        assert_eq!(
            translate_messages(&dict, &error).messages,
            vec!["message1 message1 {_translation|key=key1}"]
        );
    }

    #[test]
    fn translation_placeholder_edge_cases() {
        let dict = dictionary(&[("Other", "other {v}")]);
        let error = ErrorDefinition::new(
            "{_translation|key=Other} {_translation|key=Missing} {_translation}",
            vec![Arg::integer("v", 1)],
        );
        assert_eq!(
            translate_messages(&dict, &error).messages,
            vec!["other 1 Missing {_translation}"]
        );
    }

    #[test]
    fn records_path_placeholders_per_message() {
        let error = ErrorDefinition::new("plain", vec![]).with_extra_message("{_name} at {_path}");
        let translated = translate_messages(&dictionary(&[]), &error);
        assert_eq!(translated.path_placeholders.len(), 1);
        assert_eq!(translated.path_placeholders[0].0, 1);

        let rendered = translate_messages_with_path_placeholders(
            "Orders.#2.Total",
            &translated.messages,
            &translated.path_placeholders,
        );
        assert_eq!(rendered, vec!["plain", "Total at Orders.#2.Total"]);
    }

    #[test]
    fn name_title_case() {
        let messages = vec!["{_name|format=titleCase}".to_string(), "{_name|format=upper}".to_string()];
        let placeholders = vec![
            (0, parse_placeholders(&messages[0])),
            (1, parse_placeholders(&messages[1])),
        ];
        let rendered = translate_messages_with_path_placeholders(
            "very.nested.path.SetSlot123ToInput456",
            &messages,
            &placeholders,
        );
        assert_eq!(rendered, vec!["Set Slot 123 To Input 456", "{_name|format=upper}"]);
    }

    #[test]
    fn title_case_boundaries() {
        assert_eq!(to_title_case("firstName"), "First Name");
        assert_eq!(to_title_case("snake_case_name"), "Snake Case Name");
        assert_eq!(to_title_case("HTTPServer"), "HTTPServer");
        assert_eq!(to_title_case("ABC1"), "ABC1");
        assert_eq!(to_title_case("item2"), "Item 2");
        assert_eq!(to_title_case("SetSlot123ToInput456"), "Set Slot 123 To Input 456");
        assert_eq!(to_title_case(""), "");
    }
}
