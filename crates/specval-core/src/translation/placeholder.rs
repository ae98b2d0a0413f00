//! `{name|param=value,...}` placeholders in message templates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

#[allow(clippy::expect_used)]
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]+\}").expect("placeholder pattern is valid"));

/// Separates the arg name from its parameters.
pub const NAME_SEPARATOR: char = '|';

/// Separates parameters.
pub const PARAMS_SEPARATOR: char = ',';

/// Separates a parameter name from its value.
pub const VALUE_SEPARATOR: char = '=';

/// A parsed placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPlaceholder {
    /// Arg name (`min` in `{min|format=0.00}`).
    pub name: String,
    /// The full placeholder text, braces included.
    pub placeholder: String,
    /// Parameters in written order.
    pub params: Vec<(String, String)>,
}

impl ArgPlaceholder {
    /// Value of parameter `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Extracts the well-formed placeholders of `message`, each distinct
/// placeholder text once, in order of first appearance.
///
/// Malformed placeholders (empty or spaced names, parameters without `=`,
/// duplicated parameter names, more than one `|`) are skipped and stay in
/// the message as literal text.
#[must_use]
pub fn parse_placeholders(message: &str) -> Vec<ArgPlaceholder> {
    let mut seen = HashSet::new();
    PLACEHOLDER_PATTERN
        .find_iter(message)
        .filter(|m| seen.insert(m.as_str()))
        .filter_map(|m| parse(m.as_str()))
        .collect()
}

fn parse(placeholder: &str) -> Option<ArgPlaceholder> {
    let inner = placeholder.strip_prefix('{')?.strip_suffix('}')?;
    let (name, params) = match inner.split_once(NAME_SEPARATOR) {
        Some((name, params)) => (name, Some(params)),
        None => (inner, None),
    };

    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return None;
    }

    let params = match params {
        None => Vec::new(),
        Some(params) => parse_params(params)?,
    };

    Some(ArgPlaceholder {
        name: name.to_string(),
        placeholder: placeholder.to_string(),
        params,
    })
}

fn parse_params(text: &str) -> Option<Vec<(String, String)>> {
    if text.is_empty() || text.contains(NAME_SEPARATOR) {
        return None;
    }

    let mut params: Vec<(String, String)> = Vec::new();
    for pair in text.split(PARAMS_SEPARATOR) {
        let (key, value) = pair.split_once(VALUE_SEPARATOR)?;
        if key.is_empty()
            || value.is_empty()
            || key.chars().any(char::is_whitespace)
            || params.iter().any(|(k, _)| k == key)
        {
            return None;
        }
        params.push((key.to_string(), value.to_string()));
    }
    Some(params)
}

/// Replaces placeholders in a single pass over `message`: text produced by
/// `replace` is never scanned again. Placeholders `replace` declines (or
/// that are malformed) are kept verbatim.
pub(crate) fn substitute<F>(message: &str, mut replace: F) -> String
where
    F: FnMut(&ArgPlaceholder) -> Option<String>,
{
    let mut out = String::with_capacity(message.len());
    let mut last = 0;

    for found in PLACEHOLDER_PATTERN.find_iter(message) {
        let Some(placeholder) = parse(found.as_str()) else {
            continue;
        };
        let Some(value) = replace(&placeholder) else {
            continue;
        };
        out.push_str(&message[last..found.start()]);
        out.push_str(&value);
        last = found.end();
    }

    out.push_str(&message[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_params() {
        let found = parse_placeholders("Between {min|format=0.00} and {max} ({min|format=0.00})");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "min");
        assert_eq!(found[0].param("format"), Some("0.00"));
        assert_eq!(found[1].placeholder, "{max}");
        assert!(found[1].params.is_empty());
    }

    #[test]
    fn skips_malformed() {
        let found = parse_placeholders(
            "{} {a b} {x|} {x|format} {x|a=1,a=2} {x|a=1|b=2} {x|=1} {ok|a=1,b=two words}",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "ok");
        assert_eq!(found[0].param("b"), Some("two words"));
    }

    #[test]
    fn substitution_is_single_pass() {
        let out = substitute("{a} and {b} and {bad name}", |p| match p.name.as_str() {
            "a" => Some("{b}".to_string()),
            "b" => Some("B".to_string()),
            _ => None,
        });
        assert_eq!(out, "{b} and B and {bad name}");
    }

    #[test]
    fn declined_placeholders_stay() {
        let out = substitute("Must be {value}", |_| None);
        assert_eq!(out, "Must be {value}");
    }
}
