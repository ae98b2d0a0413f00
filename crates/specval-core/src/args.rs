//! Named, typed arguments attached to error definitions.
//!
//! Args carry enough type information to format themselves when a message
//! template references them with `{name}` or `{name|param=value}`.

use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Parameter key selecting a format.
pub const FORMAT_PARAM: &str = "format";

/// Parameter key selecting letter case.
pub const CASE_PARAM: &str = "case";

/// Parameter key requesting a translation placeholder instead of a value.
pub const TRANSLATION_PARAM: &str = "translation";

/// Characters never allowed in arg names.
const FORBIDDEN_NAME_CHARS: [char; 5] = ['{', '}', '|', ',', '='];

/// Placeholder names reserved for the translation engine.
pub const RESERVED_NAMES: [&str; 3] = ["_name", "_path", "_translation"];

/// Typed value of an [`Arg`].
#[derive(Debug, Clone)]
pub enum ArgValue {
    /// Plain text.
    Text(String),
    /// Integer number.
    Integer(i128),
    /// Floating point number.
    Float(f64),
    /// Point in time.
    Time(DateTime<FixedOffset>),
    /// Enum variant, identified by its type name and variant name.
    Enum {
        /// Short type name (`Color`).
        type_name: String,
        /// Variant name (`Red`).
        variant: String,
    },
    /// A Rust type.
    Type {
        /// Short type name (`Address`).
        name: String,
        /// Full type path (`crate::model::Address`).
        full_name: String,
    },
    /// GUID/UUID.
    Guid(Uuid),
}

impl ArgValue {
    fn discriminant(&self) -> u8 {
        match self {
            Self::Text(_) => 0,
            Self::Integer(_) => 1,
            Self::Float(_) => 2,
            Self::Time(_) => 3,
            Self::Enum { .. } => 4,
            Self::Type { .. } => 5,
            Self::Guid(_) => 6,
        }
    }
}

// Floats compare by bit pattern so that structurally identical errors dedupe.
impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Time(a), Self::Time(b)) => a == b && a.offset() == b.offset(),
            (
                Self::Enum {
                    type_name: ta,
                    variant: va,
                },
                Self::Enum {
                    type_name: tb,
                    variant: vb,
                },
            ) => ta == tb && va == vb,
            (Self::Type { full_name: a, .. }, Self::Type { full_name: b, .. }) => a == b,
            (Self::Guid(a), Self::Guid(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ArgValue {}

impl Hash for ArgValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        match self {
            Self::Text(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Time(v) => {
                v.hash(state);
                v.offset().local_minus_utc().hash(state);
            }
            Self::Enum { type_name, variant } => {
                type_name.hash(state);
                variant.hash(state);
            }
            Self::Type { full_name, .. } => full_name.hash(state),
            Self::Guid(v) => v.hash(state),
        }
    }
}

/// A named argument of an error definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arg {
    name: String,
    value: ArgValue,
}

impl Arg {
    /// Creates an arg from a name and a typed value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Text arg.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ArgValue::Text(value.into()))
    }

    /// Integer arg.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: impl Into<i128>) -> Self {
        Self::new(name, ArgValue::Integer(value.into()))
    }

    /// Float arg.
    #[must_use]
    pub fn float(name: impl Into<String>, value: impl Into<f64>) -> Self {
        Self::new(name, ArgValue::Float(value.into()))
    }

    /// Time arg.
    #[must_use]
    pub fn time<Tz: TimeZone>(name: impl Into<String>, value: &DateTime<Tz>) -> Self {
        Self::new(name, ArgValue::Time(value.fixed_offset()))
    }

    /// Enum arg; the variant name is taken from the `Debug` output.
    #[must_use]
    pub fn enumeration<E: fmt::Debug>(name: impl Into<String>, value: &E) -> Self {
        let variant = format!("{value:?}");
        let variant = variant
            .split(|c: char| c == '(' || c == '{' || c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_string();
        Self::new(
            name,
            ArgValue::Enum {
                type_name: short_type_name(std::any::type_name::<E>()).to_string(),
                variant,
            },
        )
    }

    /// Type arg.
    #[must_use]
    pub fn type_of<U: ?Sized>(name: impl Into<String>) -> Self {
        let full_name = std::any::type_name::<U>();
        Self::new(
            name,
            ArgValue::Type {
                name: short_type_name(full_name).to_string(),
                full_name: full_name.to_string(),
            },
        )
    }

    /// GUID arg.
    #[must_use]
    pub fn guid(name: impl Into<String>, value: Uuid) -> Self {
        Self::new(name, ArgValue::Guid(value))
    }

    /// Returns the arg name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the typed value.
    #[must_use]
    pub fn value(&self) -> &ArgValue {
        &self.value
    }

    /// Formats the value, honoring the parameters its kind recognizes.
    ///
    /// Unknown parameters and unusable parameter values are ignored.
    #[must_use]
    pub fn format(&self, params: &[(String, String)]) -> String {
        let param = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        match &self.value {
            ArgValue::Text(text) => apply_case(text.clone(), param(CASE_PARAM)),
            ArgValue::Integer(n) => match param(FORMAT_PARAM).and_then(NumberFormat::parse) {
                Some(format) => {
                    #[allow(clippy::cast_precision_loss)]
                    let value = *n as f64;
                    if format.decimals == 0 {
                        format!("{n:0width$}", width = format.width)
                    } else {
                        format.apply(value)
                    }
                }
                None => n.to_string(),
            },
            ArgValue::Float(n) => match param(FORMAT_PARAM).and_then(NumberFormat::parse) {
                Some(format) => format.apply(*n),
                None => n.to_string(),
            },
            ArgValue::Time(time) => format_time(time, param(FORMAT_PARAM)),
            ArgValue::Enum { type_name, variant } => {
                if param(TRANSLATION_PARAM) == Some("true") {
                    return format!("{{_translation|key=Enum.{type_name}.{variant}}}");
                }
                match param(FORMAT_PARAM) {
                    Some("fullName") => format!("{type_name}.{variant}"),
                    _ => variant.clone(),
                }
            }
            ArgValue::Type { name, full_name } => {
                if param(TRANSLATION_PARAM) == Some("true") {
                    return format!("{{_translation|key=Type.{full_name}}}");
                }
                match param(FORMAT_PARAM) {
                    Some("fullName") => full_name.clone(),
                    _ => name.clone(),
                }
            }
            ArgValue::Guid(guid) => {
                let text = match param(FORMAT_PARAM) {
                    Some("simple") => guid.simple().to_string(),
                    Some("braced") => guid.braced().to_string(),
                    Some("urn") => guid.urn().to_string(),
                    _ => guid.hyphenated().to_string(),
                };
                apply_case(text, param(CASE_PARAM))
            }
        }
    }
}

/// Checks whether `name` may be used as an arg name.
#[must_use]
pub fn is_valid_arg_name(name: &str) -> bool {
    !name.is_empty()
        && !RESERVED_NAMES.contains(&name)
        && !name
            .chars()
            .any(|c| c.is_whitespace() || FORBIDDEN_NAME_CHARS.contains(&c))
}

fn apply_case(text: String, case: Option<&str>) -> String {
    match case {
        Some("upper") => text.to_uppercase(),
        Some("lower") => text.to_lowercase(),
        _ => text,
    }
}

fn format_time(time: &DateTime<FixedOffset>, format: Option<&str>) -> String {
    let Some(format) = format else {
        return time.to_rfc3339();
    };

    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        return time.to_rfc3339();
    }
    out
}

/// `0.00`-style number pattern: zeros before the dot set the minimum width of
/// the integer part, zeros after it the number of decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberFormat {
    width: usize,
    decimals: usize,
}

impl NumberFormat {
    fn parse(pattern: &str) -> Option<Self> {
        let (int, frac) = pattern.split_once('.').unwrap_or((pattern, ""));
        if int.is_empty() || !int.chars().all(|c| c == '0') || !frac.chars().all(|c| c == '0') {
            return None;
        }
        Some(Self {
            width: int.len(),
            decimals: frac.len(),
        })
    }

    fn apply(self, value: f64) -> String {
        let width = if self.decimals == 0 {
            self.width
        } else {
            self.width + self.decimals + 1
        };
        let sign = usize::from(value.is_sign_negative());
        format!(
            "{value:0width$.prec$}",
            width = width + sign,
            prec = self.decimals
        )
    }
}

/// Last path segment of a type name, generic arguments removed.
fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
