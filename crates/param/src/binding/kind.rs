//! Runtime type descriptors and the string coercion driven by them.

use std::fmt;

/// The kind of a single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    /// Passed through unchanged
    Text,
    /// Parsed as an `i64`
    Integer,
    /// Parsed as an `f64`
    Float,
    /// `true` or `false`, case-insensitive
    Boolean,
    /// Exactly one of the declared variants, case-sensitive
    Enumeration(Vec<String>),
}

impl ScalarKind {
    /// Creates an enumeration kind from its variant names
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScalarKind::Enumeration(variants.into_iter().map(Into::into).collect())
    }

    fn coerce(&self, raw: &str) -> Option<ParamValue> {
        match self {
            ScalarKind::Text => Some(ParamValue::Text(raw.to_owned())),
            ScalarKind::Integer => raw.parse::<i64>().ok().map(ParamValue::Integer),
            ScalarKind::Float => raw.parse::<f64>().ok().map(ParamValue::Float),
            ScalarKind::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Some(ParamValue::Boolean(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(ParamValue::Boolean(false))
                } else {
                    None
                }
            }
            ScalarKind::Enumeration(variants) => {
                variants.iter().find(|variant| *variant == raw).map(|variant| ParamValue::Variant(variant.clone()))
            }
        }
    }

    fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ScalarKind::Text, ParamValue::Text(_))
            | (ScalarKind::Integer, ParamValue::Integer(_))
            | (ScalarKind::Float, ParamValue::Float(_))
            | (ScalarKind::Boolean, ParamValue::Boolean(_)) => true,
            (ScalarKind::Enumeration(variants), ParamValue::Variant(variant)) => variants.contains(variant),
            _ => false,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Text => f.write_str("string"),
            ScalarKind::Integer => f.write_str("integer"),
            ScalarKind::Float => f.write_str("float"),
            ScalarKind::Boolean => f.write_str("boolean"),
            ScalarKind::Enumeration(variants) => write!(f, "one of [{}]", variants.join(", ")),
        }
    }
}

/// Runtime description of a parameter's target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// A single value; only the first raw value is used
    Scalar(ScalarKind),
    /// Every raw value, coerced element-wise in arrival order
    Sequence(ScalarKind),
}

impl ParamKind {
    pub const TEXT: ParamKind = ParamKind::Scalar(ScalarKind::Text);
    pub const INTEGER: ParamKind = ParamKind::Scalar(ScalarKind::Integer);
    pub const FLOAT: ParamKind = ParamKind::Scalar(ScalarKind::Float);
    pub const BOOLEAN: ParamKind = ParamKind::Scalar(ScalarKind::Boolean);

    /// Creates a scalar enumeration kind from its variant names
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamKind::Scalar(ScalarKind::enumeration(variants))
    }

    /// Creates a sequence kind of the given element kind
    pub fn sequence_of(element: ScalarKind) -> Self {
        ParamKind::Sequence(element)
    }

    /// Returns true for sequence kinds
    pub fn is_sequence(&self) -> bool {
        matches!(self, ParamKind::Sequence(_))
    }

    /// Converts raw values into a value of this kind.
    ///
    /// `raw` is never empty when called by the binder. On failure the offending raw value
    /// is returned.
    pub(crate) fn coerce<'r>(&self, raw: &[&'r str]) -> Result<ParamValue, &'r str> {
        match self {
            ParamKind::Scalar(scalar) => {
                let first = raw.first().copied().unwrap_or_default();
                scalar.coerce(first).ok_or(first)
            }
            ParamKind::Sequence(element) => raw
                .iter()
                .map(|value| element.coerce(value).ok_or(*value))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::Sequence),
        }
    }

    /// Returns true if `value` is something this kind could have produced
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamKind::Scalar(scalar), value) => scalar.accepts(value),
            (ParamKind::Sequence(element), ParamValue::Sequence(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (ParamKind::Sequence(_), _) => false,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Scalar(scalar) => scalar.fmt(f),
            ParamKind::Sequence(element) => write!(f, "list of {element}"),
        }
    }
}

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Variant(String),
    Sequence(Vec<ParamValue>),
}

impl ParamValue {
    /// The text of a `Text` or `Variant` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) | ParamValue::Variant(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}
