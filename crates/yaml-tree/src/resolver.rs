//! Scalar type resolution and its inverse.
//!
//! Plain scalars go through the core schema: integer, float, boolean, null,
//! and finally string. Quoted and block scalars are always strings. A small
//! set of explicit tags (`!!null`, `!!str`, `!!bool`, `!!int`, `!!float`)
//! can override the inference.

use crate::{Error, Result, Value};
use yaml_rust2::parser::Tag;
use yaml_rust2::scanner::TScalarStyle;

/// Verbatim handle the engine reports for `!!` shorthand tags.
const CORE_TAG_HANDLE: &str = "tag:yaml.org,2002:";

const TRUE_LITERALS: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_LITERALS: [&str; 3] = ["false", "False", "FALSE"];
const NULL_LITERALS: [&str; 3] = ["", "null", "~"];

/// Core schema tags recognized during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoreTag {
    Null,
    Str,
    Bool,
    Int,
    Float,
}

impl CoreTag {
    fn from_tag(tag: &Tag) -> Option<CoreTag> {
        if tag.handle != CORE_TAG_HANDLE && tag.handle != "!!" {
            return None;
        }
        match tag.suffix.as_str() {
            "null" => Some(CoreTag::Null),
            "str" => Some(CoreTag::Str),
            "bool" => Some(CoreTag::Bool),
            "int" => Some(CoreTag::Int),
            "float" => Some(CoreTag::Float),
            _ => None,
        }
    }
}

/// Resolve a scalar's text into a typed value.
///
/// `!!null` and `!!str` are authoritative. `!!bool`, `!!int` and `!!float`
/// cast when the text has the requested shape, and otherwise fall through
/// to the plain-style rules, so `!!bool 0` still resolves to `Int(0)`.
///
/// # Example
///
/// ```rust
/// use yaml_tree::{resolve, Value};
/// use yaml_rust2::scanner::TScalarStyle;
///
/// assert_eq!(resolve("5", None, TScalarStyle::Plain), Value::Int(5));
/// assert_eq!(resolve("5", None, TScalarStyle::DoubleQuoted), Value::from("5"));
/// ```
pub fn resolve(text: &str, tag: Option<&Tag>, style: TScalarStyle) -> Value {
    match tag.and_then(CoreTag::from_tag) {
        Some(CoreTag::Null) => return Value::Null,
        Some(CoreTag::Str) => return Value::String(text.to_string()),
        Some(CoreTag::Bool) => {
            if let Some(b) = parse_bool(text) {
                return Value::Bool(b);
            }
        }
        Some(CoreTag::Int) => {
            if let Some(i) = parse_int(text) {
                return Value::Int(i);
            }
        }
        Some(CoreTag::Float) => {
            if let Some(d) = parse_int(text).map(|i| i as f64).or_else(|| parse_float(text)) {
                return Value::Double(d);
            }
        }
        None => {}
    }

    if style != TScalarStyle::Plain {
        return Value::String(text.to_string());
    }
    resolve_plain(text)
}

/// Resolve raw scalar bytes, validating them as UTF-8 first.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if the bytes are not valid UTF-8.
pub fn resolve_bytes(bytes: &[u8], tag: Option<&Tag>, style: TScalarStyle) -> Result<Value> {
    let text = std::str::from_utf8(bytes).map_err(Error::from)?;
    Ok(resolve(text, tag, style))
}

fn resolve_plain(text: &str) -> Value {
    if let Some(i) = parse_int(text) {
        return Value::Int(i);
    }
    if let Some(d) = parse_float(text) {
        return Value::Double(d);
    }
    if let Some(b) = parse_bool(text) {
        return Value::Bool(b);
    }
    if NULL_LITERALS.contains(&text) {
        return Value::Null;
    }
    Value::String(text.to_string())
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&text) {
        Some(true)
    } else if FALSE_LITERALS.contains(&text) {
        Some(false)
    } else {
        None
    }
}

fn parse_int(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().filter(|_| !hex.starts_with(['+', '-']));
    }
    if let Some(oct) = text.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok().filter(|_| !oct.starts_with(['+', '-']));
    }
    text.parse::<i64>().ok()
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf", "nan" and "infinity", which YAML treats as strings.
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Canonical scalar text for a non-collection value.
///
/// Returns None for strings (written verbatim) and collections.
pub fn canonical_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) => Some("false".to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => Some(format_double(*d)),
        Value::String(_) | Value::Array(_) | Value::Dictionary(_) => None,
    }
}

/// Shortest text that parses back to the same double.
///
/// Always carries a `.` or an exponent so it never reads back as an integer.
pub(crate) fn format_double(d: f64) -> String {
    if d.is_nan() {
        ".nan".to_string()
    } else if d.is_infinite() {
        if d > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        format!("{:?}", d)
    }
}

/// Whether `text`, written as a plain scalar, would load back as that string.
pub fn plain_is_faithful(text: &str) -> bool {
    matches!(resolve_plain(text), Value::String(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Value {
        resolve(text, None, TScalarStyle::Plain)
    }

    fn core_tag(suffix: &str) -> Tag {
        Tag {
            handle: CORE_TAG_HANDLE.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(plain("5"), Value::Int(5));
        assert_eq!(plain("-12"), Value::Int(-12));
        assert_eq!(plain("9.99"), Value::Double(9.99));
        assert_eq!(plain("1e3"), Value::Double(1000.0));
        assert_eq!(plain("0x1F"), Value::Int(31));
        assert_eq!(plain("0o17"), Value::Int(15));
    }

    #[test]
    fn test_plain_booleans() {
        for text in ["true", "True", "TRUE"] {
            assert_eq!(plain(text), Value::Bool(true));
        }
        for text in ["false", "False", "FALSE"] {
            assert_eq!(plain(text), Value::Bool(false));
        }
        assert_eq!(plain("tRUE"), Value::from("tRUE"));
        assert_eq!(plain("yes"), Value::from("yes"));
    }

    #[test]
    fn test_plain_nulls() {
        for text in ["", "null", "~"] {
            assert_eq!(plain(text), Value::Null);
        }
        assert_eq!(plain("Null"), Value::from("Null"));
    }

    #[test]
    fn test_special_floats() {
        assert_eq!(plain(".inf"), Value::Double(f64::INFINITY));
        assert_eq!(plain("-.inf"), Value::Double(f64::NEG_INFINITY));
        assert!(plain(".nan").as_f64().is_some_and(f64::is_nan));
        assert_eq!(plain("inf"), Value::from("inf"));
        assert_eq!(plain("nan"), Value::from("nan"));
    }

    #[test]
    fn test_other_text_is_unchanged() {
        assert_eq!(plain("hello world"), Value::from("hello world"));
        assert_eq!(plain("1.2.3"), Value::from("1.2.3"));
        assert_eq!(plain("0xZZ"), Value::from("0xZZ"));
    }

    #[test]
    fn test_quoted_styles_are_strings() {
        for style in [
            TScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted,
            TScalarStyle::Literal,
            TScalarStyle::Folded,
        ] {
            assert_eq!(resolve("5", None, style), Value::from("5"));
            assert_eq!(resolve("null", None, style), Value::from("null"));
        }
    }

    #[test]
    fn test_null_and_str_tags() {
        assert_eq!(
            resolve("value", Some(&core_tag("null")), TScalarStyle::Plain),
            Value::Null
        );
        assert_eq!(
            resolve("0", Some(&core_tag("str")), TScalarStyle::Plain),
            Value::from("0")
        );
    }

    #[test]
    fn test_cast_tags() {
        assert_eq!(
            resolve("true", Some(&core_tag("bool")), TScalarStyle::Plain),
            Value::Bool(true)
        );
        // A failed cast falls through to the plain rules.
        assert_eq!(
            resolve("0", Some(&core_tag("bool")), TScalarStyle::Plain),
            Value::Int(0)
        );
        assert_eq!(
            resolve("42", Some(&core_tag("int")), TScalarStyle::DoubleQuoted),
            Value::Int(42)
        );
        assert_eq!(
            resolve("1", Some(&core_tag("float")), TScalarStyle::Plain),
            Value::Double(1.0)
        );
    }

    #[test]
    fn test_shorthand_handle_and_unknown_tags() {
        let shorthand = Tag {
            handle: "!!".to_string(),
            suffix: "str".to_string(),
        };
        assert_eq!(
            resolve("5", Some(&shorthand), TScalarStyle::Plain),
            Value::from("5")
        );
        let local = Tag {
            handle: "!".to_string(),
            suffix: "path".to_string(),
        };
        assert_eq!(resolve("5", Some(&local), TScalarStyle::Plain), Value::Int(5));
    }

    #[test]
    fn test_resolve_bytes_rejects_invalid_utf8() {
        let bytes = vec![b'a', 0xc3, 0x28];
        let err = resolve_bytes(&bytes, None, TScalarStyle::Plain).unwrap_err();
        assert!(matches!(err, Error::DecodeError { .. }));
        assert_eq!(
            resolve_bytes(b"7", None, TScalarStyle::Plain).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(canonical_text(&Value::Null).as_deref(), Some("null"));
        assert_eq!(canonical_text(&Value::Bool(false)).as_deref(), Some("false"));
        assert_eq!(canonical_text(&Value::Int(-3)).as_deref(), Some("-3"));
        assert_eq!(canonical_text(&Value::Double(9.99)).as_deref(), Some("9.99"));
        assert_eq!(canonical_text(&Value::Double(1.0)).as_deref(), Some("1.0"));
        assert_eq!(canonical_text(&Value::from("x")), None);
    }

    #[test]
    fn test_canonical_double_round_trips() {
        for d in [0.1, 1.0, -0.0, 1e300, 2.5e-8, f64::INFINITY, f64::NEG_INFINITY] {
            let text = format_double(d);
            assert_eq!(plain(&text), Value::Double(d), "text {}", text);
        }
    }

    #[test]
    fn test_plain_is_faithful() {
        assert!(plain_is_faithful("foo"));
        assert!(!plain_is_faithful("5"));
        assert!(!plain_is_faithful("true"));
        assert!(!plain_is_faithful(""));
        assert!(!plain_is_faithful("~"));
    }
}
