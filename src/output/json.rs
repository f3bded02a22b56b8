//
//  bitbucket-build-status
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON rendering for error messages.
//!
//! When Bitbucket rejects a request with a status code that has no canned
//! message, the response body itself becomes the message. It is rendered
//! with sorted keys, a four-space indent, `,` and `:` separators (no space
//! after the colon), non-ASCII characters escaped as `\uXXXX`, and a
//! trailing newline. Integers keep every digit of the source text; other
//! numbers are printed in shortest round-trip form (`1e-05`, `2.5`,
//! `1e+16`):
//!
//! ```text
//! {
//!     "error":{
//!         "message":"Bad things"
//!     },
//!     "type":"error"
//! }
//! ```

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};

/// Pretty formatter that drops the space after `:` and escapes non-ASCII.
struct SortedMessageFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl SortedMessageFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Formatter for SortedMessageFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_number_str<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        value: &str,
    ) -> io::Result<()> {
        writer.write_all(format_number(value).as_bytes())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Formats a JSON number token.
///
/// Tokens without a fraction or exponent are integers and are printed
/// digit for digit. Anything else is read as an `f64`.
fn format_number(token: &str) -> String {
    if token.contains(['.', 'e', 'E']) {
        return match token.parse::<f64>() {
            Ok(value) => format_float(value),
            Err(_) => token.to_string(),
        };
    }

    // -0 is just 0 as an integer
    if token.trim_start_matches('-').bytes().all(|b| b == b'0') {
        return "0".to_string();
    }
    token.to_string()
}

/// Shortest round-trip rendering of a float, positional for decimal
/// exponents in `-4..16` and scientific with a signed two-digit exponent
/// otherwise.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `-1.25e-7`
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-4..16).contains(&exponent) {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}{}{}e{}{:02}",
            sign,
            first,
            fraction,
            exp_sign,
            exponent.unsigned_abs()
        );
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{}0.{}{}", sign, zeros, digits);
    }

    let int_len = exponent as usize + 1;
    if digits.len() > int_len {
        let (int_part, frac_part) = digits.split_at(int_len);
        format!("{}{}.{}", sign, int_part, frac_part)
    } else {
        let padding = "0".repeat(int_len - digits.len());
        format!("{}{}{}.0", sign, digits, padding)
    }
}

/// Rebuilds `value` with every object's keys in sorted order.
///
/// `serde_json::Map` keeps insertion order under `preserve_order`.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, sort_keys(v))).collect();
            let mut out = Map::new();
            for (key, value) in sorted {
                out.insert(key.clone(), value);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Renders a JSON value in the error-message layout described above.
///
/// # Example
///
/// ```rust
/// use bitbucket_build_status::output::pretty_sorted_json;
/// use serde_json::json;
///
/// let text = pretty_sorted_json(&json!({"b": 1, "a": [true]}));
/// assert_eq!(text, "{\n    \"a\":[\n        true\n    ],\n    \"b\":1\n}\n");
/// ```
pub fn pretty_sorted_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, SortedMessageFormatter::new());

    // Writing into a Vec cannot fail, and Value always serializes
    if sort_keys(value).serialize(&mut serializer).is_err() {
        return value.to_string();
    }

    let mut text = String::from_utf8(buf).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}

/// Parses `body` as JSON and renders it with [`pretty_sorted_json`].
///
/// # Errors
///
/// Returns the parse error if `body` is not valid JSON.
pub fn pretty_sorted_json_str(body: &str) -> serde_json::Result<String> {
    let value: Value = serde_json::from_str(body)?;
    Ok(pretty_sorted_json(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sorts_nested_keys() {
        let value = json!({"zeta": {"b": 2, "a": 1}, "alpha": null});
        let expected = "{\n    \"alpha\":null,\n    \"zeta\":{\n        \"a\":1,\n        \"b\":2\n    }\n}\n";
        assert_eq!(pretty_sorted_json(&value), expected);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(pretty_sorted_json(&json!({})), "{}\n");
        assert_eq!(pretty_sorted_json(&json!({"errors": []})), "{\n    \"errors\":[]\n}\n");
    }

    #[test]
    fn test_escapes_non_ascii() {
        let value = json!({"message": "caf\u{e9} \u{1f600}"});
        assert_eq!(
            pretty_sorted_json(&value),
            "{\n    \"message\":\"caf\\u00e9 \\ud83d\\ude00\"\n}\n"
        );
    }

    #[test]
    fn test_keeps_standard_escapes() {
        let value = json!({"message": "line\n\"quoted\""});
        assert_eq!(
            pretty_sorted_json(&value),
            "{\n    \"message\":\"line\\n\\\"quoted\\\"\"\n}\n"
        );
    }

    #[test]
    fn test_big_integers_keep_their_digits() {
        let text = pretty_sorted_json_str(r#"{"id": 123456789012345678901234, "n": -0}"#).unwrap();
        assert_eq!(text, "{\n    \"id\":123456789012345678901234,\n    \"n\":0\n}\n");
    }

    #[test]
    fn test_floats_use_shortest_repr() {
        let text = pretty_sorted_json_str(r#"{"r": 1e-05, "s": 2.50, "t": 1E2}"#).unwrap();
        assert_eq!(
            text,
            "{\n    \"r\":1e-05,\n    \"s\":2.5,\n    \"t\":100.0\n}\n"
        );
    }

    #[test]
    fn test_format_float_boundaries() {
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(-1.5e300), "-1.5e+300");
        assert_eq!(format_float(1.2345678901234567e23), "1.2345678901234567e+23");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_from_str() {
        let text = pretty_sorted_json_str(r#"{"type": "error", "error": {"message": "Bad"}}"#)
            .unwrap();
        assert_eq!(
            text,
            "{\n    \"error\":{\n        \"message\":\"Bad\"\n    },\n    \"type\":\"error\"\n}\n"
        );
        assert!(pretty_sorted_json_str("<html>").is_err());
    }
}
