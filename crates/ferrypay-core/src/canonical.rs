//! Canonical byte form of a [`Payload`].
//!
//! The canonical form is the exact byte string the processor and this gateway
//! both feed to HMAC-SHA256, so it has to match the processor's encoder byte
//! for byte. The encoding is compact JSON with sorted keys:
//!
//! - `{"k1":v1,"k2":v2}` with no whitespace outside string contents
//! - keys in ascending UTF-8 byte order
//! - strings escaped to printable ASCII: `\"`, `\\`, `\b`, `\f`, `\n`, `\r`,
//!   `\t`, everything else outside U+0020..U+007E as lowercase `\uXXXX`
//!   (UTF-16 surrogate pairs above U+FFFF)
//! - `null`, `true`, `false`, and integers in plain decimal
//! - floats in shortest round-trip digits, positional when the decimal
//!   exponent is in `-4..16` and always with a fraction (`100.0`, `0.0001`),
//!   scientific otherwise with a signed, two-digit minimum exponent
//!   (`1e+16`, `1.5e-05`)
//!
//! Arrays and objects are not part of the signing contract and are rejected.
//!
//! Serialization runs through `serde_json` with [`PythonFormatter`], which
//! keeps serde_json's compact framing and short escapes and overrides only
//! float layout and non-ASCII escaping.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Serializer, Value};

use crate::error::{Result, SigningError};
use crate::payload::{Payload, SIGNATURE_FIELD};

/// Decimal exponents rendered positionally; everything else is scientific.
const POSITIONAL_EXPONENTS: std::ops::Range<i32> = -4..16;

/// Serialize every field of `payload` into its canonical form.
///
/// # Errors
///
/// Returns [`SigningError::UnsupportedValueType`] if a field holds an array or
/// object.
pub fn canonicalize(payload: &Payload) -> Result<Vec<u8>> {
    encode_object(payload.iter())
}

/// Serialize the fields that are covered by a signature.
///
/// Identical to [`canonicalize`] except that the top-level `signature` field,
/// if present, is left out.
///
/// # Errors
///
/// Same as [`canonicalize`].
pub fn signing_bytes(payload: &Payload) -> Result<Vec<u8>> {
    encode_object(
        payload
            .iter()
            .filter(|(key, _)| key.as_str() != SIGNATURE_FIELD),
    )
}

fn encode_object<'a>(fields: impl Iterator<Item = (&'a String, &'a Value)>) -> Result<Vec<u8>> {
    let mut scalars = BTreeMap::new();
    for (key, value) in fields {
        if let Value::Array(_) | Value::Object(_) = value {
            return Err(SigningError::UnsupportedValueType {
                field: key.clone(),
                kind: value_kind(value),
            });
        }
        scalars.insert(key.as_str(), value);
    }

    let mut out = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut out, PythonFormatter);
    scalars
        .serialize(&mut serializer)
        .map_err(|e| SigningError::Encoding(e.to_string()))?;
    Ok(out)
}

/// Compact JSON formatter matching Python's `json.dumps` with
/// `ensure_ascii=True` and `separators=(',', ':')`.
///
/// Integers, framing and the short escapes (`\"`, `\\`, `\n`, ...) are
/// serde_json's defaults, which already agree with Python.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonFormatter;

impl Formatter for PythonFormatter {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !value.is_finite() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("non-finite number {value}"),
            ));
        }
        writer.write_all(python_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // Fragments never hold `"`, `\` or C0 controls; those go through
        // `write_char_escape`.
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            for unit in ch.encode_utf16(&mut [0u16; 2]) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Python `repr` of a finite float.
///
/// The shortest round-trip digits come from `ryu`, the formatter serde_json
/// uses, which resolves ties the same way as Python.
fn python_repr(value: f64) -> String {
    let mut out = String::with_capacity(24);
    if value.is_sign_negative() {
        out.push('-');
    }

    let mut buffer = ryu::Buffer::new();
    let (digits, exponent) = decompose(buffer.format_finite(value.abs()));

    if POSITIONAL_EXPONENTS.contains(&exponent) {
        write_positional(&mut out, &digits, exponent);
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        out.push('e');
        out.push(sign);
        out.push_str(&format!("{:02}", exponent.unsigned_abs()));
    }
    out
}

/// Split a non-negative decimal rendering (`"529.73"`, `"1e16"`, `"1.5e-5"`)
/// into significant digits and the decimal exponent of the first one.
fn decompose(rendered: &str) -> (String, i32) {
    let (mantissa, exp) = rendered.split_once(['e', 'E']).unwrap_or((rendered, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let all: String = whole.chars().chain(fraction.chars()).collect();
    let leading = all.len() - all.trim_start_matches('0').len();
    let digits = all.trim_start_matches('0').trim_end_matches('0');

    if digits.is_empty() {
        return ("0".to_string(), 0);
    }

    let whole_len = i32::try_from(whole.len()).unwrap_or(i32::MAX);
    let leading = i32::try_from(leading).unwrap_or(i32::MAX);
    (digits.to_string(), whole_len - 1 + exp - leading)
}

fn write_positional(out: &mut String, digits: &str, exponent: i32) {
    match usize::try_from(exponent) {
        Ok(whole) => {
            let point = whole + 1;
            if digits.len() > point {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            } else {
                out.push_str(digits);
                out.extend(std::iter::repeat('0').take(point - digits.len()));
                out.push_str(".0");
            }
        }
        Err(_) => {
            let leading_zeros = exponent.unsigned_abs() - 1;
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(leading_zeros as usize));
            out.push_str(digits);
        }
    }
}

/// JSON kind name of a value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical_str(payload: &Payload) -> String {
        String::from_utf8(canonicalize(payload).unwrap()).unwrap()
    }

    fn float_str(value: f64) -> String {
        python_repr(value)
    }

    #[test]
    fn sorts_keys_without_whitespace() {
        let payload = Payload::new()
            .with("order_id", "O1")
            .with("merchant_id", "M1")
            .with("amount", 100.0);

        assert_eq!(
            canonical_str(&payload),
            r#"{"amount":100.0,"merchant_id":"M1","order_id":"O1"}"#
        );
    }

    #[test]
    fn construction_order_is_irrelevant() {
        let forward = Payload::new()
            .with("merchant_id", "M1")
            .with("order_id", "O1")
            .with("amount", 100.0);
        let reverse = Payload::new()
            .with("amount", 100.0)
            .with("order_id", "O1")
            .with("merchant_id", "M1");

        assert_eq!(canonicalize(&forward).unwrap(), canonicalize(&reverse).unwrap());
    }

    #[test]
    fn keys_sort_by_bytes_not_case_folded() {
        let payload = Payload::new().with("b", 1).with("B", 2).with("a", 3).with("_", 4);
        assert_eq!(canonical_str(&payload), r#"{"B":2,"_":4,"a":3,"b":1}"#);
    }

    #[test]
    fn empty_payload_is_empty_object() {
        assert_eq!(canonical_str(&Payload::new()), "{}");
    }

    #[test]
    fn scalar_values() {
        let payload = Payload::new()
            .with("capture", true)
            .with("settlement", false)
            .with("reference1", Value::Null)
            .with("installment_plan", 3)
            .with("offset", -42)
            .with("big", u64::MAX);

        assert_eq!(
            canonical_str(&payload),
            r#"{"big":18446744073709551615,"capture":true,"installment_plan":3,"offset":-42,"reference1":null,"settlement":false}"#
        );
    }

    #[test]
    fn booking_payload_matches_reference_encoder() {
        let payload = Payload::try_from(json!({
            "merchant_id": "MERCH-12345",
            "order_id": "ORD-2025001",
            "amount": 529.73,
            "currency": "THB",
            "description": "Donsak - Samui ferry ticket",
            "capture": true,
            "settlement": true,
            "reference1": null,
            "installment_plan": 3
        }))
        .unwrap();

        assert_eq!(
            canonical_str(&payload),
            r#"{"amount":529.73,"capture":true,"currency":"THB","description":"Donsak - Samui ferry ticket","installment_plan":3,"merchant_id":"MERCH-12345","order_id":"ORD-2025001","reference1":null,"settlement":true}"#
        );
    }

    #[test]
    fn float_formatting() {
        let cases = [
            (100.0, "100.0"),
            (529.73, "529.73"),
            (0.1, "0.1"),
            (-2.5, "-2.5"),
            (12345.678, "12345.678"),
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (0.0001, "0.0001"),
            (1e-7, "1e-07"),
            (1.5e-5, "1.5e-05"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (1e22, "1e+22"),
            (1e100, "1e+100"),
            (123_456_789_012_345_680.0, "1.2345678901234568e+17"),
            (5e-324, "5e-324"),
            (1_059_438_285_926_254.25, "1059438285926254.2"),
            (26_363_981_746_409.3125, "26363981746409.312"),
        ];

        for (value, expected) in cases {
            assert_eq!(float_str(value), expected, "formatting {value:?}");
        }
    }

    #[test]
    fn rounding_ties_match_reference_encoder() {
        let payload: Payload =
            serde_json::from_str(r#"{"x":1059438285926254.2,"a":-719724.5623929261}"#).unwrap();
        assert_eq!(
            canonical_str(&payload),
            r#"{"a":-719724.5623929261,"x":1059438285926254.2}"#
        );
    }

    #[test]
    fn integer_and_float_are_distinct() {
        let int = Payload::new().with("amount", 100);
        let float = Payload::new().with("amount", 100.0);

        assert_eq!(canonical_str(&int), r#"{"amount":100}"#);
        assert_eq!(canonical_str(&float), r#"{"amount":100.0}"#);
    }

    #[test]
    fn parsed_floats_keep_their_digits() {
        let payload: Payload =
            serde_json::from_str(r#"{"a":529.73,"b":1e2,"c":0.30000000000000004}"#).unwrap();
        assert_eq!(
            canonical_str(&payload),
            r#"{"a":529.73,"b":100.0,"c":0.30000000000000004}"#
        );
    }

    #[test]
    fn strings_are_escaped_to_ascii() {
        let payload = Payload::new()
            .with("customer_name", "สมชาย ใจดี")
            .with("note", "line1\nline2\t\"q\" \\ \u{1} 😀");

        assert_eq!(
            canonical_str(&payload),
            r#"{"customer_name":"\u0e2a\u0e21\u0e0a\u0e32\u0e22 \u0e43\u0e08\u0e14\u0e35","note":"line1\nline2\t\"q\" \\ \u0001 \ud83d\ude00"}"#
        );
    }

    #[test]
    fn control_and_delete_characters() {
        let payload = Payload::new().with("s", "\u{8}\u{c}\r\u{1f}\u{7f}~");
        assert_eq!(canonical_str(&payload), r#"{"s":"\b\f\r\u001f\u007f~"}"#);
    }

    #[test]
    fn keys_are_escaped_too() {
        let payload = Payload::new().with("ค่า", 1);
        assert_eq!(canonical_str(&payload), r#"{"\u0e04\u0e48\u0e32":1}"#);
    }

    #[test]
    fn delimiters_inside_values_do_not_collide() {
        let smuggled = Payload::new().with("a", r#"b","c":"d"#);
        let split = Payload::new().with("a", "b").with("c", "d");

        assert_ne!(canonicalize(&smuggled).unwrap(), canonicalize(&split).unwrap());
    }

    #[test]
    fn string_and_number_do_not_collide() {
        let text = Payload::new().with("amount", "100");
        let number = Payload::new().with("amount", 100);

        assert_ne!(canonicalize(&text).unwrap(), canonicalize(&number).unwrap());
    }

    #[test]
    fn nested_values_are_rejected() {
        let payload = Payload::new()
            .with("order_id", "O1")
            .with("items", json!([1, 2]));

        assert_eq!(
            canonicalize(&payload).unwrap_err(),
            SigningError::UnsupportedValueType {
                field: "items".into(),
                kind: "array"
            }
        );

        let payload = Payload::new().with("customer", json!({"name": "x"}));
        assert!(matches!(
            canonicalize(&payload),
            Err(SigningError::UnsupportedValueType { kind: "object", .. })
        ));
    }

    #[test]
    fn signing_bytes_skip_signature_field() {
        let unsigned = Payload::new().with("order_id", "O1");
        let signed = unsigned.clone().with("signature", "deadbeef");

        assert_eq!(canonical_str(&signed), r#"{"order_id":"O1","signature":"deadbeef"}"#);
        assert_eq!(
            signing_bytes(&signed).unwrap(),
            canonicalize(&unsigned).unwrap()
        );
    }

    #[test]
    fn signing_bytes_ignore_unsupported_signature_value() {
        let signed = Payload::new()
            .with("order_id", "O1")
            .with("signature", json!({"v1": "x"}));

        assert_eq!(signing_bytes(&signed).unwrap(), br#"{"order_id":"O1"}"#.to_vec());
    }
}
