//! Value formatting helpers.
//!
//! Pure functions used when building documents: identifiers, timestamps,
//! rounding, clamping and compact encodings. None of them touch a store.

use crate::error::{CoreError, CoreResult};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Decimal places kept by [`round_coordinate`].
pub const COORDINATE_PRECISION: u32 = 2;

/// Timestamps below this value are taken to be in seconds.
const SECONDS_THRESHOLD: i64 = 100_000_000_000;

/// Returns a new random identifier (32 lowercase hex characters).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Returns the current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Normalizes a Unix timestamp to milliseconds.
///
/// Values that look like seconds are scaled up; negative values become 0.
pub fn normalize_timestamp(timestamp: i64) -> i64 {
    if timestamp <= 0 {
        0
    } else if timestamp < SECONDS_THRESHOLD {
        timestamp.saturating_mul(1000)
    } else {
        timestamp
    }
}

/// Rounds a coordinate to [`COORDINATE_PRECISION`] decimal places.
pub fn round_coordinate(value: f64) -> f64 {
    round_to(value, COORDINATE_PRECISION)
}

/// Rounds to a number of decimal places. Non-finite values are returned
/// unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Clamps a numeric JSON value into `[min, max]`, or returns `fallback` if
/// the value is not a finite number.
pub fn clamp_or(value: &Value, min: f64, max: f64, fallback: f64) -> f64 {
    match value.as_f64() {
        Some(n) if n.is_finite() => n.clamp(min, max),
        _ => fallback,
    }
}

/// Encodes bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decodes hex (either case). Returns `None` for odd lengths or non-hex
/// characters.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

/// Packs up to 32 flags into an integer, first flag in the lowest bit.
/// Flags past the 32nd are ignored.
pub fn encode_bits(flags: &[bool]) -> u32 {
    flags
        .iter()
        .take(32)
        .enumerate()
        .fold(0, |bits, (i, &set)| if set { bits | (1 << i) } else { bits })
}

/// Unpacks `len` flags (at most 32) from an integer.
pub fn decode_bits(bits: u32, len: usize) -> Vec<bool> {
    (0..len.min(32)).map(|i| bits & (1 << i) != 0).collect()
}

/// Joins fields into one CSV line (no line terminator), quoting fields
/// that need it. An empty slice encodes to an empty line.
///
/// # Errors
///
/// Returns `InvalidArgument` if the writer fails.
pub fn encode_csv<S: AsRef<str>>(fields: &[S]) -> CoreResult<String> {
    if fields.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(fields.iter().map(|f| f.as_ref()))
        .map_err(csv_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::invalid_argument(format!("csv: {}", e.error())))?;
    let mut line = String::from_utf8(bytes)
        .map_err(|e| CoreError::invalid_argument(format!("csv: {e}")))?;
    if line.ends_with('\n') {
        line.pop();
    }
    if line.is_empty() {
        // A lone empty field, kept distinct from an empty row.
        line.push_str("\"\"");
    }
    Ok(line)
}

/// Splits one CSV line into fields, honoring quotes. A trailing line
/// terminator is ignored and an empty line decodes to no fields.
///
/// # Errors
///
/// Returns `InvalidArgument` if the input holds more than one record or
/// the reader rejects it.
pub fn decode_csv(line: &str) -> CoreResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(line.as_bytes());
    let mut records = reader.records();
    let Some(record) = records.next() else {
        return Ok(Vec::new());
    };
    let record = record.map_err(csv_error)?;
    if records.next().is_some() {
        return Err(CoreError::invalid_argument("csv: expected a single record"));
    }
    Ok(record.iter().map(str::to_string).collect())
}

fn csv_error(err: csv::Error) -> CoreError {
    CoreError::invalid_argument(format!("csv: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_are_unique_hex() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn timestamps_normalize_to_millis() {
        assert_eq!(normalize_timestamp(1_700_000_000), 1_700_000_000_000);
        assert_eq!(normalize_timestamp(1_700_000_000_123), 1_700_000_000_123);
        assert_eq!(normalize_timestamp(-5), 0);
        assert!(now_millis() > SECONDS_THRESHOLD);
    }

    #[test]
    fn coordinates_round_to_fixed_precision() {
        assert_eq!(round_coordinate(12.3456), 12.35);
        assert_eq!(round_coordinate(-0.004), -0.0);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn clamp_with_fallback() {
        assert_eq!(clamp_or(&json!(150), 0.0, 100.0, 50.0), 100.0);
        assert_eq!(clamp_or(&json!(-3.5), 0.0, 100.0, 50.0), 0.0);
        assert_eq!(clamp_or(&json!(42), 0.0, 100.0, 50.0), 42.0);
        assert_eq!(clamp_or(&json!("42"), 0.0, 100.0, 50.0), 50.0);
        assert_eq!(clamp_or(&Value::Null, 0.0, 100.0, 50.0), 50.0);
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(to_hex(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(from_hex("00ABff"), Some(vec![0x00, 0xab, 0xff]));
        assert_eq!(from_hex("abc"), None);
        assert_eq!(from_hex("zz"), None);
        assert_eq!(from_hex("+f"), None);
        assert_eq!(from_hex(""), Some(vec![]));
    }

    #[test]
    fn bit_flags() {
        let flags = [true, false, true, true];
        let bits = encode_bits(&flags);
        assert_eq!(bits, 0b1101);
        assert_eq!(decode_bits(bits, 4), flags.to_vec());
        assert_eq!(decode_bits(bits, 2), vec![true, false]);
    }

    #[test]
    fn csv_quoting() {
        let line = encode_csv(&["plain", "with,comma", "say \"hi\""]).unwrap();
        assert_eq!(line, r#"plain,"with,comma","say ""hi""""#);
        assert_eq!(
            decode_csv(&line).unwrap(),
            vec!["plain", "with,comma", "say \"hi\""]
        );
        assert_eq!(decode_csv("a,,b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn csv_line_terminators_are_not_field_content() {
        assert_eq!(decode_csv("a,b\r\n").unwrap(), vec!["a", "b"]);
        assert_eq!(decode_csv("a,b\n").unwrap(), vec!["a", "b"]);
        assert!(decode_csv("a,b\nc,d").is_err());
    }

    #[test]
    fn csv_empty_rows() {
        let empty: [&str; 0] = [];
        assert_eq!(encode_csv(&empty).unwrap(), "");
        assert!(decode_csv("").unwrap().is_empty());

        let blank = encode_csv(&[""]).unwrap();
        assert_eq!(blank, r#""""#);
        assert_eq!(decode_csv(&blank).unwrap(), vec![""]);
        assert_eq!(decode_csv(&encode_csv(&["", ""]).unwrap()).unwrap(), vec!["", ""]);
    }

    #[test]
    fn csv_embedded_newlines_are_quoted() {
        let line = encode_csv(&["two\nlines", "x"]).unwrap();
        assert!(line.starts_with('"'));
        assert_eq!(decode_csv(&line).unwrap(), vec!["two\nlines", "x"]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn csv_fields_survive(fields in prop::collection::vec(".{0,8}", 0..5)) {
                let line = encode_csv(&fields).unwrap();
                prop_assert_eq!(decode_csv(&line).unwrap(), fields);
            }

            #[test]
            fn bits_survive(flags in prop::collection::vec(any::<bool>(), 0..=32)) {
                prop_assert_eq!(decode_bits(encode_bits(&flags), flags.len()), flags);
            }
        }
    }
}
