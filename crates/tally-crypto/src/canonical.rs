//! Canonical deterministic encoding.
//!
//! Hash-based identity only works if semantically equal values always encode
//! to the same bytes. `serde_json::to_string` does not promise an object key
//! order, so this module walks a [`serde_json::Value`] itself and emits a
//! total-ordered form:
//!
//! - `null`, booleans, and strings use their JSON literal form
//! - numbers are emitted as their decimal token; integers (including 128-bit
//!   amounts, preserved exactly via serde_json's `arbitrary_precision`) are
//!   never rebuilt through `f64`
//! - non-finite numbers have no canonical form and fail
//! - arrays preserve element order
//! - object keys are sorted bytewise before emission
//!
//! The output is itself valid JSON, which keeps hash pre-images debuggable.

use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::Value;

use crate::error::EncodingError;

/// Canonically encode any serializable value.
///
/// Serialization goes through a formatter that refuses non-finite floats;
/// `serde_json`'s default formatter would silently write `null` for them,
/// which would give NaN a (wrong) canonical form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodingError> {
    let mut raw = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut raw, FiniteFormatter);
    value.serialize(&mut ser).map_err(|e| {
        // Writing to a Vec cannot fail, so an io-category error here can
        // only be the formatter's non-finite rejection.
        if e.is_io() {
            EncodingError::NonFiniteNumber
        } else {
            EncodingError::Serialization(e.to_string())
        }
    })?;
    let value: Value =
        serde_json::from_slice(&raw).map_err(|e| EncodingError::Serialization(e.to_string()))?;
    encode_value(&value)
}

/// Compact JSON formatter that rejects NaN and the infinities.
struct FiniteFormatter;

fn non_finite() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "non-finite float")
}

impl Formatter for FiniteFormatter {
    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !value.is_finite() {
            return Err(non_finite());
        }
        CompactFormatter.write_f32(writer, value)
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !value.is_finite() {
            return Err(non_finite());
        }
        CompactFormatter.write_f64(writer, value)
    }
}

/// Canonically encode an already-structured value.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(number) => {
            if !number.is_i64() && !number.is_u64() {
                // Float token: must be finite to have a canonical form.
                match number.as_f64() {
                    Some(f) if f.is_finite() => {}
                    _ => return Err(EncodingError::NonFiniteNumber),
                }
            }
            out.extend_from_slice(number.to_string().as_bytes());
        }
        Value::String(s) => write_string(s, out)?,
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out)?;
                out.push(b':');
                // Key came from the map, so the lookup cannot miss.
                write_value(&map[key.as_str()], out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_string(s: &str, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    let literal =
        serde_json::to_string(s).map_err(|e| EncodingError::Serialization(e.to_string()))?;
    out.extend_from_slice(literal.as_bytes());
    Ok(())
}
