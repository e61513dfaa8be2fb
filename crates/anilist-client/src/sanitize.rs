//! Free-text sanitisation for mutation payloads.
//!
//! AniList stores text in a column that rejects characters outside the basic
//! multilingual plane, so those are sent as numeric character references.
//! Request bodies are additionally encoded as HTML-safe JSON.

use serde::Serialize;
use std::fmt::Write;

/// Replace every code point above U+FFFF with `&#<decimal>;`.
pub fn encode_astral(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for ch in text.chars() {
        let code_point = ch as u32;
        if code_point > 0xFFFF {
            // Writing to a String cannot fail
            let _ = write!(encoded, "&#{};", code_point);
        } else {
            encoded.push(ch);
        }
    }
    encoded
}

/// Serialize `value` to JSON with `<`, `>`, `&`, `=` and `'` written as
/// unicode escapes.
///
/// Those characters only ever occur inside JSON strings, so the output
/// decodes to the same value as plain `serde_json::to_string`.
pub fn to_html_safe_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let raw = serde_json::to_string(value)?;
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '=' => escaped.push_str("\\u003d"),
            '\'' => escaped.push_str("\\u0027"),
            _ => escaped.push(ch),
        }
    }
    Ok(escaped)
}
