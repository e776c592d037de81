//! Form and query-string parsing module
//!
//! Decodes `application/x-www-form-urlencoded` request bodies and URL query
//! strings. Body parsing is strict (a bad escape fails the whole form, which
//! surfaces as a 400); query parsing is lossy and skips malformed pairs.

use std::collections::HashMap;
use std::fmt;

/// Why a form body failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormParseError {
    /// A `%` escape was truncated or not followed by two hex digits
    InvalidEscape,
    /// A decoded key or value was not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for FormParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEscape => write!(f, "invalid percent escape"),
            Self::InvalidUtf8 => write!(f, "decoded data is not valid UTF-8"),
        }
    }
}

/// Parse a form-urlencoded body into a field map.
///
/// Repeated fields keep the first value. Fields without `=` are treated as
/// having an empty value.
pub fn parse_form(body: &[u8]) -> Result<HashMap<String, String>, FormParseError> {
    let mut fields = HashMap::new();

    for pair in body.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = match pair.iter().position(|&b| b == b'=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, &[][..]),
        };
        let key = decode_component(raw_key)?;
        let value = decode_component(raw_value)?;
        fields.entry(key).or_insert(value);
    }

    Ok(fields)
}

/// Parse a URL query string into a parameter map, skipping malformed pairs
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let Ok(key) = decode_component(raw_key.as_bytes()) else {
            continue;
        };
        let Ok(value) = decode_component(raw_value.as_bytes()) else {
            continue;
        };
        params.entry(key).or_insert(value);
    }

    params
}

/// Decode one urlencoded component: `+` becomes space, `%XX` is percent-decoded
fn decode_component(raw: &[u8]) -> Result<String, FormParseError> {
    let mut decoded = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter();

    while let Some(&b) = bytes.next() {
        match b {
            b'+' => decoded.push(b' '),
            b'%' => {
                let hi = bytes.next().ok_or(FormParseError::InvalidEscape)?;
                let lo = bytes.next().ok_or(FormParseError::InvalidEscape)?;
                let hi = hex_value(*hi).ok_or(FormParseError::InvalidEscape)?;
                let lo = hex_value(*lo).ok_or(FormParseError::InvalidEscape)?;
                decoded.push((hi << 4) | lo);
            }
            _ => decoded.push(b),
        }
    }

    String::from_utf8(decoded).map_err(|_| FormParseError::InvalidUtf8)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_fields() {
        let fields = parse_form(b"name=John+Doe&email=john%40example.com").unwrap();
        assert_eq!(fields.get("name").unwrap(), "John Doe");
        assert_eq!(fields.get("email").unwrap(), "john@example.com");
    }

    #[test]
    fn missing_fields_are_simply_absent() {
        let fields = parse_form(b"name=John").unwrap();
        assert!(fields.get("email").is_none());
    }

    #[test]
    fn empty_body_yields_empty_map() {
        assert!(parse_form(b"").unwrap().is_empty());
    }

    #[test]
    fn field_without_equals_gets_empty_value() {
        let fields = parse_form(b"name").unwrap();
        assert_eq!(fields.get("name").unwrap(), "");
    }

    #[test]
    fn first_value_wins_for_repeated_fields() {
        let fields = parse_form(b"name=first&name=second").unwrap();
        assert_eq!(fields.get("name").unwrap(), "first");
    }

    #[test]
    fn rejects_invalid_percent_escape() {
        assert_eq!(parse_form(b"name=%zz"), Err(FormParseError::InvalidEscape));
        assert_eq!(parse_form(b"name=%4"), Err(FormParseError::InvalidEscape));
    }

    #[test]
    fn rejects_non_utf8_decoding() {
        assert_eq!(parse_form(b"name=%ff%fe"), Err(FormParseError::InvalidUtf8));
    }

    #[test]
    fn query_parsing_skips_malformed_pairs() {
        let params = parse_query("query=john&bad=%zz&other=ok");
        assert_eq!(params.get("query").unwrap(), "john");
        assert!(params.get("bad").is_none());
        assert_eq!(params.get("other").unwrap(), "ok");
    }

    #[test]
    fn query_decodes_escapes() {
        let params = parse_query("query=a+b%26c");
        assert_eq!(params.get("query").unwrap(), "a b&c");
    }
}
