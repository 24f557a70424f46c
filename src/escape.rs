//! Escaping for the three line protocol contexts.
//!
//! <https://docs.influxdata.com/influxdb/latest/reference/syntax/line-protocol/#special-characters>
//!
//! - measurement: `,` and space
//! - tag key, tag value, field key: `,`, space and `=`
//! - string field value: `"` only; the caller writes the surrounding quotes

use std::borrow::Cow;

use bytes::{BufMut, BytesMut};

const MEASUREMENT: &[char] = &[',', ' '];
const KEY: &[char] = &[',', ' ', '='];
const STRING_VALUE: &[char] = &['"'];

/// Escapes a measurement name.
pub fn escape_measurement(s: &str) -> Cow<'_, str> {
    escape(s, MEASUREMENT)
}

/// Escapes a tag key, tag value or field key.
pub fn escape_key(s: &str) -> Cow<'_, str> {
    escape(s, KEY)
}

/// Escapes the contents of a quoted string field value.
pub fn escape_string_value(s: &str) -> Cow<'_, str> {
    escape(s, STRING_VALUE)
}

pub fn write_measurement(s: &str, output: &mut BytesMut) {
    write_escaped(s, MEASUREMENT, output);
}

pub fn write_key(s: &str, output: &mut BytesMut) {
    write_escaped(s, KEY, output);
}

pub fn write_string_value(s: &str, output: &mut BytesMut) {
    write_escaped(s, STRING_VALUE, output);
}

fn escape<'a>(s: &'a str, reserved: &[char]) -> Cow<'a, str> {
    if !s.contains(reserved) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if reserved.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

fn write_escaped(s: &str, reserved: &[char], output: &mut BytesMut) {
    if !s.contains(reserved) {
        output.put_slice(s.as_bytes());
        return;
    }

    for c in s.chars() {
        if reserved.contains(&c) {
            output.put_u8(b'\\');
        }
        let mut c_buffer: [u8; 4] = [0; 4];
        output.put_slice(c.encode_utf8(&mut c_buffer).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn unescape(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn measurement() {
        assert_eq!(escape_measurement("a,b c"), "a\\,b\\ c");
        assert_eq!(escape_measurement("k=v"), "k=v");
        assert_eq!(escape_measurement("measurement_name"), "measurement_name");
    }

    #[test]
    fn key() {
        assert_eq!(escape_key("k=1"), "k\\=1");
        assert_eq!(escape_key("name escape"), "name\\ escape");
        assert_eq!(escape_key("a,b"), "a\\,b");
    }

    #[test]
    fn string_value() {
        assert_eq!(
            escape_string_value(r#"he said "hi""#),
            r#"he said \"hi\""#
        );
        assert_eq!(escape_string_value("a, b=c"), "a, b=c");
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(escape_key("zürich häuser"), "zürich\\ häuser");
        assert_eq!(escape_measurement("日本,語"), "日本\\,語");
    }

    #[test]
    fn clean_input_is_borrowed() {
        assert!(matches!(escape_key("plain_key"), Cow::Borrowed("plain_key")));
    }

    #[test]
    fn writers_match_escapers() {
        let mut output = BytesMut::new();
        write_measurement("a,b c", &mut output);
        output.put_u8(b'|');
        write_key("k=1", &mut output);
        output.put_u8(b'|');
        write_string_value(r#"say "x""#, &mut output);
        assert_eq!(output, r#"a\,b\ c|k\=1|say \"x\""#);
    }

    proptest! {
        #[test]
        fn escaping_is_identity_without_reserved(s in "[^,= \"]*") {
            prop_assert_eq!(escape_measurement(&s), s.as_str());
            prop_assert_eq!(escape_key(&s), s.as_str());
            prop_assert_eq!(escape_string_value(&s), s.as_str());
        }

        #[test]
        fn string_value_escaping_is_invertible(s in "[^\\\\\\p{Cc}]*") {
            prop_assert_eq!(unescape(&escape_string_value(&s)), s);
        }

        #[test]
        fn key_escaping_is_invertible(s in "[^\\\\\\p{Cc}]*") {
            prop_assert_eq!(unescape(&escape_key(&s)), s);
        }
    }
}
