//! Token-level validation for sensor logs
//!
//! Every helper here is a small, fallible step of the line grammar. None of
//! them fail the whole parse on their own; the parser decides what a rejected
//! token means for the line.

use chrono::NaiveDateTime;

use crate::constants::grammar;

/// Split text into lines
///
/// Breaks on `\n`, `\r\n` and a lone `\r`, as well as the vertical tab, form
/// feed, file/group/record separators, NEL and the Unicode line and paragraph
/// separators. A trailing break does not produce an empty final line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((position, c)) => {
                let line = &rest[..position];
                let mut next = position + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split a log line into whitespace-separated tokens
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Whether `token` is a strict `YYYY-MM-DDTHH:MM` timestamp naming a real
/// calendar minute
///
/// Seconds, timezones and unpadded fields are rejected.
pub fn is_timestamp(token: &str) -> bool {
    if token.len() != grammar::TIMESTAMP_LEN {
        return false;
    }

    let shape_ok = token.bytes().enumerate().all(|(position, byte)| match position {
        4 | 7 => byte == b'-',
        10 => byte == b'T',
        13 => byte == b':',
        _ => byte.is_ascii_digit(),
    });
    if !shape_ok {
        return false;
    }

    NaiveDateTime::parse_from_str(token, grammar::TIMESTAMP_FORMAT).is_ok()
}

/// Parse a numeric reading or reference value
pub fn parse_reading_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}
