//! Escaping and joining of raw segments into URL-safe text.
//!
//! Two alphabets are used:
//!
//! - Path text (this module): `/`-separated segments, each percent-encoded
//!   per RFC 3986 so that it fits in a URL path (`/platform/administrators`).
//! - Identifier tokens ([`token`]): names restricted to `A-Z a-z 0-9 -` with
//!   `_XX` byte escapes, leaving `~` and `.` free to act as delimiters.
//!
//! Both decoders are strict: they only accept the exact output of the
//! matching encoder, so decoding then re-encoding returns the input.

pub mod token;

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

use crate::error::IdentError;
use crate::segment::Segment;

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Textual form of the root path.
pub const ROOT: &str = "/";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Decode two uppercase hex digits into a byte.
pub(crate) fn decode_upper_hex(pair: &[u8]) -> Option<u8> {
    fn digit(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    match pair {
        [high, low] => Some((digit(*high)? << 4) | digit(*low)?),
        _ => None,
    }
}

/// Percent-encode raw text into the unreserved alphabet.
#[must_use]
pub fn escape(text: &str) -> String {
    percent_encode(text.as_bytes(), PATH_ENCODE_SET).to_string()
}

/// Decode text produced by [`escape`].
///
/// # Errors
///
/// Returns [`IdentError::MalformedToken`] if the input holds a character
/// outside the unreserved alphabet, a truncated or lowercase escape, an
/// escape of an unreserved byte, or bytes that are not valid UTF-8.
pub fn unescape(token: &str) -> Result<String, IdentError> {
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let value = bytes
                    .get(i + 1..i + 3)
                    .and_then(decode_upper_hex)
                    .ok_or_else(|| IdentError::malformed(token, "invalid percent escape"))?;
                if is_unreserved(value) {
                    return Err(IdentError::malformed(
                        token,
                        format!("non-canonical escape of {:?}", char::from(value)),
                    ));
                }
                i += 3;
            }
            byte if is_unreserved(byte) => i += 1,
            byte => {
                return Err(IdentError::malformed(
                    token,
                    format!("unexpected character {:?}", char::from(byte)),
                ));
            }
        }
    }

    percent_decode_str(token)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| IdentError::malformed(token, "escaped bytes are not valid UTF-8"))
}

/// Join segments into rooted path text.
///
/// The empty list renders as [`ROOT`].
#[must_use]
pub fn join(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return ROOT.to_owned();
    }
    let mut out = String::new();
    for segment in segments {
        out.push(PATH_SEPARATOR);
        out.push_str(&escape(segment.as_str()));
    }
    out
}

/// Split rooted path text produced by [`join`] back into segments.
///
/// # Errors
///
/// Returns [`IdentError::MalformedToken`] if the text is not rooted, has an
/// empty component (`//` or a trailing `/`), or a component fails [`unescape`].
pub fn split(token: &str) -> Result<Vec<Segment>, IdentError> {
    let Some(rest) = token.strip_prefix(PATH_SEPARATOR) else {
        return Err(IdentError::malformed(token, "path must start with '/'"));
    };
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    rest.split(PATH_SEPARATOR)
        .map(|part| {
            if part.is_empty() {
                return Err(IdentError::malformed(token, "empty path component"));
            }
            Segment::new(unescape(part)?)
        })
        .collect()
}
