//! Name escaping for identifier tokens.
//!
//! Names are written with `A-Z a-z 0-9 -` kept as is and every other UTF-8
//! byte written as `_` followed by two uppercase hex digits. The output
//! never contains `~` or `.`, which [`SiteId`](crate::SiteId) and
//! [`PageId`](crate::PageId) use as delimiters.

use crate::codec::decode_upper_hex;
use crate::error::IdentError;

/// Escape introducer.
const ESCAPE: u8 = b'_';

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_literal(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

/// Escape a raw name into the token alphabet.
#[must_use]
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &byte in name.as_bytes() {
        if is_literal(byte) {
            out.push(char::from(byte));
        } else {
            out.push(char::from(ESCAPE));
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    out
}

/// Decode a name produced by [`escape_name`].
///
/// # Errors
///
/// Returns [`IdentError::MalformedToken`] for an empty name, a character
/// outside the token alphabet, a truncated or lowercase escape, an escape of
/// a byte that has a literal form, or bytes that are not valid UTF-8.
pub fn unescape_name(token: &str) -> Result<String, IdentError> {
    if token.is_empty() {
        return Err(IdentError::malformed(token, "empty name"));
    }

    let bytes = token.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            ESCAPE => {
                let value = bytes
                    .get(i + 1..i + 3)
                    .and_then(decode_upper_hex)
                    .ok_or_else(|| IdentError::malformed(token, "invalid name escape"))?;
                if is_literal(value) {
                    return Err(IdentError::malformed(
                        token,
                        format!("non-canonical escape of {:?}", char::from(value)),
                    ));
                }
                decoded.push(value);
                i += 3;
            }
            byte if is_literal(byte) => {
                decoded.push(byte);
                i += 1;
            }
            byte => {
                return Err(IdentError::malformed(
                    token,
                    format!("unexpected character {:?}", char::from(byte)),
                ));
            }
        }
    }

    String::from_utf8(decoded)
        .map_err(|_| IdentError::malformed(token, "escaped bytes are not valid UTF-8"))
}
