//! Utility functions for encoding binary values in a consistent way across the `exauthn`
//! libraries, matching what the browser `webauthn` APIs emit.
//!
//! Encoding always produces `base64url` without padding. Decoding is lenient: it accepts both the
//! `base64url` and the standard `base64` alphabets, with or without trailing `=` padding.

use data_encoding::{Encoding, Specification, BASE64, BASE64URL, BASE64URL_NOPAD, BASE64_NOPAD};

use super::bytes::NotBase64Encoded;


const PADDING: char = '=';

/// Convert bytes to base64 without padding
pub fn base64(data: &[u8]) -> String {
    BASE64_NOPAD.encode(data)
}

/// Convert bytes to base64url without padding
///
/// This is the same as encoding with the standard alphabet and then replacing `+` with `-`,
/// `/` with `_` and stripping all `=` padding, which makes the output safe to embed in URLs,
/// filenames and JSON strings.
pub fn base64url(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Decode wire encoded text into the exact bytes it represents.
///
/// The input may be `base64url` or `base64`, padded or not. This is the inverse of
/// [`base64url`], i.e. `decode(&base64url(b)) == Ok(b)` for any `b`.
pub fn decode(input: &str) -> Result<Vec<u8>, NotBase64Encoded> {
    try_from_base64url(input)
        .or_else(|| try_from_base64(input))
        .ok_or(NotBase64Encoded)
}

/// Try parsing from base64 with or without padding
pub fn try_from_base64(input: &str) -> Option<Vec<u8>> {
    decode_unpadded(&BASE64, input)
}

/// Try parsing from base64url with or without padding
pub fn try_from_base64url(input: &str) -> Option<Vec<u8>> {
    decode_unpadded(&BASE64URL, input)
}

fn decode_unpadded(padded: &Encoding, input: &str) -> Option<Vec<u8>> {
    let mut specs: Specification = padded.specification();
    specs.check_trailing_bits = false;
    specs.padding = None;
    let encoding = specs.encoding().ok()?;
    let sane_string = input.trim_end_matches(PADDING);
    encoding.decode(sane_string.as_bytes()).ok()
}
