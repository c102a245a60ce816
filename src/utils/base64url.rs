//! Base64URL segment codec per RFC 4648 §5
//!
//! Segments are written without padding. On decode the input is re-padded to a
//! multiple of four characters before handing it to the `base64` crate, so
//! both padded and unpadded producers are accepted.

use crate::error::{Error, Result};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

/// Encode bytes to an unpadded Base64URL string
pub fn encode_bytes(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode a string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode a Base64URL segment to bytes
pub fn decode_bytes(input: &str) -> Result<Vec<u8>> {
    let remainder = input.len() % 4;
    if remainder == 0 {
        return URL_SAFE
            .decode(input)
            .map_err(|e| Error::Decode(e.to_string()));
    }

    let mut padded = String::with_capacity(input.len() + 4 - remainder);
    padded.push_str(input);
    padded.extend(std::iter::repeat('=').take(4 - remainder));

    URL_SAFE
        .decode(padded)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a Base64URL segment to a UTF-8 string
pub fn decode(input: &str) -> Result<String> {
    let bytes = decode_bytes(input)?;
    String::from_utf8(bytes).map_err(|e| Error::Decode(format!("invalid UTF-8: {e}")))
}
