//! Pointer file decoding.
//!
//! The pointer file names the current artifact. Two encodings are in
//! circulation:
//!
//! - raw text: `list_price_01-05-24_json_compres.gz\n`
//! - a JSON envelope: `{"content": "<base64 of the raw text>", "encoding": "base64"}`
//!
//! The envelope is tried first; anything that does not parse as one is
//! taken as raw text. Either way the result is trimmed and must be a bare
//! filename: one line, no path separators, not `.` or `..`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PointerEnvelope {
    content: String,
    encoding: String,
}

/// Errors decoding a pointer file.
#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("pointer envelope uses unsupported encoding {0:?}")]
    UnsupportedEncoding(String),
    #[error("pointer envelope content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("pointer content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("pointer names {0:?}, which is not a single filename")]
    InvalidFilename(String),
}

/// Decode pointer file content into a trimmed filename.
///
/// An empty result is returned as-is; deciding whether that is acceptable
/// is up to the caller.
pub fn decode_pointer(raw: &str) -> Result<String, PointerError> {
    let trimmed = raw.trim();
    let Ok(envelope) = serde_json::from_str::<PointerEnvelope>(trimmed) else {
        return checked_filename(trimmed);
    };

    if !envelope.encoding.eq_ignore_ascii_case("base64") {
        return Err(PointerError::UnsupportedEncoding(envelope.encoding));
    }

    // The host wraps base64 payloads at 60 columns.
    let compact: String = envelope
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    checked_filename(String::from_utf8(bytes)?.trim())
}

fn checked_filename(name: &str) -> Result<String, PointerError> {
    let has_separator = name.contains(['\n', '\r', '/', '\\']);
    if has_separator || name == "." || name == ".." {
        return Err(PointerError::InvalidFilename(name.to_string()));
    }
    Ok(name.to_string())
}

/// Pointer file content for `filename`, newline-terminated.
pub fn encode_pointer(filename: &str) -> String {
    format!("{}\n", filename.trim())
}
