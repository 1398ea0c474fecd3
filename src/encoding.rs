//! Decoding raw OFX bytes to text.

use crate::error::{Error, Result};
use crate::sgml::LegacyHeader;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

/// Decode `bytes` with the encoding named by `label`.
///
/// Without a label the input is read as UTF-8 (a byte order mark is
/// honoured). Legacy exports that are not valid UTF-8 fall back to the
/// charset named in their `CHARSET` header line, e.g. `1252`.
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<String> {
    if let Some(label) = label {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), "input has byte sequences invalid for the encoding");
        }
        return Ok(text.into_owned());
    }

    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    let header = LegacyHeader::parse(&text);
    match header.charset().and_then(charset_encoding) {
        Some(encoding) => {
            debug!(encoding = encoding.name(), "decoding with the header charset");
            Ok(encoding.decode(bytes).0.into_owned())
        }
        None => {
            warn!("input is not valid UTF-8; invalid bytes were replaced");
            Ok(text.into_owned())
        }
    }
}

/// Map a legacy `CHARSET` value to an encoding. Bare code pages such as
/// `1252` are Windows code pages.
fn charset_encoding(charset: &str) -> Option<&'static Encoding> {
    let charset = charset.trim();
    if charset.is_empty() || charset.eq_ignore_ascii_case("NONE") {
        return None;
    }

    if charset.bytes().all(|b| b.is_ascii_digit()) {
        Encoding::for_label(format!("windows-{}", charset).as_bytes())
    } else {
        Encoding::for_label(charset.as_bytes())
    }
}
