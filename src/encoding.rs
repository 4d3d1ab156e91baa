//! Character encoding detection for raw markup.
//!
//! Used by [`Document::from_bytes`](crate::Document::from_bytes) to turn bytes
//! of unknown encoding into the UTF-8 text the parser expects. The charset is
//! sniffed from `<meta>` declarations in the first kilobyte.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Bytes examined when sniffing for a charset declaration.
const SNIFF_LIMIT: usize = 1024;

/// Matches both `<meta charset="...">` and
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?[\s;"']charset\s*=\s*["']?([-\w.:]+)"#).expect("valid regex")
});

/// Charset label declared in the markup head, if any.
#[must_use]
pub fn declared_charset(markup: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&markup[..markup.len().min(SNIFF_LIMIT)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Encoding to decode `markup` with: the declared one when the label is
/// known, UTF-8 otherwise.
#[must_use]
pub fn sniff_encoding(markup: &[u8]) -> &'static Encoding {
    declared_charset(markup)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode markup to UTF-8, replacing malformed sequences with U+FFFD.
#[must_use]
pub fn decode_markup(markup: &[u8]) -> Cow<'_, str> {
    let encoding = sniff_encoding(markup);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(markup);
    }
    let (decoded, used, had_errors) = encoding.decode(markup);
    if had_errors {
        tracing::debug!(encoding = used.name(), "replaced malformed byte sequences");
    }
    decoded
}
