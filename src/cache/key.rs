use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Namespace shared by every cached analysis.
pub const CACHE_PREFIX: &str = "analysis_";

/// Key under which the recent analyses list is persisted.
pub const RECENT_KEY: &str = "recent_analyses";

/// Same characters `encodeURIComponent` leaves alone.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn cache_key(url: &str) -> String {
    format!("{CACHE_PREFIX}{}", utf8_percent_encode(url, COMPONENT))
}

/// Inverse of [`cache_key`]. `None` for keys outside the namespace.
pub fn url_from_key(key: &str) -> Option<String> {
    let encoded = key.strip_prefix(CACHE_PREFIX)?;
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|url| url.into_owned())
}
