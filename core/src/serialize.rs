//! Querystring serialization of flat payloads.

use crate::payload::Payload;

/// Percent-encode each entry as `key=value` and join them with `&`.
///
/// Entries appear in payload order. An empty payload yields an empty string.
pub fn serialize(payload: &Payload) -> String {
    payload
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
