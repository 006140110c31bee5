//! Flat `{key}` templating.
//!
//! No nesting, loops or conditionals: each payload entry replaces its
//! placeholder, in payload order, case-insensitively. Placeholders without a
//! matching key are left as they are.

use regex::{NoExpand, RegexBuilder};

use crate::payload::Payload;

pub fn template(text: &str, data: &Payload) -> String {
    let mut out = text.to_string();
    for (key, value) in data.iter() {
        let pattern = format!(r"\{{{}\}}", regex::escape(key));
        let placeholder = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping template key");
                continue;
            }
        };
        let replacement = value.to_string();
        out = placeholder
            .replace_all(&out, NoExpand(&replacement))
            .into_owned();
    }
    out
}
