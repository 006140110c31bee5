//! Client configuration.
//!
//! # Design
//! The defaults reproduce the library's historical wire behavior: POST bodies
//! carry the raw payload and HTTP status is not inspected. Both are switches
//! rather than silent fixes so callers opt in explicitly.

use serde::Deserialize;

use crate::error::ClientError;

/// What a POST request carries as its body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostBody {
    /// The payload mapping itself, encoded as a JSON object, even though the
    /// content type announces a form.
    #[default]
    Raw,
    /// The form-encoded payload, matching the content type.
    Form,
}

/// How non-2xx responses are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any response completes the request and reaches the callback.
    #[default]
    Ignore,
    /// Non-2xx responses become `ClientError::Status`; the callback is skipped.
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Prefix for URLs starting with `/`.
    pub base_url: Option<String>,
    pub post_body: PostBody,
    pub status_policy: StatusPolicy,
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_post_body(mut self, post_body: PostBody) -> Self {
        self.post_body = post_body;
        self
    }

    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }
}
