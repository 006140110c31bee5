//! Blocking HTTP transport for `sonic-core`, backed by `ureq`.
//!
//! # Design
//! ureq's status-code-as-error behavior is disabled so 4xx/5xx responses come
//! back as data; status interpretation belongs to `RequestClient`. Only
//! connection-level failures become `ClientError::Transport`. Bodies are read
//! whole and decoded lossily, so an oversized or non-UTF-8 body still reaches
//! the JSON parser (and parses to `null` there).

use sonic_core::{ClientConfig, ClientError, HttpMethod, HttpRequest, HttpResponse, RequestClient, Transport};
use tracing::trace;

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        trace!(method = %request.method, url = %request.url, "executing");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // Any body that arrived is a response: no size cap, lossy UTF-8.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A `RequestClient` that talks real HTTP.
pub fn client(config: ClientConfig) -> RequestClient {
    RequestClient::with_config(UreqTransport::new(), config)
}
