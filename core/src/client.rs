//! Callback-based request client.
//!
//! # Design
//! `RequestClient` holds its configuration and a shared `Transport`; it keeps
//! no per-request state. Every request goes through the same three steps:
//! `build_request` (pure, validates arguments), `Transport::execute` (the only
//! I/O), and `parse_response` (pure). `send` runs the last two on a worker
//! thread and hands the parsed body to a `FnOnce` callback, so the callback
//! can run at most once by construction and runs exactly once per response.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, PostBody, StatusPolicy};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::Payload;
use crate::serialize::serialize;
use crate::transport::Transport;

/// Content type announced on every POST.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Completion callback: parsed body plus the response it came from.
pub type Callback = Box<dyn FnOnce(Value, &HttpResponse) + Send + 'static>;

/// One request's inputs. Built per call and consumed by it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub url: String,
    pub payload: Payload,
    pub method: HttpMethod,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: Payload::new(),
            method: HttpMethod::Get,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

/// A parsed response. `source` is the raw response for status and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub body: Value,
    pub source: HttpResponse,
}

/// Handle to a request in flight.
///
/// Dropping it does not cancel anything; the callback still fires.
#[derive(Debug)]
pub struct Pending {
    handle: JoinHandle<Result<(), ClientError>>,
}

impl Pending {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the request completes.
    ///
    /// `Ok` means the callback ran. Transport failures, rejected statuses and
    /// a panicking callback come back as errors.
    pub fn wait(self) -> Result<(), ClientError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => Err(ClientError::Callback(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

#[derive(Clone)]
pub struct RequestClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start building a request to `url`.
    pub fn request(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            descriptor: RequestDescriptor::new(url),
            on_complete: None,
        }
    }

    /// Issue one request and call `on_complete` with its parsed body.
    ///
    /// `url` and `on_complete` are required; a missing or empty one fails here,
    /// before anything is sent. `payload` defaults to empty and `method` to GET.
    pub fn send<F>(
        &self,
        url: Option<&str>,
        payload: Option<Payload>,
        on_complete: Option<F>,
        method: Option<HttpMethod>,
    ) -> Result<Pending, ClientError>
    where
        F: FnOnce(Value, &HttpResponse) + Send + 'static,
    {
        let mut builder = self
            .request(url.unwrap_or_default())
            .payload(payload.unwrap_or_default())
            .method(method.unwrap_or_default());
        if let Some(f) = on_complete {
            builder = builder.on_complete(f);
        }
        builder.send()
    }

    /// Blocking, callback-free round trip.
    pub fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Response, ClientError> {
        let request = self.build_request(descriptor)?;
        let response = self.transport.execute(&request)?;
        self.parse_response(response)
    }

    /// Turn a descriptor into the wire request without sending it.
    ///
    /// GET appends `?` and the serialized payload to the URL, even when the
    /// payload is empty or the URL already has a query. POST sets the form
    /// content type; its body follows `ClientConfig::post_body`.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ClientError> {
        if descriptor.url.is_empty() {
            return Err(ClientError::InvalidArgument("url is required".to_string()));
        }
        let url = self.resolve(&descriptor.url);

        match descriptor.method {
            HttpMethod::Get => Ok(HttpRequest {
                method: HttpMethod::Get,
                url: format!("{url}?{}", serialize(&descriptor.payload)),
                headers: Vec::new(),
                body: None,
            }),
            HttpMethod::Post => {
                let body = match self.config.post_body {
                    PostBody::Raw => serde_json::to_string(&descriptor.payload)
                        .map_err(|e| ClientError::Serialization(e.to_string()))?,
                    PostBody::Form => serialize(&descriptor.payload),
                };
                Ok(HttpRequest {
                    method: HttpMethod::Post,
                    url,
                    headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
                    body: Some(body),
                })
            }
        }
    }

    /// Parse a response body as JSON.
    ///
    /// An empty or malformed body parses to `null` rather than failing.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Response, ClientError> {
        if self.config.status_policy == StatusPolicy::Error && !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let body = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body).unwrap_or_else(|e| {
                warn!(status = response.status, error = %e, "response body is not JSON");
                Value::Null
            })
        };
        Ok(Response {
            body,
            source: response,
        })
    }

    fn resolve(&self, url: &str) -> String {
        match &self.config.base_url {
            Some(base) if url.starts_with('/') => {
                format!("{}{url}", base.trim_end_matches('/'))
            }
            _ => url.to_string(),
        }
    }

    fn dispatch(&self, request: HttpRequest, on_complete: Callback) -> Result<Pending, ClientError> {
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let client = self.clone();
        let handle = thread::Builder::new()
            .name("sonic-request".to_string())
            .spawn(move || {
                let response = client.transport.execute(&request).map_err(|e| {
                    warn!(url = %request.url, error = %e, "request failed");
                    e
                })?;
                let Response { body, source } = client.parse_response(response)?;
                debug!(url = %request.url, status = source.status, "request completed");
                on_complete(body, &source);
                Ok(())
            })
            .map_err(|e| ClientError::Transport(format!("cannot spawn request thread: {e}")))?;
        Ok(Pending { handle })
    }
}

/// Fluent form of `RequestClient::send`.
pub struct RequestBuilder<'a> {
    client: &'a RequestClient,
    descriptor: RequestDescriptor,
    on_complete: Option<Callback>,
}

impl RequestBuilder<'_> {
    pub fn payload(mut self, payload: Payload) -> Self {
        self.descriptor.payload = payload;
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.descriptor.method = method;
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Value, &HttpResponse) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn send(self) -> Result<Pending, ClientError> {
        let request = self.client.build_request(&self.descriptor)?;
        let on_complete = self
            .on_complete
            .ok_or_else(|| ClientError::InvalidArgument("callback is required".to_string()))?;
        self.client.dispatch(request, on_complete)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn json(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                    body: body.to_string(),
                },
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn client() -> RequestClient {
        RequestClient::new(Canned::json(200, "{}"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn get_appends_serialized_payload() {
        let descriptor = RequestDescriptor::new("http://localhost:3000/search")
            .with_payload(Payload::new().with("q", "rust lang").with("page", 2));
        let req = client().build_request(&descriptor).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/search?q=rust%20lang&page=2");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn get_with_empty_payload_keeps_trailing_question_mark() {
        let req = client().build_request(&RequestDescriptor::new("/api")).unwrap();
        assert_eq!(req.url, "/api?");
    }

    #[test]
    fn get_appends_even_when_url_has_query() {
        let req = client().build_request(&RequestDescriptor::new("/api?x=1")).unwrap();
        assert_eq!(req.url, "/api?x=1?");
    }

    #[test]
    fn post_sends_raw_payload_by_default() {
        let descriptor = RequestDescriptor::new("/api")
            .with_payload(Payload::new().with("x", "1"))
            .with_method(HttpMethod::Post);
        let req = client().build_request(&descriptor).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "/api");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"x": "1"}));
    }

    #[test]
    fn post_sends_form_when_configured() {
        let config = ClientConfig::default().with_post_body(PostBody::Form);
        let client = RequestClient::with_config(Canned::json(200, "{}"), config);
        let descriptor = RequestDescriptor::new("/api")
            .with_payload(Payload::new().with("x", "1").with("y", "a b"))
            .with_method(HttpMethod::Post);
        let req = client.build_request(&descriptor).unwrap();
        assert_eq!(req.body.as_deref(), Some("x=1&y=a%20b"));
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = client().build_request(&RequestDescriptor::new("")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[test]
    fn relative_urls_resolve_against_base() {
        let config = ClientConfig::default().with_base_url("http://localhost:3000/");
        let client = RequestClient::with_config(Canned::json(200, "{}"), config);
        let req = client.build_request(&RequestDescriptor::new("/echo")).unwrap();
        assert_eq!(req.url, "http://localhost:3000/echo?");
        let req = client
            .build_request(&RequestDescriptor::new("http://other/echo"))
            .unwrap();
        assert_eq!(req.url, "http://other/echo?");
    }

    #[test]
    fn parse_response_reads_json() {
        let parsed = client().parse_response(response(200, r#"{"ok":true}"#)).unwrap();
        assert_eq!(parsed.body, json!({"ok": true}));
        assert_eq!(parsed.source.status, 200);
    }

    #[test]
    fn parse_response_bad_json_is_null() {
        let parsed = client().parse_response(response(200, "not json")).unwrap();
        assert_eq!(parsed.body, Value::Null);
        assert_eq!(parsed.source.body, "not json");
    }

    #[test]
    fn parse_response_empty_body_is_null() {
        let parsed = client().parse_response(response(204, "")).unwrap();
        assert_eq!(parsed.body, Value::Null);
    }

    #[test]
    fn parse_response_ignores_status_by_default() {
        let parsed = client().parse_response(response(500, r#"{"error":"boom"}"#)).unwrap();
        assert_eq!(parsed.body["error"], "boom");
        assert_eq!(parsed.source.status, 500);
    }

    #[test]
    fn parse_response_rejects_status_when_configured() {
        let config = ClientConfig::default().with_status_policy(StatusPolicy::Error);
        let client = RequestClient::with_config(Canned::json(200, "{}"), config);
        let err = client.parse_response(response(404, "missing")).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[test]
    fn fetch_runs_one_round_trip() {
        let transport = Arc::new(Canned::json(200, r#"{"n":1}"#));
        let client = RequestClient::new(Arc::clone(&transport));
        let parsed = client.fetch(&RequestDescriptor::new("/api")).unwrap();
        assert_eq!(parsed.body, json!({"n": 1}));
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_callback_is_rejected_before_sending() {
        let transport = Arc::new(Canned::json(200, "{}"));
        let client = RequestClient::new(Arc::clone(&transport));
        let err = client.request("/api").send().unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn callback_panic_is_reported() {
        let pending = client()
            .request("/api")
            .on_complete(|_, _| panic!("boom"))
            .send()
            .unwrap();
        let err = pending.wait().unwrap_err();
        assert!(matches!(err, ClientError::Callback(msg) if msg == "boom"));
    }
}
