//! Small request, templating and querystring helpers.
//!
//! # Overview
//! - `RequestClient` issues one HTTP request per call and hands the parsed
//!   JSON body to a completion callback exactly once.
//! - `serialize` turns a flat `Payload` into a querystring.
//! - `template` fills `{key}` placeholders from a `Payload`.
//! - `select_parent` finds the nearest matching ancestor in a host element tree.
//!
//! # Design
//! - The core never performs I/O itself. Requests are built and responses
//!   parsed as plain data; a `Transport` implementation does the round trip.
//! - There is no global instance. Construct a `RequestClient` and pass it
//!   where it is needed.

pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod http;
pub mod payload;
pub mod serialize;
pub mod template;
pub mod transport;

pub use client::{Callback, Pending, RequestBuilder, RequestClient, RequestDescriptor, Response, FORM_CONTENT_TYPE};
pub use config::{ClientConfig, PostBody, StatusPolicy};
pub use dom::{select_parent, Element};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{Payload, Primitive};
pub use serialize::serialize;
pub use template::template;
pub use transport::Transport;
