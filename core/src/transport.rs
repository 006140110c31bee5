//! The seam between request building and actual I/O.

use std::sync::Arc;

use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
///
/// Any response the server produces, whatever its status, is `Ok`. `Err` is
/// reserved for requests that never got a response.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).execute(request)
    }
}
