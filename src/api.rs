//! Thin client over the backend's REST contract.
//!
//! The student-facing call lives in `student`, the dashboard calls in `teacher`.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use crate::{
    error::{PortalError, Result},
    model::error_body::ErrorBody,
};

pub mod student;
pub mod teacher;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| PortalError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Joins an API path or a stored file path onto the base URL. Paths that
    /// are already absolute URLs are returned untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turns a non-2xx response into an `Api` error, using `pick` to choose a
/// message from the error body and `fallback` when it offers none.
async fn reject(
    response: Response,
    pick: impl Fn(&ErrorBody) -> Option<&str>,
    fallback: &str,
) -> PortalError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let body = ErrorBody::parse(&body);
    let message = pick(&body).unwrap_or(fallback).to_owned();

    debug!("Request rejected with {status}: {message}");
    PortalError::Api { status, message }
}
