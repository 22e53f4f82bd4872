//! Per-request correlation ids.
//!
//! A correlation id ties together the log entries and downstream calls that belong to
//! one originating request. It is taken verbatim from a configurable request header when
//! the caller supplied one, and minted as a random UUID otherwise. The resolved id is
//! stored in the [`RequestContext`] extensions so handlers and loggers can read it for the
//! rest of the request.

mod config;

pub use config::ConfigError;
pub use config::CorrelationIdConfig;
pub use config::DEFAULT_HEADER_NAME;

use crate::RequestContext;
use http::{HeaderMap, HeaderName};
use std::fmt;
use tracing::{Span, debug, info_span};
use uuid::Uuid;

/// How a [`CorrelationId`] came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationSource {
    /// Taken from the incoming request header
    Extracted,
    /// Minted because the request carried none
    Generated,
}

/// The correlation id of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId {
    value: String,
    source: CorrelationSource,
}

impl CorrelationId {
    /// Reads the id from `header_name`, or generates one when the header is absent,
    /// blank or not valid UTF-8. Only the first value of a repeated header is used.
    pub fn resolve(headers: &HeaderMap, header_name: &HeaderName) -> Self {
        let extracted = headers
            .get(header_name)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .filter(|value| !value.trim().is_empty());

        match extracted {
            Some(value) => Self { value: value.to_owned(), source: CorrelationSource::Extracted },
            None => Self::generate(),
        }
    }

    /// Mints a new random id
    pub fn generate() -> Self {
        Self { value: Uuid::new_v4().to_string(), source: CorrelationSource::Generated }
    }

    /// Resolves the id of `req` and stores it in the request extensions.
    ///
    /// An id attached earlier in the same request is kept and returned unchanged.
    pub fn attach<'a>(req: &'a mut RequestContext<'_, '_>, header_name: &HeaderName) -> &'a CorrelationId {
        let request_header = req.request_header();
        req.extensions_mut().get_or_insert_with(|| {
            let id = Self::resolve(&request_header.headers, header_name);
            debug!(correlation_id = %id, source = ?id.source, header = %header_name, "attach correlation id");
            id
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> CorrelationSource {
        self.source
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// A span carrying this id, for instrumenting work done on behalf of the request
    pub fn span(&self) -> Span {
        info_span!("request", correlation_id = %self.value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
