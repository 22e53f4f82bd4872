//! Hooks run around every request handler.
//!
//! An [`Interceptor`] sees the request before the handler runs and the response after
//! it. [`Interceptors`] chains them in order; [`Interceptors::handle`] drives one request
//! through the chain and a handler.

mod correlation_id;

pub use correlation_id::CorrelationIdInterceptor;
pub use correlation_id::CorrelationIdInterceptorBuilder;

use crate::correlation::CorrelationId;
use crate::handler::RequestHandler;
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::Response;
use tracing::{Instrument, Span};

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, _req: &mut RequestContext<'_, '_>) {}

    async fn on_response(&self, _req: &RequestContext<'_, '_>, _resp: &mut Response<ResponseBody>) {}
}

pub struct Interceptors {
    inner: Vec<Box<dyn Interceptor>>,
}

#[async_trait]
impl Interceptor for Interceptors {
    async fn on_request(&self, req: &mut RequestContext<'_, '_>) {
        for interceptor in &self.inner {
            interceptor.on_request(req).await;
        }
    }

    async fn on_response(&self, req: &RequestContext<'_, '_>, resp: &mut Response<ResponseBody>) {
        for interceptor in &self.inner {
            interceptor.on_response(req, resp).await;
        }
    }
}

impl Interceptors {
    pub fn builder() -> InterceptorsBuilder {
        InterceptorsBuilder::new()
    }

    /// Processes one request: every `on_request` hook, then the handler, then every
    /// `on_response` hook.
    ///
    /// When a correlation id was attached the handler runs inside its span.
    pub async fn handle(&self, req: &mut RequestContext<'_, '_>, handler: &dyn RequestHandler) -> Response<ResponseBody> {
        self.on_request(req).await;

        let span = req.correlation_id().map_or_else(Span::none, CorrelationId::span);
        let mut response = handler.invoke(req).instrument(span).await;

        self.on_response(req, &mut response).await;
        response
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors").field("len", &self.inner.len()).finish()
    }
}

#[derive(Default)]
pub struct InterceptorsBuilder {
    inner: Vec<Box<dyn Interceptor>>,
}

impl InterceptorsBuilder {
    fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn add_last<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.push(Box::new(interceptor));
        self
    }

    pub fn add_first<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.insert(0, Box::new(interceptor));
        self
    }

    pub fn build(self) -> Interceptors {
        Interceptors { inner: self.inner }
    }
}

impl std::fmt::Debug for InterceptorsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorsBuilder").field("len", &self.inner.len()).finish()
    }
}
