use crate::correlation::{ConfigError, CorrelationId, CorrelationIdConfig};
use crate::interceptor::Interceptor;
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Response};
use tracing::warn;

/// Attaches a [`CorrelationId`] to every request before the handler runs.
///
/// Register it with [`InterceptorsBuilder::add_first`](crate::interceptor::InterceptorsBuilder::add_first)
/// so every later hook and the handler can read the id.
#[derive(Debug, Clone)]
pub struct CorrelationIdInterceptor {
    header_name: HeaderName,
    echo_response: bool,
}

impl Default for CorrelationIdInterceptor {
    fn default() -> Self {
        Self { header_name: HeaderName::from_static("x-correlation-id"), echo_response: false }
    }
}

impl CorrelationIdInterceptor {
    pub fn builder() -> CorrelationIdInterceptorBuilder {
        CorrelationIdInterceptorBuilder { config: CorrelationIdConfig::default() }
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }
}

impl TryFrom<CorrelationIdConfig> for CorrelationIdInterceptor {
    type Error = ConfigError;

    fn try_from(config: CorrelationIdConfig) -> Result<Self, Self::Error> {
        Ok(Self { header_name: config.header_name()?, echo_response: config.echo_response })
    }
}

#[derive(Debug, Clone)]
pub struct CorrelationIdInterceptorBuilder {
    config: CorrelationIdConfig,
}

impl CorrelationIdInterceptorBuilder {
    pub fn header_name(mut self, header_name: impl Into<String>) -> Self {
        self.config.header_name = header_name.into();
        self
    }

    pub fn echo_response(mut self, echo_response: bool) -> Self {
        self.config.echo_response = echo_response;
        self
    }

    pub fn build(self) -> Result<CorrelationIdInterceptor, ConfigError> {
        CorrelationIdInterceptor::try_from(self.config)
    }
}

#[async_trait]
impl Interceptor for CorrelationIdInterceptor {
    async fn on_request(&self, req: &mut RequestContext<'_, '_>) {
        CorrelationId::attach(req, &self.header_name);
    }

    async fn on_response(&self, req: &RequestContext<'_, '_>, resp: &mut Response<ResponseBody>) {
        if !self.echo_response {
            return;
        }

        let Some(id) = req.correlation_id() else {
            return;
        };

        match HeaderValue::from_bytes(id.as_str().as_bytes()) {
            Ok(value) => {
                resp.headers_mut().insert(self.header_name.clone(), value);
            }
            Err(e) => warn!(correlation_id = %id, cause = %e, "can't echo correlation id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CorrelationIdInterceptor;
    use crate::correlation::{ConfigError, CorrelationIdConfig, CorrelationSource};
    use crate::handler::handler_fn;
    use crate::interceptor::Interceptors;
    use crate::request::PathParams;
    use crate::RequestContext;
    use http::{HeaderValue, Request};

    #[test]
    fn test_builder() {
        let interceptor = CorrelationIdInterceptor::builder().header_name("X-Request-Id").build().unwrap();
        assert_eq!(interceptor.header_name().as_str(), "x-request-id");

        let interceptor = CorrelationIdInterceptor::default();
        assert_eq!(interceptor.header_name().as_str(), "x-correlation-id");

        let error = CorrelationIdInterceptor::builder().header_name("").build().unwrap_err();
        assert_eq!(error, ConfigError::InvalidHeaderName { name: String::new() });
    }

    #[test]
    fn test_from_config() {
        let config: CorrelationIdConfig =
            serde_json::from_str(r#"{ "header_name": "X-Trace-Id", "echo_response": true }"#).unwrap();
        let interceptor = CorrelationIdInterceptor::try_from(config).unwrap();
        assert_eq!(interceptor.header_name().as_str(), "x-trace-id");
        assert!(interceptor.echo_response);
    }

    #[tokio::test]
    async fn test_echo_response() {
        let interceptor = CorrelationIdInterceptor::builder().echo_response(true).build().unwrap();
        let interceptors = Interceptors::builder().add_first(interceptor).build();

        let header = Request::builder().uri("/").body(()).unwrap().into_parts().0;
        let params = PathParams::empty();
        let mut req_ctx = RequestContext::new(&header, &params);

        let response = interceptors.handle(&mut req_ctx, &handler_fn(|_req: &RequestContext| "ok")).await;

        let id = req_ctx.correlation_id().unwrap();
        assert_eq!(id.source(), CorrelationSource::Generated);
        assert_eq!(response.headers().get("x-correlation-id").unwrap(), id.as_str());
    }

    #[tokio::test]
    async fn test_echo_non_ascii_id() {
        let interceptor = CorrelationIdInterceptor::builder().echo_response(true).build().unwrap();
        let interceptors = Interceptors::builder().add_first(interceptor).build();

        let value = HeaderValue::from_bytes("trace-café".as_bytes()).unwrap();
        let header = Request::builder().uri("/").header("x-correlation-id", value.clone()).body(()).unwrap().into_parts().0;
        let params = PathParams::empty();
        let mut req_ctx = RequestContext::new(&header, &params);

        let response = interceptors.handle(&mut req_ctx, &handler_fn(|_req: &RequestContext| "ok")).await;

        assert_eq!(req_ctx.correlation_id().unwrap().as_str(), "trace-café");
        assert_eq!(response.headers().get("x-correlation-id"), Some(&value));
    }

    #[tokio::test]
    async fn test_no_echo_by_default() {
        let interceptors = Interceptors::builder().add_first(CorrelationIdInterceptor::default()).build();

        let header = Request::builder().uri("/").header("X-Correlation-Id", "abc").body(()).unwrap().into_parts().0;
        let params = PathParams::empty();
        let mut req_ctx = RequestContext::new(&header, &params);

        let response = interceptors.handle(&mut req_ctx, &handler_fn(|_req: &RequestContext| "ok")).await;

        assert_eq!(req_ctx.correlation_id().unwrap().as_str(), "abc");
        assert!(response.headers().get("x-correlation-id").is_none());
    }
}
