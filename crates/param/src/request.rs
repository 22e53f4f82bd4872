//! Request handling module that provides access to HTTP request information and path parameters.
//!
//! This module contains the core types for working with HTTP requests:
//! - `RequestContext`: Provides access to request headers, query values, path parameters
//!   and per-request data
//! - `PathParams`: Handles URL path parameters extracted from request paths
//! - `ParamLookup`: The raw lookup capability the parameter binder resolves against

use crate::binding::{Bind, Binding};
use crate::correlation::CorrelationId;
use http::request::Parts;
use http::{Extensions, HeaderMap, HeaderValue, Method, Uri, Version};
use matchit::Params;
use once_cell::sync::OnceCell;
use tracing::warn;

/// Raw, string-valued lookups of request parameters by name.
///
/// This is the only capability the parameter binder needs from a request, so
/// anything that can answer these three questions can be bound against.
pub trait ParamLookup: Send + Sync {
    /// Value of the named path variable, if the matched route declared it.
    fn path_variable(&self, name: &str) -> Option<&str>;

    /// All values of the named query parameter in arrival order. Names are case-sensitive.
    fn query_values(&self, name: &str) -> Vec<&str>;

    /// All values of the named header in arrival order, undecoded. Names are case-insensitive.
    fn header_values(&self, name: &str) -> Vec<&[u8]>;
}

/// Represents the context of an HTTP request, providing access to both the request headers
/// and any path parameters extracted from the URL.
///
/// The lifetime parameters ensure that the request context does not outlive the server
/// or the request data it references. Data attached during processing (such as the
/// [`CorrelationId`]) lives in the context's own extensions and is dropped with it.
#[derive(Debug)]
pub struct RequestContext<'server: 'req, 'req> {
    request_header: &'req Parts,
    path_params: &'req PathParams<'server, 'req>,
    extensions: Extensions,
    query_pairs: OnceCell<Vec<(String, String)>>,
}

impl<'server, 'req> RequestContext<'server, 'req> {
    /// Creates a new RequestContext with the given request header and path parameters
    pub fn new(request_header: &'req Parts, path_params: &'req PathParams<'server, 'req>) -> Self {
        Self { request_header, path_params, extensions: Extensions::new(), query_pairs: OnceCell::new() }
    }

    /// Returns a reference to the underlying request head
    pub fn request_header(&self) -> &'req Parts {
        self.request_header
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.request_header.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        &self.request_header.uri
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.request_header.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.request_header.headers
    }

    /// Returns a reference to the path parameters extracted from the request URL
    pub fn path_params(&self) -> &PathParams<'server, 'req> {
        self.path_params
    }

    /// Per-request data attached while the request is processed
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the per-request data
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The correlation id attached to this request, if an interceptor resolved one
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.extensions.get::<CorrelationId>()
    }

    /// Declares a binding of `spec` against this request.
    ///
    /// Nothing is looked up until [`Binding::get`] is first called.
    pub fn bind<'a, S: Bind>(&'a self, spec: &'a S) -> Binding<'a, S> {
        Binding::new(self, spec)
    }

    fn query_pairs(&self) -> &[(String, String)] {
        self.query_pairs.get_or_init(|| {
            let Some(query) = self.uri().query() else {
                return Vec::new();
            };
            serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_else(|e| {
                warn!(query, cause = %e, "malformed query string, treat as empty");
                Vec::new()
            })
        })
    }
}

impl ParamLookup for RequestContext<'_, '_> {
    fn path_variable(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    fn query_values(&self, name: &str) -> Vec<&str> {
        self.query_pairs().iter().filter(|(key, _)| key == name).map(|(_, value)| value.as_str()).collect()
    }

    fn header_values(&self, name: &str) -> Vec<&[u8]> {
        self.headers().get_all(name).iter().map(HeaderValue::as_bytes).collect()
    }
}

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// Path parameters are named segments in the URL path that can be extracted and accessed
/// by name. For example, in the path "/users/{id}", "id" is a path parameter.
#[derive(Debug, Clone)]
pub struct PathParams<'server, 'req> {
    kind: PathParamsKind<'server, 'req>,
}

/// Internal enum to represent either empty parameters or actual parameters
#[derive(Debug, Clone)]
enum PathParamsKind<'server, 'req> {
    None,
    Params(Params<'server, 'req>),
}

impl<'server, 'req> PathParams<'server, 'req> {
    /// Creates a new PathParams instance from the given Params
    /// If the params are empty, returns an empty PathParams instance
    #[inline]
    fn new(params: Params<'server, 'req>) -> Self {
        if params.is_empty() { Self::empty() } else { Self { kind: PathParamsKind::Params(params) } }
    }

    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self { kind: PathParamsKind::None }
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PathParamsKind::None => true,
            PathParamsKind::Params(params) => params.is_empty(),
        }
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            PathParamsKind::None => 0,
            PathParamsKind::Params(params) => params.len(),
        }
    }

    /// Gets the value of a path parameter by its name
    /// Returns None if the parameter doesn't exist
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'req str> {
        match &self.kind {
            PathParamsKind::Params(params) => params.get(key),
            PathParamsKind::None => None,
        }
    }
}

impl<'server, 'req> From<Params<'server, 'req>> for PathParams<'server, 'req> {
    fn from(params: Params<'server, 'req>) -> Self {
        PathParams::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::{ParamLookup, PathParams, RequestContext};
    use http::Request;
    use http::request::Parts;

    fn parts(uri: &str) -> Parts {
        Request::builder()
            .uri(uri)
            .header("X-Trace", "t-1")
            .header("x-trace", "t-2")
            .header("Accept", "text/plain")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_query_values_keep_arrival_order() {
        let header = parts("/items?tag=a&other=x&tag=b&tag=c");
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        assert_eq!(req_ctx.query_values("tag"), vec!["a", "b", "c"]);
        assert_eq!(req_ctx.query_values("other"), vec!["x"]);
        assert!(req_ctx.query_values("missing").is_empty());
    }

    #[test]
    fn test_query_values_are_case_sensitive_and_decoded() {
        let header = parts("/items?Name=upper&name=hello%20world&q=a+b");
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        assert_eq!(req_ctx.query_values("name"), vec!["hello world"]);
        assert_eq!(req_ctx.query_values("Name"), vec!["upper"]);
        assert_eq!(req_ctx.query_values("q"), vec!["a b"]);
    }

    #[test]
    fn test_no_query_string() {
        let header = parts("/items");
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        assert!(req_ctx.query_values("tag").is_empty());
    }

    #[test]
    fn test_header_values_are_case_insensitive() {
        let header = parts("/");
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        assert_eq!(req_ctx.header_values("X-TRACE"), vec![b"t-1".as_slice(), b"t-2".as_slice()]);
        assert_eq!(req_ctx.header_values("x-trace"), vec![b"t-1".as_slice(), b"t-2".as_slice()]);
        assert_eq!(req_ctx.header_values("accept"), vec![b"text/plain".as_slice()]);
        assert!(req_ctx.header_values("x-missing").is_empty());
    }

    #[test]
    fn test_path_variable_from_matched_route() {
        let mut router = matchit::Router::new();
        router.insert("/users/{id}", ()).unwrap();
        let matched = router.at("/users/42").unwrap();

        let header = parts("/users/42");
        let params = PathParams::from(matched.params);
        let req_ctx = RequestContext::new(&header, &params);

        assert_eq!(req_ctx.path_params().len(), 1);
        assert_eq!(req_ctx.path_variable("id"), Some("42"));
        assert_eq!(req_ctx.path_variable("name"), None);
    }

    #[test]
    fn test_empty_path_params() {
        let params = PathParams::empty();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
        assert_eq!(params.get("id"), None);
    }
}
