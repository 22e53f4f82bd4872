//! Typed request parameter binding and correlation ids
//!
//! This crate lets a request handler declare the parameters it needs as typed specs, each naming
//! the request component it comes from (path variable, query string or header), its target type
//! and an optional default. Values are resolved lazily: nothing is read from the request until a
//! binding is first accessed, and the result is cached for the rest of the request.
//!
//! It also ships a correlation id interceptor that tags every request with an id, taken from a
//! configurable header or generated, before any handler runs.
//!
//! # Example
//!
//! ```
//! use http::Request;
//! use micro_param::binding::Param;
//! use micro_param::interceptor::{CorrelationIdInterceptor, Interceptors};
//! use micro_param::{PathParams, RequestContext, handler_fn};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let interceptors = Interceptors::builder().add_first(CorrelationIdInterceptor::default()).build();
//!
//! let handler = handler_fn(|req: &RequestContext| {
//!     let limit = Param::<u32>::query("limit").with_default(20).build().unwrap();
//!     req.bind(&limit).value().map(|limit| format!("limit={limit}"))
//! });
//!
//! let header = Request::builder().uri("/items?limit=5").body(()).unwrap().into_parts().0;
//! let params = PathParams::empty();
//! let mut req = RequestContext::new(&header, &params);
//!
//! let response = interceptors.handle(&mut req, &handler).await;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert!(req.correlation_id().is_some());
//! # }
//! ```

mod body;
mod handler;
mod request;
mod responder;

pub mod binding;
pub mod correlation;
pub mod interceptor;

pub use body::ResponseBody;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use handler::handler_fn;
pub use request::ParamLookup;
pub use request::PathParams;
pub use request::RequestContext;
pub use responder::Responder;
