use crate::body::ResponseBody;
use crate::responder::Responder;
use crate::RequestContext;
use async_trait::async_trait;
use http::Response;

/// Application logic invoked once per request, after the request interceptors ran.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke<'server, 'req>(&self, req: &RequestContext<'server, 'req>) -> Response<ResponseBody>;
}

/// A [`RequestHandler`] backed by a plain function of the request context
#[derive(Debug, Clone, Copy)]
pub struct FnHandler<F> {
    f: F,
}

/// Wraps `f` as a [`RequestHandler`]; its result is turned into the response through [`Responder`].
///
/// ```
/// use micro_param::binding::Param;
/// use micro_param::{RequestContext, handler_fn};
///
/// let handler = handler_fn(|req: &RequestContext| {
///     let name = Param::<String>::query("name").with_default("world".into()).build().unwrap();
///     req.bind(&name).value().map(|name| format!("hello {name}"))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, R>(f: F) -> FnHandler<F>
where
    F: Fn(&RequestContext) -> R + Send + Sync,
    R: Responder,
{
    FnHandler { f }
}

#[async_trait]
impl<F, R> RequestHandler for FnHandler<F>
where
    F: Fn(&RequestContext) -> R + Send + Sync,
    R: Responder,
{
    async fn invoke<'server, 'req>(&self, req: &RequestContext<'server, 'req>) -> Response<ResponseBody> {
        (self.f)(req).response_to(req)
    }
}
