use http::{Request, StatusCode};
use http_body_util::BodyExt;
use micro_param::binding::{Param, ParamError};
use micro_param::correlation::CorrelationIdConfig;
use micro_param::interceptor::{CorrelationIdInterceptor, Interceptors};
use micro_param::{PathParams, RequestContext, handler_fn, param_enum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

param_enum! {
    pub enum Order {
        Asc = "asc",
        Desc = "desc",
    }
}

fn list_comments(req: &RequestContext) -> Result<String, ParamError> {
    let post_id = Param::<u64>::path("post_id").build().unwrap();
    let limit = Param::<u32>::query("limit").with_default(20).build().unwrap();
    let order = Param::<Order>::query("order").with_default(Order::Desc).build().unwrap();
    let tags = Param::<Vec<String>>::query("tag").with_default(vec![]).build().unwrap();
    let locale = Param::<String>::header("Accept-Language").with_default("en".into()).build().unwrap();

    let post_id = req.bind(&post_id);
    let limit = req.bind(&limit);
    let order = req.bind(&order);
    let tags = req.bind(&tags);
    let locale = req.bind(&locale);

    info!("listing comments");
    Ok(format!(
        "post={} limit={} order={} tags={:?} locale={}\r\n",
        post_id.value()?,
        limit.value()?,
        order.value()?.as_str(),
        tags.get()?,
        locale.get()?,
    ))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config: CorrelationIdConfig =
        serde_json::from_str(r#"{ "echo_response": true }"#).expect("correlation config should be valid");
    let correlation = CorrelationIdInterceptor::try_from(config).expect("header name should be valid");
    let interceptors = Interceptors::builder().add_first(correlation).build();

    let mut router = matchit::Router::new();
    router.insert("/posts/{post_id}/comments", ()).expect("route should be valid");

    let handler = handler_fn(list_comments);

    let requests = [
        Request::builder()
            .uri("/posts/42/comments?limit=5&tag=rust&tag=http&order=asc")
            .header("X-Correlation-Id", "client-trace-1")
            .header("Accept-Language", "de")
            .body(())
            .unwrap(),
        Request::builder().uri("/posts/42/comments").body(()).unwrap(),
        Request::builder().uri("/posts/42/comments?limit=lots").body(()).unwrap(),
        Request::builder().uri("/posts/latest/comments").body(()).unwrap(),
    ];

    for request in requests {
        let (header, ()) = request.into_parts();
        let Ok(matched) = router.at(header.uri.path()) else {
            info!(uri = %header.uri, "no route");
            continue;
        };

        let params = PathParams::from(matched.params);
        let mut req = RequestContext::new(&header, &params);

        let response = interceptors.handle(&mut req, &handler).await;
        let status = response.status();
        let echoed = response.headers().get("x-correlation-id").cloned();
        let body = response.into_body().collect().await.expect("body is infallible").to_bytes();

        if status == StatusCode::OK {
            info!(uri = %header.uri, ?echoed, body = %String::from_utf8_lossy(&body), "ok");
        } else {
            info!(uri = %header.uri, %status, ?echoed, body = %String::from_utf8_lossy(&body), "rejected");
        }
    }
}
