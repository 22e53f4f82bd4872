use crate::binding::ParamSource;
use crate::responder::Responder;
use crate::{RequestContext, ResponseBody};
use http::{Response, StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure to resolve a bound parameter from the request.
///
/// Both variants describe bad client input and are answered with `400 Bad Request`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing required {location} parameter '{name}', expected {expected}")]
    Missing { location: ParamSource, name: String, expected: String },

    #[error("invalid {location} parameter '{name}': cannot convert '{raw}' to {expected}")]
    Coercion { location: ParamSource, name: String, raw: String, expected: String },
}

impl ParamError {
    pub fn missing<S: ToString, E: ToString>(location: ParamSource, name: S, expected: E) -> Self {
        Self::Missing { location, name: name.to_string(), expected: expected.to_string() }
    }

    pub fn coercion<S: ToString, R: ToString, E: ToString>(location: ParamSource, name: S, raw: R, expected: E) -> Self {
        Self::Coercion { location, name: name.to_string(), raw: raw.to_string(), expected: expected.to_string() }
    }

    /// Where the parameter was looked up
    pub fn location(&self) -> ParamSource {
        match self {
            ParamError::Missing { location, .. } | ParamError::Coercion { location, .. } => *location,
        }
    }

    /// The parameter name
    pub fn name(&self) -> &str {
        match self {
            ParamError::Missing { name, .. } | ParamError::Coercion { name, .. } => name,
        }
    }

    /// Description of the values the parameter accepts
    pub fn expected(&self) -> &str {
        match self {
            ParamError::Missing { expected, .. } | ParamError::Coercion { expected, .. } => expected,
        }
    }
}

impl Responder for ParamError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let message = self.to_string();
        let body = match self {
            ParamError::Missing { location, name, expected } => json!({
                "error": "missing_parameter",
                "location": location,
                "name": name,
                "expected": expected,
                "message": message,
            }),
            ParamError::Coercion { location, name, raw, expected } => json!({
                "error": "invalid_parameter",
                "location": location,
                "name": name,
                "raw": raw,
                "expected": expected,
                "message": message,
            }),
        };

        (StatusCode::BAD_REQUEST, body).response_to(req)
    }
}

/// A parameter declaration that can never resolve, reported when the spec is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("{location} parameter name must not be empty")]
    EmptyName { location: ParamSource },

    #[error("'{name}' is not a valid header name")]
    InvalidHeaderName { name: String },

    #[error("path parameter '{name}' can not be bound to a list, path variables are single valued")]
    SequenceInPath { name: String },

    #[error("default value of {location} parameter '{name}' is not a {expected}")]
    DefaultMismatch { location: ParamSource, name: String, expected: String },

    #[error("enumeration of {location} parameter '{name}' declares no variants")]
    EmptyEnumeration { location: ParamSource, name: String },
}

#[cfg(test)]
mod tests {
    use super::ParamError;
    use crate::binding::{ParamKind, ParamSource};
    use crate::request::PathParams;
    use crate::responder::Responder;
    use crate::RequestContext;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;

    #[test]
    fn test_messages() {
        let missing = ParamError::missing(ParamSource::Query, "limit", &ParamKind::INTEGER);
        assert_eq!(missing.to_string(), "missing required query parameter 'limit', expected integer");
        assert_eq!(missing.location(), ParamSource::Query);
        assert_eq!(missing.name(), "limit");
        assert_eq!(missing.expected(), "integer");

        let invalid = ParamError::coercion(ParamSource::Path, "id", "abc", &ParamKind::INTEGER);
        assert_eq!(invalid.to_string(), "invalid path parameter 'id': cannot convert 'abc' to integer");
    }

    #[tokio::test]
    async fn test_response_is_bad_request_with_details() {
        let header = Request::builder().uri("/users/abc").body(()).unwrap().into_parts().0;
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        let error = ParamError::coercion(ParamSource::Path, "id", "abc", &ParamKind::INTEGER);
        let response = error.response_to(&req_ctx);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get(http::header::CONTENT_TYPE).unwrap(), "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid_parameter");
        assert_eq!(body["location"], "path");
        assert_eq!(body["name"], "id");
        assert_eq!(body["raw"], "abc");
        assert_eq!(body["expected"], "integer");
    }

    #[tokio::test]
    async fn test_missing_response_names_expected_type() {
        let header = Request::builder().uri("/").body(()).unwrap().into_parts().0;
        let params = PathParams::empty();
        let req_ctx = RequestContext::new(&header, &params);

        let response = ParamError::missing(ParamSource::Header, "X-Tenant", &ParamKind::TEXT).response_to(&req_ctx);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "missing_parameter");
        assert_eq!(body["location"], "header");
        assert_eq!(body["name"], "X-Tenant");
        assert_eq!(body["expected"], "string");
        assert!(body.get("raw").is_none());
    }
}
