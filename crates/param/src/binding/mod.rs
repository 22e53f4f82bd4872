//! Typed, lazily resolved request parameter bindings.
//!
//! A binding is declared in two steps. First an immutable spec is built once,
//! naming the parameter's source, name, target kind and optional default:
//!
//! ```
//! use micro_param::binding::Param;
//!
//! let limit = Param::<u32>::query("limit").with_default(20).build().unwrap();
//! let tags = Param::<Vec<String>>::query("tag").build().unwrap();
//! assert!(!limit.spec().required());
//! assert!(tags.spec().required());
//! ```
//!
//! Then, while handling a request, [`RequestContext::bind`](crate::RequestContext::bind)
//! pairs the spec with the request. The raw value is looked up and coerced on the first
//! call to [`Binding::get`] and cached for the rest of the request, so a binding that is
//! never read never fails.
//!
//! Specs with a runtime type descriptor are available through [`ParameterSpec`] and
//! [`ParamKind`] when the target type is only known at runtime.

mod cell;
mod error;
mod kind;
mod source;
mod spec;
mod typed;

pub use cell::Bind;
pub use cell::Binding;
pub use error::ParamError;
pub use error::SpecError;
pub use kind::ParamKind;
pub use kind::ParamValue;
pub use kind::ScalarKind;
pub use source::ParamSource;
pub use spec::ParameterSpec;
pub use spec::ParameterSpecBuilder;
pub use typed::Param;
pub use typed::ParamBuilder;
pub use typed::ParamType;
pub use typed::ScalarParam;
