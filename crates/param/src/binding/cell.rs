use crate::binding::{ParamError, ParamSource, ParamValue, ParameterSpec};
use crate::request::ParamLookup;
use once_cell::sync::OnceCell;
use std::fmt;
use tracing::{debug, trace, warn};

/// A declaration that can be resolved against a request.
///
/// Implemented by [`ParameterSpec`], which yields the coerced [`ParamValue`], and by
/// [`Param<T>`](crate::binding::Param), which yields a `T`.
pub trait Bind {
    type Output: Send + Sync;

    fn spec(&self) -> &ParameterSpec;

    /// The already typed value used when the request lacks the parameter
    fn default_output(&self) -> Option<Self::Output>;

    /// The accepted values, as named in parameter errors
    fn expected(&self) -> String {
        self.spec().kind().to_string()
    }

    /// Converts a coerced value to the output. A failure carries the position of the raw
    /// value that does not fit.
    fn convert(&self, value: ParamValue) -> Result<Self::Output, usize>;
}

impl Bind for ParameterSpec {
    type Output = ParamValue;

    fn spec(&self) -> &ParameterSpec {
        self
    }

    fn default_output(&self) -> Option<ParamValue> {
        self.default_value().cloned()
    }

    fn convert(&self, value: ParamValue) -> Result<ParamValue, usize> {
        Ok(value)
    }
}

/// A declared parameter paired with one request.
///
/// The value is resolved on the first [`get`](Self::get) and the outcome, value or error,
/// is kept for the lifetime of the binding.
pub struct Binding<'a, S: Bind> {
    lookup: &'a dyn ParamLookup,
    bind: &'a S,
    cell: OnceCell<Result<S::Output, ParamError>>,
}

impl<'a, S: Bind> Binding<'a, S> {
    pub fn new(lookup: &'a dyn ParamLookup, bind: &'a S) -> Self {
        Self { lookup, bind, cell: OnceCell::new() }
    }

    /// Resolves the parameter on first call, then returns the cached outcome
    pub fn get(&self) -> Result<&S::Output, ParamError> {
        self.cell.get_or_init(|| resolve(self.lookup, self.bind)).as_ref().map_err(Clone::clone)
    }

    /// Like [`get`](Self::get) but returns an owned value
    pub fn value(&self) -> Result<S::Output, ParamError>
    where
        S::Output: Clone,
    {
        self.get().cloned()
    }

    /// Returns true once the parameter has been resolved
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn spec(&self) -> &ParameterSpec {
        self.bind.spec()
    }
}

impl<S: Bind> fmt::Debug for Binding<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("spec", self.bind.spec()).field("resolved", &self.is_resolved()).finish()
    }
}

fn resolve<S: Bind>(lookup: &dyn ParamLookup, bind: &S) -> Result<S::Output, ParamError> {
    let spec = bind.spec();
    let (location, name) = (spec.source(), spec.name());

    let raw = location.lookup(lookup, name).map_err(|undecodable| {
        debug!(%location, name, raw = %undecodable, "parameter is not valid utf-8");
        ParamError::coercion(location, name, undecodable, bind.expected())
    })?;
    trace!(%location, name, values = raw.len(), "resolving parameter");

    if raw.is_empty() {
        if let Some(default) = bind.default_output() {
            return Ok(default);
        }

        if location == ParamSource::Path {
            warn!(name, "path variable is not declared by the matched route");
        }
        debug!(%location, name, "required parameter is missing");
        return Err(ParamError::missing(location, name, bind.expected()));
    }

    let value = spec.kind().coerce(&raw).map_err(|invalid| {
        debug!(%location, name, raw = invalid, expected = %spec.kind(), "parameter coercion failed");
        ParamError::coercion(location, name, invalid, bind.expected())
    })?;

    // coercion maps raw values one to one, so the position indexes `raw`
    bind.convert(value).map_err(|position| {
        let invalid = raw.get(position).copied().unwrap_or_default();
        let expected = bind.expected();
        debug!(%location, name, raw = invalid, %expected, "parameter does not fit the target type");
        ParamError::coercion(location, name, invalid, expected)
    })
}
