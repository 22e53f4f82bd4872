use crate::request::ParamLookup;
use serde::Serialize;
use std::fmt;

/// Where in the request a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    /// A named placeholder of the matched route, e.g. `id` in `/users/{id}`
    Path,
    /// A (possibly repeated) query string value
    Query,
    /// A request header, matched case-insensitively
    Header,
}

impl ParamSource {
    /// Returns the lowercase name of the source
    pub fn as_str(self) -> &'static str {
        match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::Header => "header",
        }
    }

    /// Raw values for `name` from this source, in arrival order.
    ///
    /// Path variables yield at most one value. A header value that is not valid UTF-8 is
    /// returned as the error, lossily decoded.
    pub(crate) fn lookup<'l>(self, lookup: &'l dyn ParamLookup, name: &str) -> Result<Vec<&'l str>, String> {
        match self {
            ParamSource::Path => Ok(lookup.path_variable(name).into_iter().collect()),
            ParamSource::Query => Ok(lookup.query_values(name)),
            ParamSource::Header => lookup
                .header_values(name)
                .into_iter()
                .map(|bytes| std::str::from_utf8(bytes).map_err(|_e| String::from_utf8_lossy(bytes).into_owned()))
                .collect(),
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
