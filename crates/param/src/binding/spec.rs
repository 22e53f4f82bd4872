use crate::binding::{ParamKind, ParamSource, ParamValue, ScalarKind, SpecError};
use http::HeaderName;

/// Immutable description of one request parameter.
///
/// A spec is required exactly when it carries no default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    source: ParamSource,
    name: String,
    kind: ParamKind,
    default: Option<ParamValue>,
}

impl ParameterSpec {
    /// Starts declaring a parameter, by default a required string
    pub fn builder(source: ParamSource, name: impl Into<String>) -> ParameterSpecBuilder {
        ParameterSpecBuilder { source, name: name.into(), kind: ParamKind::TEXT, default: None }
    }

    pub fn source(&self) -> ParamSource {
        self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// Returns true if the request must supply this parameter
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// Builder for [`ParameterSpec`], validating the declaration on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ParameterSpecBuilder {
    source: ParamSource,
    name: String,
    kind: ParamKind,
    default: Option<ParamValue>,
}

impl ParameterSpecBuilder {
    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    /// Value used when the request does not carry the parameter; makes the parameter optional
    pub fn default_value(mut self, default: ParamValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn build(self) -> Result<ParameterSpec, SpecError> {
        let Self { source, name, kind, default } = self;

        if name.is_empty() {
            return Err(SpecError::EmptyName { location: source });
        }

        if source == ParamSource::Header && HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(SpecError::InvalidHeaderName { name });
        }

        if source == ParamSource::Path && kind.is_sequence() {
            return Err(SpecError::SequenceInPath { name });
        }

        if let ParamKind::Scalar(ScalarKind::Enumeration(variants)) | ParamKind::Sequence(ScalarKind::Enumeration(variants)) =
            &kind
            && variants.is_empty()
        {
            return Err(SpecError::EmptyEnumeration { location: source, name });
        }

        if let Some(default) = &default
            && !kind.accepts(default)
        {
            return Err(SpecError::DefaultMismatch { location: source, name, expected: kind.to_string() });
        }

        Ok(ParameterSpec { source, name, kind, default })
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterSpec;
    use crate::binding::{ParamKind, ParamSource, ParamValue, ScalarKind, SpecError};

    #[test]
    fn test_required_iff_no_default() {
        let required = ParameterSpec::builder(ParamSource::Query, "page").kind(ParamKind::INTEGER).build().unwrap();
        assert!(required.required());
        assert_eq!(required.default_value(), None);

        let optional = ParameterSpec::builder(ParamSource::Query, "page")
            .kind(ParamKind::INTEGER)
            .default_value(ParamValue::Integer(1))
            .build()
            .unwrap();
        assert!(!optional.required());
        assert_eq!(optional.default_value(), Some(&ParamValue::Integer(1)));
    }

    #[test]
    fn test_defaults_to_text() {
        let spec = ParameterSpec::builder(ParamSource::Path, "id").build().unwrap();
        assert_eq!(spec.kind(), &ParamKind::TEXT);
        assert_eq!(spec.source(), ParamSource::Path);
        assert_eq!(spec.name(), "id");
    }

    #[test]
    fn test_empty_name() {
        let result = ParameterSpec::builder(ParamSource::Query, "").build();
        assert_eq!(result, Err(SpecError::EmptyName { location: ParamSource::Query }));
    }

    #[test]
    fn test_invalid_header_name() {
        let result = ParameterSpec::builder(ParamSource::Header, "bad header").build();
        assert_eq!(result, Err(SpecError::InvalidHeaderName { name: "bad header".into() }));

        // mixed case is fine, header names are case-insensitive
        let spec = ParameterSpec::builder(ParamSource::Header, "X-Trace").build().unwrap();
        assert_eq!(spec.name(), "X-Trace");
    }

    #[test]
    fn test_sequence_in_path() {
        let result =
            ParameterSpec::builder(ParamSource::Path, "ids").kind(ParamKind::sequence_of(ScalarKind::Integer)).build();
        assert_eq!(result, Err(SpecError::SequenceInPath { name: "ids".into() }));
    }

    #[test]
    fn test_empty_enumeration() {
        let result = ParameterSpec::builder(ParamSource::Query, "order")
            .kind(ParamKind::enumeration(Vec::<String>::new()))
            .build();
        assert_eq!(result, Err(SpecError::EmptyEnumeration { location: ParamSource::Query, name: "order".into() }));
    }

    #[test]
    fn test_default_mismatch() {
        let result = ParameterSpec::builder(ParamSource::Query, "limit")
            .kind(ParamKind::INTEGER)
            .default_value(ParamValue::Text("ten".into()))
            .build();
        assert_eq!(
            result,
            Err(SpecError::DefaultMismatch {
                location: ParamSource::Query,
                name: "limit".into(),
                expected: "integer".into()
            })
        );

        let result = ParameterSpec::builder(ParamSource::Query, "order")
            .kind(ParamKind::enumeration(["asc", "desc"]))
            .default_value(ParamValue::Variant("random".into()))
            .build();
        assert!(matches!(result, Err(SpecError::DefaultMismatch { .. })));
    }
}
