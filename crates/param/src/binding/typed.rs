//! Rust types as parameter targets.
//!
//! [`ParamType`] ties a Rust type to the [`ParamKind`] descriptor the binder coerces with,
//! so `Param::<u32>::query("limit")` and a hand built integer [`ParameterSpec`] resolve the
//! same way.

use crate::binding::{Bind, ParamKind, ParamSource, ParamValue, ParameterSpec, ScalarKind, SpecError};
use std::marker::PhantomData;

/// A Rust type a request parameter can be bound to.
pub trait ParamType: Sized + Clone + Send + Sync {
    /// The descriptor raw values are coerced with
    fn kind() -> ParamKind;

    /// Converts a coerced value, `None` if it does not fit this type
    fn from_value(value: ParamValue) -> Option<Self>;

    fn into_value(self) -> ParamValue;

    /// The accepted values, as named in coercion errors
    fn expected() -> String {
        Self::kind().to_string()
    }

    /// Like [`from_value`](Self::from_value), but a failure carries the position of the
    /// first element that does not fit. Scalars fail at position `0`.
    fn try_from_value(value: ParamValue) -> Result<Self, usize> {
        Self::from_value(value).ok_or(0)
    }
}

/// A [`ParamType`] that is a single value, and so can be an element of a `Vec` param.
pub trait ScalarParam: ParamType {
    fn scalar_kind() -> ScalarKind;
}

impl ParamType for String {
    fn kind() -> ParamKind {
        ParamKind::TEXT
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Text(self)
    }
}

impl ScalarParam for String {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::Text
    }
}

impl ParamType for bool {
    fn kind() -> ParamKind {
        ParamKind::BOOLEAN
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Boolean(self)
    }
}

impl ScalarParam for bool {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::Boolean
    }
}

impl ParamType for f64 {
    fn kind() -> ParamKind {
        ParamKind::FLOAT
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        value.as_f64()
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Float(self)
    }
}

impl ScalarParam for f64 {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::Float
    }
}

impl ParamType for f32 {
    fn kind() -> ParamKind {
        ParamKind::FLOAT
    }

    #[allow(clippy::cast_possible_truncation, reason = "f32 params accept f32 precision")]
    fn from_value(value: ParamValue) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Float(f64::from(self))
    }
}

impl ScalarParam for f32 {
    fn scalar_kind() -> ScalarKind {
        ScalarKind::Float
    }
}

/// Integers are coerced as `i64` and then narrowed; a value out of the target's range
/// does not convert. `u64` and `usize` therefore accept at most `i64::MAX`.
macro_rules! integer_param {
    ($($ty:ty)*) => {
        $(
        impl ParamType for $ty {
            fn kind() -> ParamKind {
                ParamKind::INTEGER
            }

            fn from_value(value: ParamValue) -> Option<Self> {
                value.as_i64().and_then(|i| <$ty>::try_from(i).ok())
            }

            fn into_value(self) -> ParamValue {
                ParamValue::Integer(i64::try_from(self).unwrap_or(i64::MAX))
            }

            fn expected() -> String {
                let min = i64::try_from(<$ty>::MIN).unwrap_or(i64::MIN);
                let max = i64::try_from(<$ty>::MAX).unwrap_or(i64::MAX);
                if min == i64::MIN && max == i64::MAX {
                    String::from("integer")
                } else {
                    format!("integer in {min}..={max}")
                }
            }
        }

        impl ScalarParam for $ty {
            fn scalar_kind() -> ScalarKind {
                ScalarKind::Integer
            }
        }
        )*
    };
}

integer_param! { i8 i16 i32 i64 isize u8 u16 u32 u64 usize }

impl<T: ScalarParam> ParamType for Vec<T> {
    fn kind() -> ParamKind {
        ParamKind::Sequence(T::scalar_kind())
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        Self::try_from_value(value).ok()
    }

    fn into_value(self) -> ParamValue {
        ParamValue::Sequence(self.into_iter().map(ParamType::into_value).collect())
    }

    fn expected() -> String {
        format!("list of {}", T::expected())
    }

    fn try_from_value(value: ParamValue) -> Result<Self, usize> {
        match value {
            ParamValue::Sequence(items) => {
                items.into_iter().enumerate().map(|(position, item)| T::from_value(item).ok_or(position)).collect()
            }
            _ => Err(0),
        }
    }
}

/// Declares a fieldless enum that can be bound as an enumeration parameter.
///
/// Each variant is paired with the exact text a request must carry. The enum derives
/// `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`.
///
/// ```
/// use micro_param::binding::Param;
/// use micro_param::param_enum;
///
/// param_enum! {
///     pub enum Order {
///         Asc = "asc",
///         Desc = "desc",
///     }
/// }
///
/// let order = Param::<Order>::query("order").with_default(Order::Asc).build().unwrap();
/// assert_eq!(order.spec().kind().to_string(), "one of [asc, desc]");
/// assert_eq!(Order::Desc.as_str(), "desc");
/// ```
#[macro_export]
macro_rules! param_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
        }

        impl $name {
            /// Every accepted text, in declaration order
            pub const VARIANTS: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl $crate::binding::ParamType for $name {
            fn kind() -> $crate::binding::ParamKind {
                $crate::binding::ParamKind::Scalar(<Self as $crate::binding::ScalarParam>::scalar_kind())
            }

            fn from_value(value: $crate::binding::ParamValue) -> ::core::option::Option<Self> {
                match value {
                    $crate::binding::ParamValue::Variant(variant) => match variant.as_str() {
                        $($text => ::core::option::Option::Some($name::$variant),)+
                        _ => ::core::option::Option::None,
                    },
                    _ => ::core::option::Option::None,
                }
            }

            fn into_value(self) -> $crate::binding::ParamValue {
                $crate::binding::ParamValue::Variant(::std::string::String::from(self.as_str()))
            }
        }

        impl $crate::binding::ScalarParam for $name {
            fn scalar_kind() -> $crate::binding::ScalarKind {
                $crate::binding::ScalarKind::enumeration(Self::VARIANTS.iter().copied())
            }
        }
    };
}

/// A parameter declaration bound to the Rust type `T`.
#[derive(Debug, Clone)]
pub struct Param<T> {
    spec: ParameterSpec,
    default: Option<T>,
}

impl<T: ParamType> Param<T> {
    pub fn builder(source: ParamSource, name: impl Into<String>) -> ParamBuilder<T> {
        ParamBuilder { source, name: name.into(), default: None, _phantom: PhantomData }
    }

    /// Declares a path variable; the name is the placeholder in the route
    pub fn path(name: impl Into<String>) -> ParamBuilder<T> {
        Self::builder(ParamSource::Path, name)
    }

    /// Declares a query parameter; names are case-sensitive
    pub fn query(name: impl Into<String>) -> ParamBuilder<T> {
        Self::builder(ParamSource::Query, name)
    }

    /// Declares a header parameter; names are case-insensitive
    pub fn header(name: impl Into<String>) -> ParamBuilder<T> {
        Self::builder(ParamSource::Header, name)
    }

    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

impl<T: ParamType> Bind for Param<T> {
    type Output = T;

    fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    fn default_output(&self) -> Option<T> {
        self.default.clone()
    }

    fn expected(&self) -> String {
        T::expected()
    }

    fn convert(&self, value: ParamValue) -> Result<T, usize> {
        T::try_from_value(value)
    }
}

/// Builder for [`Param`].
#[derive(Debug)]
pub struct ParamBuilder<T> {
    source: ParamSource,
    name: String,
    default: Option<T>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: ParamType> ParamBuilder<T> {
    /// Value used when the request does not carry the parameter; makes the parameter optional
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    pub fn build(self) -> Result<Param<T>, SpecError> {
        let mut builder = ParameterSpec::builder(self.source, self.name).kind(T::kind());
        if let Some(default) = &self.default {
            builder = builder.default_value(default.clone().into_value());
        }

        Ok(Param { spec: builder.build()?, default: self.default })
    }
}

#[cfg(test)]
mod tests {
    use super::{Param, ParamType};
    use crate::binding::{ParamKind, ParamSource, ParamValue, ScalarKind, SpecError};

    crate::param_enum! {
        enum Color {
            Red = "red",
            Green = "green",
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(String::kind(), ParamKind::TEXT);
        assert_eq!(u16::kind(), ParamKind::INTEGER);
        assert_eq!(f32::kind(), ParamKind::FLOAT);
        assert_eq!(bool::kind(), ParamKind::BOOLEAN);
        assert_eq!(<Vec<i64>>::kind(), ParamKind::sequence_of(ScalarKind::Integer));
        assert_eq!(Color::kind(), ParamKind::enumeration(["red", "green"]));
        assert_eq!(<Vec<Color>>::kind(), ParamKind::sequence_of(ScalarKind::enumeration(["red", "green"])));
    }

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(u8::from_value(ParamValue::Integer(255)), Some(255));
        assert_eq!(u8::from_value(ParamValue::Integer(256)), None);
        assert_eq!(u32::from_value(ParamValue::Integer(-1)), None);
        assert_eq!(i64::from_value(ParamValue::Integer(i64::MIN)), Some(i64::MIN));
        assert_eq!(u64::MAX.into_value(), ParamValue::Integer(i64::MAX));
        assert_eq!(i32::from_value(ParamValue::Text("1".into())), None);
    }

    #[test]
    fn test_sequence_conversion() {
        let value = ParamValue::Sequence(vec![ParamValue::Integer(1), ParamValue::Integer(2)]);
        assert_eq!(<Vec<u8>>::from_value(value), Some(vec![1, 2]));

        let value = ParamValue::Sequence(vec![ParamValue::Integer(1), ParamValue::Integer(1000)]);
        assert_eq!(<Vec<u8>>::from_value(value), None);

        assert_eq!(<Vec<u8>>::from_value(ParamValue::Integer(1)), None);

        let value = ParamValue::Sequence(vec![ParamValue::Integer(1), ParamValue::Integer(2), ParamValue::Integer(300)]);
        assert_eq!(<Vec<u8>>::try_from_value(value), Err(2));
    }

    #[test]
    fn test_expected_names_the_range() {
        assert_eq!(u8::expected(), "integer in 0..=255");
        assert_eq!(i16::expected(), "integer in -32768..=32767");
        assert_eq!(u64::expected(), "integer in 0..=9223372036854775807");
        assert_eq!(i64::expected(), "integer");
        assert_eq!(<Vec<u8>>::expected(), "list of integer in 0..=255");
        assert_eq!(String::expected(), "string");
        assert_eq!(Color::expected(), "one of [red, green]");
    }

    #[test]
    fn test_enum_conversion() {
        assert_eq!(Color::from_value(ParamValue::Variant("green".into())), Some(Color::Green));
        assert_eq!(Color::from_value(ParamValue::Variant("blue".into())), None);
        assert_eq!(Color::from_value(ParamValue::Text("red".into())), None);
        assert_eq!(Color::Red.into_value(), ParamValue::Variant("red".into()));
        assert_eq!(Color::VARIANTS, &["red", "green"]);
    }

    #[test]
    fn test_typed_builder_mirrors_default_into_spec() {
        let param = Param::<u32>::query("limit").with_default(20).build().unwrap();
        assert_eq!(param.spec().source(), ParamSource::Query);
        assert_eq!(param.spec().kind(), &ParamKind::INTEGER);
        assert_eq!(param.spec().default_value(), Some(&ParamValue::Integer(20)));
        assert_eq!(param.default_value(), Some(&20));
        assert!(!param.spec().required());

        let param = Param::<Color>::header("X-Color").build().unwrap();
        assert!(param.spec().required());
    }

    #[test]
    fn test_typed_builder_rejects_list_path() {
        let result = Param::<Vec<String>>::path("ids").build();
        assert_eq!(result.unwrap_err(), SpecError::SequenceInPath { name: "ids".into() });
    }
}
