//! Typed, validated input parameters.
//!
//! A [`Parameter<T>`] is a named value slot guarded by a validator. Slots of
//! different value types are stored together as [`AnyParameter`], a tagged
//! variant the engine matches on when converting raw operator text.

mod set;

pub use set::ParameterSet;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value type tag used to select the conversion path for raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Text,
    Integer,
    Decimal,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParamType::Text => "text",
            ParamType::Integer => "integer",
            ParamType::Decimal => "decimal",
        };
        f.write_str(label)
    }
}

/// A parameter's current value, detached from its slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Text(String),
    Integer(i32),
    Decimal(Decimal),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// A value type the engine knows how to store in a parameter.
///
/// Implemented for `String`, `i32` and [`Decimal`]. Each implementation maps
/// the Rust type onto its [`AnyParameter`] variant.
pub trait ParamKind: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Tag reported through [`ParameterHandle::param_type`].
    const TYPE: ParamType;

    fn into_value(self) -> ParamValue;

    fn wrap(param: Parameter<Self>) -> AnyParameter;

    fn downcast(param: &AnyParameter) -> Option<&Parameter<Self>>;
}

impl ParamKind for String {
    const TYPE: ParamType = ParamType::Text;

    fn into_value(self) -> ParamValue {
        ParamValue::Text(self)
    }

    fn wrap(param: Parameter<Self>) -> AnyParameter {
        AnyParameter::Text(param)
    }

    fn downcast(param: &AnyParameter) -> Option<&Parameter<Self>> {
        match param {
            AnyParameter::Text(p) => Some(p),
            _ => None,
        }
    }
}

impl ParamKind for i32 {
    const TYPE: ParamType = ParamType::Integer;

    fn into_value(self) -> ParamValue {
        ParamValue::Integer(self)
    }

    fn wrap(param: Parameter<Self>) -> AnyParameter {
        AnyParameter::Integer(param)
    }

    fn downcast(param: &AnyParameter) -> Option<&Parameter<Self>> {
        match param {
            AnyParameter::Integer(p) => Some(p),
            _ => None,
        }
    }
}

impl ParamKind for Decimal {
    const TYPE: ParamType = ParamType::Decimal;

    fn into_value(self) -> ParamValue {
        ParamValue::Decimal(self)
    }

    fn wrap(param: Parameter<Self>) -> AnyParameter {
        AnyParameter::Decimal(param)
    }

    fn downcast(param: &AnyParameter) -> Option<&Parameter<Self>> {
        match param {
            AnyParameter::Decimal(p) => Some(p),
            _ => None,
        }
    }
}

/// Uniform view over a parameter regardless of its value type.
pub trait ParameterHandle {
    /// Unique name, matched case-insensitively.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Display and processing priority, ascending.
    fn order(&self) -> i32;

    /// Text shown to the operator when input is rejected.
    fn validation_error_text(&self) -> &str;

    fn param_type(&self) -> ParamType;

    /// Restore the value type's default.
    fn reset_value(&mut self);

    fn current_value(&self) -> ParamValue;

    /// Owned snapshot of the metadata, for callers that prompt while mutating the engine.
    fn spec(&self) -> ParameterSpec {
        ParameterSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            order: self.order(),
            param_type: self.param_type(),
            validation_error_text: self.validation_error_text().to_string(),
        }
    }
}

/// Owned parameter metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
    pub order: i32,
    pub param_type: ParamType,
    pub validation_error_text: String,
}

type Validator<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A named value slot of type `T`.
///
/// Assignment through [`Parameter::set_value`] is unchecked; the engine
/// validates before it stores anything.
pub struct Parameter<T: ParamKind> {
    name: String,
    description: String,
    order: i32,
    validator: Validator<T>,
    validation_error_text: String,
    value: T,
}

impl<T: ParamKind> Parameter<T> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        validator: impl Fn(&T) -> bool + Send + Sync + 'static,
        validation_error_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            order,
            validator: Box::new(validator),
            validation_error_text: validation_error_text.into(),
            value: T::default(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Apply the validator to a candidate without storing it.
    pub fn validate_value(&self, candidate: &T) -> bool {
        (self.validator)(candidate)
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: ParamKind> ParameterHandle for Parameter<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn validation_error_text(&self) -> &str {
        &self.validation_error_text
    }

    fn param_type(&self) -> ParamType {
        T::TYPE
    }

    fn reset_value(&mut self) {
        self.value = T::default();
    }

    fn current_value(&self) -> ParamValue {
        self.value.clone().into_value()
    }
}

impl<T: ParamKind> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("type", &T::TYPE)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// A parameter of any supported value type.
#[derive(Debug)]
pub enum AnyParameter {
    Text(Parameter<String>),
    Integer(Parameter<i32>),
    Decimal(Parameter<Decimal>),
}

impl AnyParameter {
    pub fn text(
        name: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        validator: impl Fn(&String) -> bool + Send + Sync + 'static,
        validation_error_text: impl Into<String>,
    ) -> Self {
        Self::Text(Parameter::new(name, description, order, validator, validation_error_text))
    }

    pub fn integer(
        name: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        validator: impl Fn(&i32) -> bool + Send + Sync + 'static,
        validation_error_text: impl Into<String>,
    ) -> Self {
        Self::Integer(Parameter::new(name, description, order, validator, validation_error_text))
    }

    pub fn decimal(
        name: impl Into<String>,
        description: impl Into<String>,
        order: i32,
        validator: impl Fn(&Decimal) -> bool + Send + Sync + 'static,
        validation_error_text: impl Into<String>,
    ) -> Self {
        Self::Decimal(Parameter::new(name, description, order, validator, validation_error_text))
    }

    fn handle(&self) -> &dyn ParameterHandle {
        match self {
            AnyParameter::Text(p) => p as &dyn ParameterHandle,
            AnyParameter::Integer(p) => p,
            AnyParameter::Decimal(p) => p,
        }
    }

    fn handle_mut(&mut self) -> &mut dyn ParameterHandle {
        match self {
            AnyParameter::Text(p) => p as &mut dyn ParameterHandle,
            AnyParameter::Integer(p) => p,
            AnyParameter::Decimal(p) => p,
        }
    }
}

impl<T: ParamKind> From<Parameter<T>> for AnyParameter {
    fn from(param: Parameter<T>) -> Self {
        T::wrap(param)
    }
}

impl ParameterHandle for AnyParameter {
    fn name(&self) -> &str {
        self.handle().name()
    }

    fn description(&self) -> &str {
        self.handle().description()
    }

    fn order(&self) -> i32 {
        self.handle().order()
    }

    fn validation_error_text(&self) -> &str {
        self.handle().validation_error_text()
    }

    fn param_type(&self) -> ParamType {
        self.handle().param_type()
    }

    fn reset_value(&mut self) {
        self.handle_mut().reset_value()
    }

    fn current_value(&self) -> ParamValue {
        self.handle().current_value()
    }
}
