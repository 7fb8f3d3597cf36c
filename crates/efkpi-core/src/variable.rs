//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Named, typed value slots and the coercion that binds raw input to them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    datetime::{self, TimestampParser},
    enumerations::{BaseUnit, OperationCondition, ValueType},
    errors::{Result, VariableError},
    primitive_type::{PrimitiveType, PrimitiveTypeInfo},
    unit::Unit,
    value::{RawValue, Scalar, ScalarKind, Series, Value},
};

/// Coercion flavour of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Values are validated against the value type as given.
    Standard,
    /// Values are routed to timestep indices or parsed into timestamps first.
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub snake_case_name: String,
    pub definition: String,
    pub primitive_type: PrimitiveTypeInfo,
    pub value_type: ValueType,
    pub unit: String,
    pub operation_condition: OperationCondition,
    pub efont_uri: Option<String>,
    pub brick_uri: Option<String>,
}

/// A named value slot with a declared shape.
///
/// Instances start unbound; [`Variable::bind`] consumes the template and
/// returns the bound variable, so a value is assigned exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    definition: String,
    primitive_type: PrimitiveType,
    value_type: ValueType,
    operation_condition: OperationCondition,
    unit: Option<Unit>,
    kind: VariableKind,
    efont_uri: Option<String>,
    brick_uri: Option<String>,
    value: Option<Value>,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        definition: impl Into<String>,
        primitive_type: PrimitiveType,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            primitive_type,
            value_type,
            operation_condition: OperationCondition::default(),
            unit: None,
            kind: VariableKind::Standard,
            efont_uri: None,
            brick_uri: None,
            value: None,
        }
    }

    /// A timestamp-typed variable accepting timestamps or timestep indices.
    pub fn datetime(
        name: impl Into<String>,
        definition: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            kind: VariableKind::DateTime,
            ..Self::new(name, definition, PrimitiveType::timestamp(), value_type)
        }
    }

    pub fn with_operation_condition(mut self, condition: OperationCondition) -> Self {
        self.operation_condition = condition;
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_uris(mut self, efont_uri: Option<String>, brick_uri: Option<String>) -> Self {
        self.efont_uri = efont_uri;
        self.brick_uri = brick_uri;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn primitive_type(&self) -> &PrimitiveType {
        &self.primitive_type
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn operation_condition(&self) -> OperationCondition {
        self.operation_condition
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn snake_case_name(&self) -> String {
        self.name.trim().replace(' ', "_")
    }

    /// Explicit unit, falling back to the primitive type's default.
    pub fn unit(&self) -> &Unit {
        self.unit.as_ref().unwrap_or(&self.primitive_type.unit)
    }

    pub fn info(&self) -> VariableInfo {
        VariableInfo {
            name: self.name.clone(),
            snake_case_name: self.snake_case_name(),
            definition: self.definition.clone(),
            primitive_type: self.primitive_type.info(),
            value_type: self.value_type,
            unit: self.unit().to_string(),
            operation_condition: self.operation_condition,
            efont_uri: self.efont_uri.clone(),
            brick_uri: self.brick_uri.clone(),
        }
    }

    /// Length of a bound serial value.
    pub fn series_len(&self) -> Option<usize> {
        self.value.as_ref().and_then(Value::as_series).map(Series::len)
    }

    /// Binds `raw` using the default timestamp formats.
    pub fn bind(self, raw: impl Into<RawValue>) -> Result<Self> {
        self.bind_with(raw, &TimestampParser::default())
    }

    /// Binds `raw`, parsing timestamp strings with `parser`.
    pub fn bind_with(mut self, raw: impl Into<RawValue>, parser: &TimestampParser) -> Result<Self> {
        let variable = self.snake_case_name();
        let mut raw = raw.into();
        if self.kind == VariableKind::DateTime {
            raw = datetime::prepare(&variable, self.value_type, raw, parser)?;
        }

        self.value = coerce(&variable, self.value_type, raw)?;
        debug!(
            variable = %variable,
            value_type = %self.value_type,
            bound = self.value.is_some(),
            length = self.series_len(),
            "variable bound"
        );
        Ok(self)
    }

    /// Uniform sampling step of the bound timestamps, or of `samples` when given.
    pub fn get_resolution(&self, unit: BaseUnit, samples: Option<&[NaiveDateTime]>) -> Result<f64> {
        let own = self
            .value
            .as_ref()
            .and_then(Value::as_series)
            .and_then(Series::as_datetimes)
            .ok_or_else(|| VariableError::NonTemporalResolution {
                variable: self.snake_case_name(),
            })?;
        datetime::resolution(samples.unwrap_or(own), unit)
    }
}

fn type_mismatch(variable: &str, value_type: ValueType, found: &'static str) -> VariableError {
    VariableError::TypeMismatch {
        variable: variable.to_owned(),
        value_type,
        allowed: value_type.allowed_names(),
        found,
    }
}

/// Validates `raw` against `value_type` and materializes the typed payload.
fn coerce(variable: &str, value_type: ValueType, raw: RawValue) -> Result<Option<Value>> {
    if raw.is_absent() {
        return Ok(None);
    }

    match value_type {
        ValueType::Single => to_scalar(raw)
            .map(|scalar| Some(Value::Single(scalar)))
            .ok_or_else(|| type_mismatch(variable, value_type, "list")),
        ValueType::Serial => match raw {
            RawValue::List(items) => to_series(variable, items).map(|series| Some(Value::Serial(series))),
            other => Err(type_mismatch(variable, value_type, other.kind_name())),
        },
    }
}

fn to_scalar(raw: RawValue) -> Option<Scalar> {
    match raw {
        RawValue::Str(v) => Some(Scalar::Str(v)),
        RawValue::Int(v) => Some(Scalar::Int(v)),
        RawValue::Float(v) => Some(Scalar::Float(v)),
        RawValue::Bool(v) => Some(Scalar::Bool(v)),
        RawValue::DateTime(v) => Some(Scalar::DateTime(v)),
        RawValue::Absent | RawValue::List(_) => None,
    }
}

/// Builds a series whose element kind is taken from the first element.
fn to_series(variable: &str, items: Vec<RawValue>) -> Result<Series> {
    let first = items.first().ok_or_else(|| VariableError::EmptySeries {
        variable: variable.to_owned(),
    })?;
    let kind = first
        .scalar_kind()
        .ok_or_else(|| type_mismatch(variable, ValueType::Serial, first.kind_name()))?;

    if items.iter().any(|item| item.scalar_kind() != Some(kind)) {
        warn!(
            variable,
            element_kind = kind.name(),
            "serial input mixes element kinds; casting to the kind of the first element"
        );
    }

    let cast_error = |index: usize, item: &RawValue| VariableError::ElementCast {
        variable: variable.to_owned(),
        index,
        found: format!("{:?}", item),
        target: kind.name(),
    };

    macro_rules! collect_as {
        ($variant:ident, $cast:ident) => {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| $cast(item).ok_or_else(|| cast_error(index, item)))
                .collect::<Result<Vec<_>>>()
                .map(Series::$variant)
        };
    }

    match kind {
        ScalarKind::Float => collect_as!(Float, cast_float),
        ScalarKind::Int => collect_as!(Int, cast_int),
        ScalarKind::Bool => collect_as!(Bool, cast_bool),
        ScalarKind::Str => collect_as!(Str, cast_str),
        ScalarKind::DateTime => collect_as!(DateTime, cast_datetime),
    }
}

fn cast_float(item: &RawValue) -> Option<f64> {
    match item {
        RawValue::Float(v) => Some(*v),
        RawValue::Int(v) => Some(*v as f64),
        RawValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        RawValue::Str(v) => v.trim().parse().ok(),
        RawValue::Absent => Some(f64::NAN),
        RawValue::DateTime(_) | RawValue::List(_) => None,
    }
}

fn cast_int(item: &RawValue) -> Option<i64> {
    match item {
        RawValue::Int(v) => Some(*v),
        RawValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
        RawValue::Bool(v) => Some(i64::from(*v)),
        RawValue::Str(v) => v.trim().parse().ok(),
        _ => None,
    }
}

fn cast_bool(item: &RawValue) -> Option<bool> {
    match item {
        RawValue::Bool(v) => Some(*v),
        RawValue::Int(v) => Some(*v != 0),
        RawValue::Float(v) => Some(*v != 0.0),
        RawValue::Absent => Some(false),
        _ => None,
    }
}

fn cast_str(item: &RawValue) -> Option<String> {
    match item {
        RawValue::Str(v) => Some(v.clone()),
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Float(v) => Some(format!("{:?}", v)),
        RawValue::Bool(v) => Some(if *v { "True" } else { "False" }.to_owned()),
        RawValue::DateTime(v) => Some(v.to_string()),
        RawValue::Absent => Some("None".to_owned()),
        RawValue::List(_) => None,
    }
}

fn cast_datetime(item: &RawValue) -> Option<NaiveDateTime> {
    match item {
        RawValue::DateTime(v) => Some(*v),
        _ => None,
    }
}
