//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Raw caller input and the typed payloads it is coerced into.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Element kinds a bound value may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Str,
    Int,
    Float,
    Bool,
    DateTime,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Str => "str",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::DateTime => "datetime",
        }
    }
}

/// Value as handed over by a caller, before any validation.
///
/// `Absent` and a NaN `Float` both mean "not supplied".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(NaiveDateTime),
    List(Vec<RawValue>),
}

impl RawValue {
    /// `true` for the sentinels that normalize to an absent value.
    pub fn is_absent(&self) -> bool {
        match self {
            RawValue::Absent => true,
            RawValue::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Absent => "NoneType",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Str(_) => "str",
            RawValue::DateTime(_) => "datetime",
            RawValue::List(_) => "list",
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            RawValue::Bool(_) => Some(ScalarKind::Bool),
            RawValue::Int(_) => Some(ScalarKind::Int),
            RawValue::Float(_) => Some(ScalarKind::Float),
            RawValue::Str(_) => Some(ScalarKind::Str),
            RawValue::DateTime(_) => Some(ScalarKind::DateTime),
            RawValue::Absent | RawValue::List(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(i64::from(value))
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Str(value)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        RawValue::DateTime(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Absent, Into::into)
    }
}

impl From<Scalar> for RawValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(v) => RawValue::Str(v),
            Scalar::Int(v) => RawValue::Int(v),
            Scalar::Float(v) => RawValue::Float(v),
            Scalar::Bool(v) => RawValue::Bool(v),
            Scalar::DateTime(v) => RawValue::DateTime(v),
        }
    }
}

impl From<Series> for RawValue {
    fn from(value: Series) -> Self {
        match value {
            Series::Str(v) => v.into(),
            Series::Int(v) => v.into(),
            Series::Float(v) => v.into(),
            Series::Bool(v) => v.into(),
            Series::DateTime(v) => v.into(),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Single(scalar) => scalar.into(),
            Value::Serial(series) => series.into(),
        }
    }
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Str(_) => ScalarKind::Str,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::DateTime(_) => ScalarKind::DateTime,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Scalar::Str(_) | Scalar::DateTime(_) => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A fixed-length homogeneous sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Series {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    DateTime(Vec<NaiveDateTime>),
}

impl Series {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Series::Str(_) => ScalarKind::Str,
            Series::Int(_) => ScalarKind::Int,
            Series::Float(_) => ScalarKind::Float,
            Series::Bool(_) => ScalarKind::Bool,
            Series::DateTime(_) => ScalarKind::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Str(v) => v.len(),
            Series::Int(v) => v.len(),
            Series::Float(v) => v.len(),
            Series::Bool(v) => v.len(),
            Series::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index` as a scalar.
    pub fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            Series::Str(v) => v.get(index).cloned().map(Scalar::Str),
            Series::Int(v) => v.get(index).copied().map(Scalar::Int),
            Series::Float(v) => v.get(index).copied().map(Scalar::Float),
            Series::Bool(v) => v.get(index).copied().map(Scalar::Bool),
            Series::DateTime(v) => v.get(index).copied().map(Scalar::DateTime),
        }
    }

    /// Numeric view of the series; booleans count as 0/1.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            Series::Float(v) => Some(v.clone()),
            Series::Int(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Series::Bool(v) => Some(v.iter().map(|x| if *x { 1.0 } else { 0.0 }).collect()),
            Series::Str(_) | Series::DateTime(_) => None,
        }
    }

    pub fn as_datetimes(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Series::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Series::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Series::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Keeps the elements whose mask entry is `true`. The mask must be aligned
    /// with the series; surplus entries on either side are ignored.
    pub fn select(&self, mask: &[bool]) -> Series {
        fn pick<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect()
        }

        match self {
            Series::Str(v) => Series::Str(pick(v, mask)),
            Series::Int(v) => Series::Int(pick(v, mask)),
            Series::Float(v) => Series::Float(pick(v, mask)),
            Series::Bool(v) => Series::Bool(pick(v, mask)),
            Series::DateTime(v) => Series::DateTime(pick(v, mask)),
        }
    }
}

/// A coerced payload, shaped according to the variable's value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Single(Scalar),
    Serial(Series),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Single(scalar) => Some(scalar),
            Value::Serial(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Value::Serial(series) => Some(series),
            Value::Single(_) => None,
        }
    }

    /// Scalar kind of the payload, or of the series elements.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Single(scalar) => scalar.kind(),
            Value::Serial(series) => series.kind(),
        }
    }
}
