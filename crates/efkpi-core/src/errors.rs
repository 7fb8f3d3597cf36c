//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

use crate::enumerations::{BaseUnit, ValueType};

pub type Result<T> = std::result::Result<T, VariableError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VariableError {
    #[error(
        "the variable {variable} is a {value_type} value type and must be one of the following types: {allowed:?}, got {found}"
    )]
    TypeMismatch {
        variable: String,
        value_type: ValueType,
        allowed: Vec<&'static str>,
        found: &'static str,
    },
    #[error("the variable {variable} is a serial value type and cannot be bound to an empty sequence")]
    EmptySeries { variable: String },
    #[error("element {index} of {variable} ({found}) cannot be cast to {target}")]
    ElementCast {
        variable: String,
        index: usize,
        found: String,
        target: &'static str,
    },
    #[error("unable to parse timestamp '{input}' for {variable}")]
    TimestampParse { variable: String, input: String },
    #[error("unequal serial variable lengths: {lengths:?}")]
    UnequalSerialLengths { lengths: Vec<(String, usize)> },
    #[error(
        "discontinuous time series. minimum time interval ({minimum_seconds}s) and maximum time interval ({maximum_seconds}s) are not equal"
    )]
    DiscontinuousTimeSeries {
        minimum_seconds: f64,
        maximum_seconds: f64,
    },
    #[error("at least two timestamps are required to infer resolution, got {count}")]
    InsufficientSamples { count: usize },
    #[error("cannot infer resolution of non-datetime timestamps in {variable}")]
    NonTemporalResolution { variable: String },
    #[error("unsupported resolution unit: {0:?}")]
    UnsupportedUnit(BaseUnit),
    #[error("cannot compare a {axis} time axis with a {bound} window bound")]
    IncomparableBounds {
        axis: &'static str,
        bound: &'static str,
    },
    #[error("required variable {0} has no value")]
    MissingVariable(String),
    #[error("variable {variable} holds {found} values where numbers are required")]
    NonNumeric {
        variable: String,
        found: &'static str,
    },
    #[error("unknown variable name: {0}")]
    UnknownVariable(String),
}
