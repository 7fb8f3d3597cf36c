//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
pub mod datetime;
pub mod enumerations;
pub mod errors;
pub mod kpi;
pub mod primitive_type;
pub mod registry;
pub mod unit;
pub mod value;
pub mod variable;
pub mod variable_set;

pub use datetime::{TimestampParser, DEFAULT_TIMESTAMP_FORMATS};
pub use enumerations::{BaseUnit, KpiCategory, OperationCondition, ValueType};
pub use errors::{Result, VariableError};
pub use primitive_type::{PrimitiveType, PrimitiveTypeInfo};
pub use registry::{DefaultVariable, VariableName};
pub use unit::Unit;
pub use value::{RawValue, Scalar, ScalarKind, Series, Value};
pub use variable::{Variable, VariableInfo, VariableKind};
pub use variable_set::{TimeAxis, VariableInputs, VariableSet};
