//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Cross-validated collection of bound variables and the evaluation window
//! derived from them.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

use crate::{
    datetime::TimestampParser,
    enumerations::{BaseUnit, ValueType},
    errors::{Result, VariableError},
    registry::{DefaultVariable, VariableName},
    value::{RawValue, Scalar, Series, Value},
    variable::Variable,
};

/// Raw values keyed by canonical variable name.
///
/// Deserializes from a JSON/TOML table whose keys are the snake_case names;
/// `null` entries are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableInputs(IndexMap<VariableName, RawValue>);

impl VariableInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: VariableName, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: VariableName, value: impl Into<RawValue>) {
        self.0.insert(name, value.into());
    }

    pub fn get(&self, name: VariableName) -> Option<&RawValue> {
        self.0.get(&name)
    }

    pub fn remove(&mut self, name: VariableName) -> Option<RawValue> {
        self.0.shift_remove(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(VariableName, RawValue)> for VariableInputs {
    fn from_iter<I: IntoIterator<Item = (VariableName, RawValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Positions along which masks are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeAxis {
    /// Integer timestep indices.
    Steps(Vec<i64>),
    /// Absolute timestamps.
    Stamps(Vec<NaiveDateTime>),
}

impl TimeAxis {
    pub fn len(&self) -> usize {
        match self {
            TimeAxis::Steps(steps) => steps.len(),
            TimeAxis::Stamps(stamps) => stamps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn label(&self) -> &'static str {
        match self {
            TimeAxis::Steps(_) => "timestep",
            TimeAxis::Stamps(_) => "timestamp",
        }
    }
}

/// Every canonical variable, bound once and validated together.
#[derive(Debug, Clone)]
pub struct VariableSet {
    variables: IndexMap<VariableName, Variable>,
    serial_length: Option<usize>,
}

impl VariableSet {
    /// Binds `inputs` with the default timestamp formats.
    pub fn new(inputs: VariableInputs) -> Result<Self> {
        Self::with_parser(inputs, &TimestampParser::default())
    }

    pub fn with_parser(mut inputs: VariableInputs, parser: &TimestampParser) -> Result<Self> {
        let mut variables = IndexMap::with_capacity(VariableName::iter().len());
        for name in VariableName::iter() {
            let raw = inputs.remove(name).unwrap_or_default();
            variables.insert(name, DefaultVariable::get(name).bind_with(raw, parser)?);
        }

        let serial_length = validate_serial_variables(&variables)?;
        info!(
            serial_length,
            populated = variables.values().filter(|v| v.value().is_some()).count(),
            "variable set validated"
        );

        Ok(Self {
            variables,
            serial_length,
        })
    }

    pub fn get(&self, name: VariableName) -> Option<&Variable> {
        self.variables.get(&name)
    }

    pub fn value(&self, name: VariableName) -> Option<&Value> {
        self.get(name).and_then(Variable::value)
    }

    fn require(&self, name: VariableName) -> Result<&Variable> {
        self.get(name)
            .ok_or_else(|| VariableError::MissingVariable(name.to_string()))
    }

    /// Common length of the populated serial variables.
    pub fn serial_length(&self) -> Option<usize> {
        self.serial_length
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableName, &Variable)> {
        self.variables.iter().map(|(name, variable)| (*name, variable))
    }

    /// The bound `timestamps`, or `0..N` over the common serial length.
    pub fn time_axis(&self) -> TimeAxis {
        match self.value(VariableName::Timestamps).and_then(Value::as_series) {
            Some(Series::DateTime(stamps)) => TimeAxis::Stamps(stamps.clone()),
            Some(Series::Int(steps)) => TimeAxis::Steps(steps.clone()),
            Some(other) => TimeAxis::Steps((0..other.len() as i64).collect()),
            None => TimeAxis::Steps((0..self.serial_length.unwrap_or(0) as i64).collect()),
        }
    }

    /// Inclusive window over the time axis between two bound variables.
    ///
    /// An unbound `start` or `end` defaults to the first or last axis position.
    pub fn window_mask(&self, start: VariableName, end: VariableName) -> Result<Vec<bool>> {
        let axis = self.time_axis();
        let start = self.value(start).and_then(Value::as_scalar);
        let end = self.value(end).and_then(Value::as_scalar);

        match &axis {
            TimeAxis::Steps(steps) => {
                let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
                    return Ok(Vec::new());
                };
                let start = bound_step(&axis, start)?.unwrap_or(*first);
                let end = bound_step(&axis, end)?.unwrap_or(*last);
                Ok(steps.iter().map(|step| *step >= start && *step <= end).collect())
            }
            TimeAxis::Stamps(stamps) => {
                let (Some(first), Some(last)) = (stamps.first(), stamps.last()) else {
                    return Ok(Vec::new());
                };
                let start = bound_stamp(&axis, start)?.unwrap_or(*first);
                let end = bound_stamp(&axis, end)?.unwrap_or(*last);
                Ok(stamps.iter().map(|stamp| *stamp >= start && *stamp <= end).collect())
            }
        }
    }

    pub fn evaluation_mask(&self) -> Result<Vec<bool>> {
        self.window_mask(
            VariableName::EvaluationStartTimestamp,
            VariableName::EvaluationEndTimestamp,
        )
    }

    pub fn evaluation_length(&self) -> Result<usize> {
        Ok(self.evaluation_mask()?.into_iter().filter(|keep| *keep).count())
    }

    /// Resolution of the bound `timestamps`, optionally over a sub-array.
    pub fn get_temporal_resolution(
        &self,
        unit: BaseUnit,
        samples: Option<&[NaiveDateTime]>,
    ) -> Result<f64> {
        self.require(VariableName::Timestamps)?
            .get_resolution(unit, samples)
    }

    /// Numeric values of a serial variable at the positions selected by `mask`.
    pub fn masked_profile(&self, name: VariableName, mask: &[bool]) -> Result<Vec<f64>> {
        let variable = self.require(name)?;
        let series = variable
            .value()
            .and_then(Value::as_series)
            .ok_or_else(|| VariableError::MissingVariable(name.to_string()))?;
        series
            .select(mask)
            .to_f64()
            .ok_or_else(|| VariableError::NonNumeric {
                variable: variable.snake_case_name(),
                found: series.kind().name(),
            })
    }

    /// Bound timestamps at the positions selected by `mask`.
    pub fn masked_timestamps(&self, mask: &[bool]) -> Result<Vec<NaiveDateTime>> {
        match self.time_axis() {
            TimeAxis::Stamps(stamps) => Ok(stamps
                .into_iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(stamp, _)| stamp)
                .collect()),
            TimeAxis::Steps(_) => Err(VariableError::NonTemporalResolution {
                variable: VariableName::Timestamps.to_string(),
            }),
        }
    }
}

fn validate_serial_variables(variables: &IndexMap<VariableName, Variable>) -> Result<Option<usize>> {
    let lengths: Vec<(String, usize)> = variables
        .values()
        .filter(|variable| variable.value_type() == ValueType::Serial)
        .filter_map(|variable| variable.series_len().map(|len| (variable.snake_case_name(), len)))
        .collect();

    let minimum = lengths.iter().map(|(_, len)| *len).min();
    let maximum = lengths.iter().map(|(_, len)| *len).max();
    if minimum != maximum {
        return Err(VariableError::UnequalSerialLengths { lengths });
    }
    Ok(minimum)
}

fn incomparable(axis: &TimeAxis, bound: &'static str) -> VariableError {
    VariableError::IncomparableBounds {
        axis: axis.label(),
        bound,
    }
}

fn bound_step(axis: &TimeAxis, bound: Option<&Scalar>) -> Result<Option<i64>> {
    match bound {
        None => Ok(None),
        Some(Scalar::Int(step)) => Ok(Some(*step)),
        Some(Scalar::DateTime(_)) => Err(incomparable(axis, "timestamp")),
        Some(other) => Err(incomparable(axis, other.kind().name())),
    }
}

fn bound_stamp(axis: &TimeAxis, bound: Option<&Scalar>) -> Result<Option<NaiveDateTime>> {
    match bound {
        None => Ok(None),
        Some(Scalar::DateTime(stamp)) => Ok(Some(*stamp)),
        Some(Scalar::Int(_)) => Err(incomparable(axis, "timestep")),
        Some(other) => Err(incomparable(axis, other.kind().name())),
    }
}
