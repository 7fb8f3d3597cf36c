//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Timestamp handling for date-time variables: the timestamp/timestep
//! decision, string parsing and sampling resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::{
    enumerations::{BaseUnit, ValueType},
    errors::{Result, VariableError},
    value::RawValue,
};

/// Naive formats tried, in order, after RFC 3339.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Parses timestamp strings into naive date-times.
///
/// Inputs carrying an offset are converted to UTC before the offset is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::with_formats(DEFAULT_TIMESTAMP_FORMATS.iter().map(|f| (*f).to_owned()))
    }
}

impl TimestampParser {
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn parse(&self, input: &str) -> Option<NaiveDateTime> {
        let input = input.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
            return Some(parsed.naive_utc());
        }
        self.formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
            .or_else(|| {
                self.formats.iter().find_map(|format| {
                    NaiveDate::parse_from_str(input, format)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
            })
    }
}

/// `true` for strings that stand for "not a time".
fn is_not_a_time(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nat")
}

/// Routes a raw date-time input to the timestep or the timestamp shape.
///
/// Integer inputs (a SINGLE int, or a SERIAL list whose first element is an
/// int) are timestep indices and pass through; booleans count as integers. Anything else that
/// is not absent is parsed into [`RawValue::DateTime`] values, leaving shape
/// validation to the regular coercion.
pub(crate) fn prepare(
    variable: &str,
    value_type: ValueType,
    raw: RawValue,
    parser: &TimestampParser,
) -> Result<RawValue> {
    if raw.is_absent() {
        return Ok(RawValue::Absent);
    }

    let is_timestep = match (&raw, value_type) {
        (RawValue::Int(_) | RawValue::Bool(_), ValueType::Single) => true,
        (RawValue::List(items), ValueType::Serial) => {
            matches!(items.first(), Some(RawValue::Int(_) | RawValue::Bool(_)))
        }
        _ => false,
    };
    if is_timestep {
        debug!(variable, "integer input treated as timestep indices");
        return Ok(bools_as_steps(raw));
    }

    match raw {
        RawValue::List(items) => items
            .into_iter()
            .map(|item| to_timestamp(variable, item, parser))
            .collect::<Result<Vec<_>>>()
            .map(RawValue::List),
        RawValue::Str(ref text) if is_not_a_time(text) => Ok(RawValue::Absent),
        scalar => to_timestamp(variable, scalar, parser),
    }
}

/// Booleans index timesteps as 0 and 1.
fn bools_as_steps(raw: RawValue) -> RawValue {
    match raw {
        RawValue::Bool(flag) => RawValue::Int(i64::from(flag)),
        RawValue::List(items) => RawValue::List(items.into_iter().map(bools_as_steps).collect()),
        other => other,
    }
}

fn to_timestamp(variable: &str, raw: RawValue, parser: &TimestampParser) -> Result<RawValue> {
    match raw {
        RawValue::DateTime(_) => Ok(raw),
        RawValue::Str(text) => parser
            .parse(&text)
            .map(RawValue::DateTime)
            .ok_or_else(|| VariableError::TimestampParse {
                variable: variable.to_owned(),
                input: text,
            }),
        other => Err(VariableError::TimestampParse {
            variable: variable.to_owned(),
            input: format!("{:?}", other),
        }),
    }
}

/// Uniform step between consecutive timestamps, expressed in `unit`.
pub fn resolution(timestamps: &[NaiveDateTime], unit: BaseUnit) -> Result<f64> {
    if timestamps.len() < 2 {
        return Err(VariableError::InsufficientSamples {
            count: timestamps.len(),
        });
    }

    let (minimum_seconds, maximum_seconds) = timestamps
        .windows(2)
        .map(|pair| {
            let delta = pair[1] - pair[0];
            delta
                .num_microseconds()
                .map(|micros| micros as f64 / 1_000_000.0)
                .unwrap_or_else(|| delta.num_seconds() as f64)
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), seconds| {
            (low.min(seconds), high.max(seconds))
        });

    if minimum_seconds != maximum_seconds {
        return Err(VariableError::DiscontinuousTimeSeries {
            minimum_seconds,
            maximum_seconds,
        });
    }

    unit.from_seconds(minimum_seconds)
        .ok_or(VariableError::UnsupportedUnit(unit))
}
