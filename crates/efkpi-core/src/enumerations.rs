//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::value::ScalarKind;

/// Base units from which [`crate::unit::Unit`] products are composed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BaseUnit {
    Dimensionless,
    Percent,
    Kwh,
    Kw,
    Dollar,
    Hour,
    Minute,
    Second,
    Millisecond,
    Ton,
    Celcius,
    Kelvin,
    SquareMeter,
    KgOfCo2,
    Ppm,
}

impl BaseUnit {
    /// Short symbol used when rendering a unit string.
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseUnit::Dimensionless => "",
            BaseUnit::Percent => "%",
            BaseUnit::Kwh => "kWh",
            BaseUnit::Kw => "kW",
            BaseUnit::Dollar => "$",
            BaseUnit::Hour => "h",
            BaseUnit::Minute => "min",
            BaseUnit::Second => "s",
            BaseUnit::Millisecond => "ms",
            BaseUnit::Ton => "ton",
            BaseUnit::Celcius => "C",
            BaseUnit::Kelvin => "K",
            BaseUnit::SquareMeter => "m^2",
            BaseUnit::KgOfCo2 => "kgCO2",
            BaseUnit::Ppm => "ppm",
        }
    }

    /// Long human readable name.
    pub fn long_name(&self) -> &'static str {
        match self {
            BaseUnit::Dimensionless => "",
            BaseUnit::Percent => "percent",
            BaseUnit::Kwh => "kilowatt-hour",
            BaseUnit::Kw => "kilowatt",
            BaseUnit::Dollar => "dollar",
            BaseUnit::Hour => "hour",
            BaseUnit::Minute => "minute",
            BaseUnit::Second => "second",
            BaseUnit::Millisecond => "millisecond",
            BaseUnit::Ton => "ton",
            BaseUnit::Celcius => "celcius",
            BaseUnit::Kelvin => "kelvin",
            BaseUnit::SquareMeter => "square-meter",
            BaseUnit::KgOfCo2 => "kilograms-of-CO2",
            BaseUnit::Ppm => "parts-per-million",
        }
    }

    /// Expresses a second count in this unit. `None` for non-time units.
    pub fn from_seconds(&self, seconds: f64) -> Option<f64> {
        match self {
            BaseUnit::Millisecond => Some(seconds * 1000.0),
            BaseUnit::Second => Some(seconds),
            BaseUnit::Minute => Some(seconds / 60.0),
            BaseUnit::Hour => Some(seconds / 3600.0),
            _ => None,
        }
    }

    pub fn is_time_unit(&self) -> bool {
        self.from_seconds(0.0).is_some()
    }
}

/// Shape a bound value must take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// One scalar.
    Single,
    /// A fixed-length homogeneous sequence.
    Serial,
}

impl ValueType {
    /// Scalar kinds accepted by this value type. For `Serial` these are the
    /// permitted element kinds of the sequence.
    pub fn allowed_kinds(&self) -> &'static [ScalarKind] {
        match self {
            ValueType::Single | ValueType::Serial => &[
                ScalarKind::Str,
                ScalarKind::Int,
                ScalarKind::Float,
                ScalarKind::Bool,
                ScalarKind::DateTime,
            ],
        }
    }

    pub(crate) fn allowed_names(&self) -> Vec<&'static str> {
        match self {
            ValueType::Single => self.allowed_kinds().iter().map(ScalarKind::name).collect(),
            ValueType::Serial => vec!["list"],
        }
    }
}

/// Operating scenario a profile was captured under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationCondition {
    #[default]
    Generic,
    Baseline,
    Flexible,
}

/// Flexibility KPI families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    #[strum(serialize = "Peak Power Shedding")]
    PeakPowerShedding,
    #[strum(serialize = "Energy/Average Power Load Shedding")]
    EnergyOrAveragePowerLoadShedding,
    #[strum(serialize = "Demand Response Costs/Savings")]
    DemandResponseCostsOrSavings,
}
