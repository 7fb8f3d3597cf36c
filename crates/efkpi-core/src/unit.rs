//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enumerations::BaseUnit;

/// A product of base units over a product of base units.
///
/// Empty sides are stored as `[Dimensionless]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    numerator: Vec<BaseUnit>,
    denominator: Vec<BaseUnit>,
}

impl Unit {
    pub fn new(numerator: Vec<BaseUnit>, denominator: Vec<BaseUnit>) -> Self {
        let normalize = |side: Vec<BaseUnit>| {
            if side.is_empty() {
                vec![BaseUnit::Dimensionless]
            } else {
                side
            }
        };
        Self {
            numerator: normalize(numerator),
            denominator: normalize(denominator),
        }
    }

    pub fn of(unit: BaseUnit) -> Self {
        Self::new(vec![unit], Vec::new())
    }

    pub fn per(numerator: BaseUnit, denominator: BaseUnit) -> Self {
        Self::new(vec![numerator], vec![denominator])
    }

    pub fn dimensionless() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn numerator(&self) -> &[BaseUnit] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[BaseUnit] {
        &self.denominator
    }

    fn side_is_dimensionless(side: &[BaseUnit]) -> bool {
        matches!(side, [BaseUnit::Dimensionless])
    }

    fn render_product(side: &[BaseUnit]) -> String {
        match side {
            [single] => single.symbol().to_owned(),
            many => format!(
                "({})",
                many.iter().map(BaseUnit::symbol).collect::<Vec<_>>().join("*")
            ),
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::dimensionless()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_denominator = !Self::side_is_dimensionless(&self.denominator);

        let numerator = if Self::side_is_dimensionless(&self.numerator) {
            if has_denominator { "1".to_owned() } else { String::new() }
        } else {
            Self::render_product(&self.numerator)
        };

        if has_denominator {
            write!(f, "{}/{}", numerator, Self::render_product(&self.denominator))
        } else {
            write!(f, "{}", numerator)
        }
    }
}
