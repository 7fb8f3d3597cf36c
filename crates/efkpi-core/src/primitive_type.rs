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

use crate::{enumerations::BaseUnit, unit::Unit};

/// Semantic classification of a variable with its default unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveType {
    pub name: String,
    pub definition: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveTypeInfo {
    pub name: String,
    pub definition: String,
    pub unit: String,
}

impl PrimitiveType {
    pub fn new(name: impl Into<String>, definition: impl Into<String>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            unit,
        }
    }

    pub fn info(&self) -> PrimitiveTypeInfo {
        PrimitiveTypeInfo {
            name: self.name.clone(),
            definition: self.definition.clone(),
            unit: self.unit.to_string(),
        }
    }

    pub fn power_demand() -> Self {
        Self::new(
            "power demand",
            "An instantaneous power demand of a entity at a moment.",
            Unit::of(BaseUnit::Kw),
        )
    }

    pub fn energy_consumption() -> Self {
        Self::new(
            "energy consumption",
            "The energy consumption of an entity during a certain period.",
            Unit::of(BaseUnit::Kwh),
        )
    }

    pub fn operation_cost() -> Self {
        Self::new(
            "operation cost",
            "The operational cost of an entity during a certain period.",
            Unit::of(BaseUnit::Dollar),
        )
    }

    pub fn energy_price() -> Self {
        Self::new(
            "energy price",
            "The price of energy per unit.",
            Unit::per(BaseUnit::Dollar, BaseUnit::Kwh),
        )
    }

    pub fn carbon_emission() -> Self {
        Self::new(
            "carbon emission",
            "The carbon emission of an entity during a certain period.",
            Unit::of(BaseUnit::Ton),
        )
    }

    pub fn carbon_emission_factor() -> Self {
        Self::new(
            "carbon emission factor",
            "The carbon emission factor of an entity during a certain period.",
            Unit::per(BaseUnit::Ton, BaseUnit::Kwh),
        )
    }

    pub fn temperature() -> Self {
        Self::new(
            "temperature",
            "The temperature of an entity (either an instantaneous value or average value).",
            Unit::of(BaseUnit::Celcius),
        )
    }

    pub fn timestamp() -> Self {
        Self::new("timestamp", "The datetime of a moment.", Unit::dimensionless())
    }

    pub fn duration() -> Self {
        Self::new(
            "duration",
            "The time difference between two timestamps.",
            Unit::of(BaseUnit::Second),
        )
    }

    pub fn area() -> Self {
        Self::new(
            "area",
            "The floor area of a space (e.g., zone, building).",
            Unit::of(BaseUnit::SquareMeter),
        )
    }

    pub fn occupant_count() -> Self {
        Self::new(
            "occupant count",
            "The number of occupants in a space.",
            Unit::dimensionless(),
        )
    }

    pub fn unspecified() -> Self {
        Self::new("unspecified", "Default primitive type.", Unit::dimensionless())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_renders_unit_string() {
        let info = PrimitiveType::carbon_emission_factor().info();
        assert_eq!(info.name, "carbon emission factor");
        assert_eq!(info.unit, "ton/kWh");
    }
}
