//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Canonical variable templates keyed by name.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    enumerations::{OperationCondition, ValueType},
    errors::{Result, VariableError},
    primitive_type::PrimitiveType,
    variable::Variable,
};

/// Every name a [`crate::variable_set::VariableSet`] can bind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariableName {
    Availability,
    ZoneTemperatureProfile,
    CoolingSetpoints,
    HeatingSetpoints,
    BaselineElectricPowerProfile,
    BaselineElectricityConsumptionProfile,
    BaselineNaturalGasConsumptionProfile,
    BaselineCostProfile,
    BaselineCarbonEmissionsProfile,
    BaselineCarbonIntensityProfile,
    BaselineSelfProductionProfile,
    FlexibleElectricPowerProfile,
    FlexibleElectricityConsumptionProfile,
    FlexibleNaturalGasConsumptionProfile,
    FlexibleCostProfile,
    FlexibleCarbonEmissionsProfile,
    FlexibleCarbonIntensityProfile,
    FlexibleSelfProductionProfile,
    GenericElectricPowerProfile,
    GenericElectricityConsumptionProfile,
    GenericNaturalGasConsumptionProfile,
    GenericCostProfile,
    GenericCarbonEmissionsProfile,
    GenericCarbonIntensityProfile,
    GenericSelfProductionProfile,
    Timestamps,
    EvaluationStartTimestamp,
    EvaluationEndTimestamp,
    LoadProfilePeakTimestamp,
    LoadProfileValleyTimestamp,
    GridPeakTimestamp,
    GenericSignalStartTimestamp,
    GenericSignalEndTimestamp,
    LowGenericSignalStartTimestamp,
    LowGenericSignalEndTimestamp,
    MediumGenericSignalStartTimestamp,
    MediumGenericSignalEndTimestamp,
    HighGenericSignalStartTimestamp,
    HighGenericSignalEndTimestamp,
    HighPriceStartTimestamp,
    HighPriceEndTimestamp,
    HighEmissionStartTimestamp,
    HighEmissionEndTimestamp,
    FloorArea,
    NumZones,
    NumDays,
}

impl VariableName {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// A fresh, unbound template for this name.
    pub fn template(&self) -> Variable {
        DefaultVariable::get(*self)
    }
}

fn profile(
    name: &str,
    definition: &str,
    primitive_type: PrimitiveType,
    condition: OperationCondition,
) -> Variable {
    Variable::new(name, definition, primitive_type, ValueType::Serial)
        .with_operation_condition(condition)
}

fn moment(name: &str, definition: &str) -> Variable {
    Variable::datetime(name, definition, ValueType::Single)
}

/// Builds the template for `name`. The match is exhaustive, so a name
/// added without a template fails to compile.
fn build(name: VariableName) -> Variable {
    use OperationCondition::{Baseline, Flexible, Generic};
    use VariableName as N;

    match name {
        N::Availability => {
            profile("availability", "Equipment availability mask.", PrimitiveType::unspecified(), Generic)
        }
        N::ZoneTemperatureProfile => {
            profile(
                "zone_temperature_profile",
                "A time series data points of zone_temperature_profile.",
                PrimitiveType::temperature(),
                Generic,
            )
        }
        N::CoolingSetpoints => {
            profile(
                "cooling_setpoints",
                "A time series data points of cooling_setpoints.",
                PrimitiveType::temperature(),
                Generic,
            )
        }
        N::HeatingSetpoints => {
            profile(
                "heating_setpoints",
                "A time series data points of heating_setpoints.",
                PrimitiveType::temperature(),
                Generic,
            )
        }

        N::BaselineElectricPowerProfile => {
            profile(
                "baseline electric power profile",
                "A time series data points of electric power demand acquired in baseline operation scenario.",
                PrimitiveType::power_demand(),
                Baseline,
            )
        }
        N::BaselineElectricityConsumptionProfile => {
            profile(
                "baseline electricity consumption profile",
                "A time series data points of electricity consumption acquired in baseline operation scenario.",
                PrimitiveType::energy_consumption(),
                Baseline,
            )
        }
        N::BaselineNaturalGasConsumptionProfile => {
            profile(
                "baseline natural gas consumption profile",
                "A time series data points of natural gas consumption acquired in baseline operation scenario.",
                PrimitiveType::energy_consumption(),
                Baseline,
            )
        }
        N::BaselineCostProfile => {
            profile(
                "baseline cost profile",
                "A time series data points of energy cost acquired in baseline operation scenario.",
                PrimitiveType::operation_cost(),
                Baseline,
            )
        }
        N::BaselineCarbonEmissionsProfile => {
            profile(
                "baseline carbon emissions profile",
                "A time series data points of energy carbon emissions acquired in baseline operation scenario.",
                PrimitiveType::carbon_emission(),
                Baseline,
            )
        }
        N::BaselineCarbonIntensityProfile => {
            profile(
                "baseline carbon intensity profile",
                "A time series data points of energy carbon intensity acquired in baseline operation scenario.",
                PrimitiveType::carbon_emission_factor(),
                Baseline,
            )
        }
        N::BaselineSelfProductionProfile => {
            profile(
                "baseline self production profile",
                "A time series data points of self-produced acquired in baseline operation scenario.",
                PrimitiveType::power_demand(),
                Baseline,
            )
        }

        N::FlexibleElectricPowerProfile => {
            profile(
                "flexible electric power profile",
                "A time series data points of electric power demand acquired in flexible operation scenario.",
                PrimitiveType::power_demand(),
                Flexible,
            )
        }
        N::FlexibleElectricityConsumptionProfile => {
            profile(
                "flexible electricity consumption profile",
                "A time series data points of electricity consumption acquired in flexible operation scenario.",
                PrimitiveType::energy_consumption(),
                Flexible,
            )
        }
        N::FlexibleNaturalGasConsumptionProfile => {
            profile(
                "flexible natural gas consumption profile",
                "A time series data points of natural gas consumption acquired in flexible operation scenario.",
                PrimitiveType::energy_consumption(),
                Flexible,
            )
        }
        N::FlexibleCostProfile => {
            profile(
                "flexible cost profile",
                "A time series data points of energy cost acquired in flexible operation scenario.",
                PrimitiveType::operation_cost(),
                Flexible,
            )
        }
        N::FlexibleCarbonEmissionsProfile => {
            profile(
                "flexible carbon emissions profile",
                "A time series data points of energy carbon emissions acquired in flexible operation scenario.",
                PrimitiveType::carbon_emission(),
                Flexible,
            )
        }
        N::FlexibleCarbonIntensityProfile => {
            profile(
                "flexible carbon intensity profile",
                "A time series data points of energy carbon intensity acquired in flexible operation scenario.",
                PrimitiveType::carbon_emission_factor(),
                Flexible,
            )
        }
        N::FlexibleSelfProductionProfile => {
            profile(
                "flexible self production profile",
                "A time series data points of self-produced acquired in flexible operation scenario.",
                PrimitiveType::power_demand(),
                Flexible,
            )
        }

        N::GenericElectricPowerProfile => {
            profile(
                "generic electric power profile",
                "A time series data points of electric power demand acquired in unspecified operation scenario.",
                PrimitiveType::power_demand(),
                Generic,
            )
        }
        N::GenericElectricityConsumptionProfile => {
            profile(
                "generic electricity consumption profile",
                "A time series data points of electricity consumption acquired in unspecified operation scenario.",
                PrimitiveType::energy_consumption(),
                Generic,
            )
        }
        N::GenericNaturalGasConsumptionProfile => {
            profile(
                "generic natural gas consumption profile",
                "A time series data points of natural gas consumption acquired in unspecified operation scenario.",
                PrimitiveType::energy_consumption(),
                Generic,
            )
        }
        N::GenericCostProfile => {
            profile(
                "generic cost profile",
                "A time series data points of energy cost acquired in generic operation scenario.",
                PrimitiveType::operation_cost(),
                Generic,
            )
        }
        N::GenericCarbonEmissionsProfile => {
            profile(
                "generic carbon emissions profile",
                "A time series data points of energy carbon emissions acquired in generic operation scenario.",
                PrimitiveType::carbon_emission(),
                Generic,
            )
        }
        N::GenericCarbonIntensityProfile => {
            profile(
                "generic carbon intensity profile",
                "A time series data points of energy carbon intensity acquired in generic operation scenario.",
                PrimitiveType::carbon_emission_factor(),
                Generic,
            )
        }
        N::GenericSelfProductionProfile => {
            profile(
                "generic self production profile",
                "A time series data points of self-produced acquired in generic operation scenario.",
                PrimitiveType::power_demand(),
                Generic,
            )
        }

        N::Timestamps => {
            Variable::datetime("timestamps", "Profile timestamps.", ValueType::Serial)
        }
        N::EvaluationStartTimestamp => {
            moment(
                "evaluation start timestamp",
                "The starting timestamp of an user specified evaluation window.",
            )
        }
        N::EvaluationEndTimestamp => {
            moment(
                "evaluation end timestamp",
                "The ending timestamp of an user specified evaluation window.",
            )
        }
        N::LoadProfilePeakTimestamp => {
            moment(
                "load profile peak timestamp",
                "The timestamp of the maximum value of a given load profile.",
            )
        }
        N::LoadProfileValleyTimestamp => {
            moment(
                "load profile valley timestamp",
                "The timestamp of the minimum value of a given load profile.",
            )
        }
        N::GridPeakTimestamp => {
            moment(
                "grid peak timestamp",
                "The timestamp of the maximum load of the connected grid.",
            )
        }
        N::GenericSignalStartTimestamp => {
            moment(
                "generic_signal_start_timestamp",
                "The starting timestamp of a signal e.g. price, emissions, e.t.c.",
            )
        }
        N::GenericSignalEndTimestamp => {
            moment(
                "generic_signal_end_timestamp",
                "The ending timestamp of a signal e.g. price, emissions, e.t.c.",
            )
        }
        N::LowGenericSignalStartTimestamp => {
            moment(
                "low_generic_signal_start_timestamp",
                "The starting timestamp of a period when a signal e.g. price, emissions, e.t.c. is low.",
            )
        }
        N::LowGenericSignalEndTimestamp => {
            moment(
                "low_generic_signal_end_timestamp",
                "The ending timestamp of a period when a signal e.g. price, emissions, e.t.c. is low.",
            )
        }
        N::MediumGenericSignalStartTimestamp => {
            moment(
                "medium_generic_signal_start_timestamp",
                "The starting timestamp of a period when a signal e.g. price, emissions, e.t.c. is medium.",
            )
        }
        N::MediumGenericSignalEndTimestamp => {
            moment(
                "medium_generic_signal_end_timestamp",
                "The ending timestamp of a period when a signal e.g. price, emissions, e.t.c. is medium.",
            )
        }
        N::HighGenericSignalStartTimestamp => {
            moment(
                "high_generic_signal_start_timestamp",
                "The starting timestamp of a period when a signal e.g. price, emissions, e.t.c. is high.",
            )
        }
        N::HighGenericSignalEndTimestamp => {
            moment(
                "high_generic_signal_end_timestamp",
                "The ending timestamp of a period when a signal e.g. price, emissions, e.t.c. is high.",
            )
        }
        N::HighPriceStartTimestamp => {
            moment(
                "high price start timestamp",
                "The starting timestamp of a period when the grid price is high.",
            )
        }
        N::HighPriceEndTimestamp => {
            moment(
                "high price end timestamp",
                "The ending timestamp of a period when the grid price is high.",
            )
        }
        N::HighEmissionStartTimestamp => {
            moment(
                "high emission start timestamp",
                "The starting timestamp of a period when the grid emission factor is high.",
            )
        }
        N::HighEmissionEndTimestamp => {
            moment(
                "high emission end timestamp",
                "The ending timestamp of a period when the grid emission factor is high.",
            )
        }

        N::FloorArea => {
            Variable::new("floor area", "Floor area.", PrimitiveType::area(), ValueType::Single)
        }
        N::NumZones => {
            Variable::new("num_zones", "num_zones.", PrimitiveType::unspecified(), ValueType::Single)
        }
        N::NumDays => {
            Variable::new("num_days", "num_days.", PrimitiveType::unspecified(), ValueType::Single)
        }
    }
}

/// Lookup over the canonical variable catalogue.
///
/// Every call builds a new unbound [`Variable`]; no instance is shared.
pub struct DefaultVariable;

impl DefaultVariable {
    pub fn get(name: VariableName) -> Variable {
        build(name)
    }

    /// Looks a template up by its snake_case keyword name.
    pub fn by_name(name: &str) -> Result<Variable> {
        name.parse::<VariableName>()
            .map(Self::get)
            .map_err(|_| VariableError::UnknownVariable(name.to_owned()))
    }

    pub fn names() -> impl Iterator<Item = VariableName> {
        VariableName::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableKind;

    #[test]
    fn catalogue_covers_every_name() {
        assert_eq!(VariableName::iter().count(), 46);
        for name in VariableName::iter() {
            let template = DefaultVariable::get(name);
            assert!(template.value().is_none(), "{name} template must be unbound");
        }
    }

    #[test]
    fn snake_case_names_match_keys() {
        for name in VariableName::iter() {
            assert_eq!(DefaultVariable::get(name).snake_case_name(), name.as_str());
        }
    }

    #[test]
    fn lookups_are_independent() {
        let bound = DefaultVariable::get(VariableName::BaselineElectricPowerProfile)
            .bind(vec![1.0, 2.0])
            .unwrap();
        let fresh = DefaultVariable::get(VariableName::BaselineElectricPowerProfile);
        assert!(bound.value().is_some());
        assert!(fresh.value().is_none());
    }

    #[test]
    fn metadata_is_fixed() {
        let flexible = DefaultVariable::get(VariableName::FlexibleCostProfile);
        assert_eq!(flexible.operation_condition(), OperationCondition::Flexible);
        assert_eq!(flexible.value_type(), ValueType::Serial);
        assert_eq!(flexible.unit().to_string(), "$");

        let end = DefaultVariable::get(VariableName::EvaluationEndTimestamp);
        assert_eq!(end.kind(), VariableKind::DateTime);
        assert_eq!(end.value_type(), ValueType::Single);
        assert_eq!(end.primitive_type().name, "timestamp");
    }

    #[test]
    fn lookup_by_keyword_name() {
        let variable = DefaultVariable::by_name("high_price_start_timestamp").unwrap();
        assert_eq!(variable.name(), "high price start timestamp");
        assert_eq!(
            DefaultVariable::by_name("price").unwrap_err(),
            VariableError::UnknownVariable("price".into())
        );
    }
}
