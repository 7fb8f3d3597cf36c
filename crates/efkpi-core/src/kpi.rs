//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Flexibility KPI formulas evaluated over a validated [`VariableSet`].
//!
//! Each formula binds its inputs into a fresh set, selects the evaluation
//! window and reduces the masked profiles. Series results keep one entry per
//! selected position.

use serde::Serialize;
use tracing::debug;

use crate::{
    enumerations::{BaseUnit, KpiCategory},
    errors::{Result, VariableError},
    registry::VariableName,
    unit::Unit,
    variable_set::{VariableInputs, VariableSet},
};

/// Static description of a KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiDefinition {
    pub name: &'static str,
    pub definition: &'static str,
    pub category: KpiCategory,
    pub numerator: &'static [BaseUnit],
}

impl KpiDefinition {
    pub fn unit(&self) -> Unit {
        Unit::new(self.numerator.to_vec(), Vec::new())
    }
}

pub const PEAK_POWER_REDUCTION: KpiDefinition = KpiDefinition {
    name: "peak power reduction",
    definition: "Reduced power demand during peak hour due to flexible operation. The evaluation window should consider the peak hour after the flexible operation.",
    category: KpiCategory::PeakPowerShedding,
    numerator: &[BaseUnit::Kw],
};

pub const HOURLY_RELATIVE_POWER_DEMAND_REDUCTION: KpiDefinition = KpiDefinition {
    name: "hourly relative power demand reduction",
    definition: "Reduced power demand during peak hour due to flexible operation.",
    category: KpiCategory::PeakPowerShedding,
    numerator: &[BaseUnit::Kw],
};

pub const RELATIVE_PEAK_POWER_DEMAND_REDUCTION: KpiDefinition = KpiDefinition {
    name: "relative peak power demand reduction",
    definition: "Percentage of power demand reduction during peak hour due to flexible operation.",
    category: KpiCategory::PeakPowerShedding,
    numerator: &[BaseUnit::Percent],
};

pub const ENERGY_DEVIATION_FOR_PEAK_SHAVING: KpiDefinition = KpiDefinition {
    name: "energy deviation from peak shaving",
    definition: "Peak-shaving capacity. The evaluation period should be set to the downward modulation period.",
    category: KpiCategory::EnergyOrAveragePowerLoadShedding,
    numerator: &[BaseUnit::Kw, BaseUnit::Hour],
};

pub const AVERAGE_LOAD_REDUCTION: KpiDefinition = KpiDefinition {
    name: "average load reduction",
    definition: "Average load reduction during the demand response event (peak load shaving) by number of buildings.",
    category: KpiCategory::EnergyOrAveragePowerLoadShedding,
    numerator: &[BaseUnit::Kw],
};

pub const LOAD_FACTOR: KpiDefinition = KpiDefinition {
    name: "load factor",
    definition: "Dividing the average load to the peak load in a specified period.",
    category: KpiCategory::EnergyOrAveragePowerLoadShedding,
    numerator: &[BaseUnit::Dimensionless],
};

pub const POWER_PAYBACK_RATIO: KpiDefinition = KpiDefinition {
    name: "power payback ratio",
    definition: "Quantify variation of peak with / without DR -- For DSO-TSO.",
    category: KpiCategory::PeakPowerShedding,
    numerator: &[BaseUnit::Dimensionless],
};

pub const FLEXIBILITY_SAVINGS_INDEX: KpiDefinition = KpiDefinition {
    name: "flexibility savings index",
    definition: "The fraction of saved cost from a penalty-aware operational strategy (flexible) compared with a penalty-ignorant operation strategy (baseline).",
    category: KpiCategory::DemandResponseCostsOrSavings,
    numerator: &[BaseUnit::Dimensionless],
};

pub const RELATIVE_OPERATIONAL_COST: KpiDefinition = KpiDefinition {
    name: "relative operational cost of ADR",
    definition: "Ratio between the total operational cost with ADR and the total operational cost in the case of no ADR participation (only fuel cost).",
    category: KpiCategory::DemandResponseCostsOrSavings,
    numerator: &[BaseUnit::Percent],
};

/// Every KPI this module evaluates.
pub fn catalogue() -> [KpiDefinition; 9] {
    [
        PEAK_POWER_REDUCTION,
        HOURLY_RELATIVE_POWER_DEMAND_REDUCTION,
        RELATIVE_PEAK_POWER_DEMAND_REDUCTION,
        POWER_PAYBACK_RATIO,
        ENERGY_DEVIATION_FOR_PEAK_SHAVING,
        AVERAGE_LOAD_REDUCTION,
        LOAD_FACTOR,
        RELATIVE_OPERATIONAL_COST,
        FLEXIBILITY_SAVINGS_INDEX,
    ]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Baseline and flexible power at the evaluation positions.
fn masked_power_pair(set: &VariableSet, mask: &[bool]) -> Result<(Vec<f64>, Vec<f64>)> {
    Ok((
        set.masked_profile(VariableName::BaselineElectricPowerProfile, mask)?,
        set.masked_profile(VariableName::FlexibleElectricPowerProfile, mask)?,
    ))
}

fn power_reduction(baseline: &[f64], flexible: &[f64]) -> Vec<f64> {
    baseline.iter().zip(flexible).map(|(b, f)| b - f).collect()
}

/// `baseline - flexible` power at each evaluated position.
pub fn peak_power_reduction(inputs: VariableInputs) -> Result<Vec<f64>> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let (baseline, flexible) = masked_power_pair(&set, &mask)?;
    Ok(power_reduction(&baseline, &flexible))
}

/// `(baseline - flexible) / baseline` at each evaluated position.
pub fn hourly_relative_power_demand_reduction(inputs: VariableInputs) -> Result<Vec<f64>> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let (baseline, flexible) = masked_power_pair(&set, &mask)?;
    Ok(baseline
        .iter()
        .zip(&flexible)
        .map(|(b, f)| (b - f) / b)
        .collect())
}

/// `1 - flexible / baseline` at each evaluated position.
pub fn relative_peak_power_demand_reduction(inputs: VariableInputs) -> Result<Vec<f64>> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let (baseline, flexible) = masked_power_pair(&set, &mask)?;
    Ok(baseline
        .iter()
        .zip(&flexible)
        .map(|(b, f)| 1.0 - f / b)
        .collect())
}

pub fn energy_deviation_for_peak_shaving(inputs: VariableInputs) -> Result<f64> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let (baseline, flexible) = masked_power_pair(&set, &mask)?;
    let length = mask.iter().filter(|keep| **keep).count();
    Ok(mean(&power_reduction(&baseline, &flexible)) * length as f64)
}

/// Mean over peak of the generic power profile.
pub fn load_factor(inputs: VariableInputs) -> Result<f64> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let profile = set.masked_profile(VariableName::GenericElectricPowerProfile, &mask)?;
    Ok(mean(&profile) / peak(&profile))
}

pub fn relative_operational_cost(inputs: VariableInputs) -> Result<Vec<f64>> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let baseline = set.masked_profile(VariableName::BaselineCostProfile, &mask)?;
    let flexible = set.masked_profile(VariableName::FlexibleCostProfile, &mask)?;
    Ok(flexible.iter().zip(&baseline).map(|(f, b)| f / b).collect())
}

/// `1 - sum(flexible cost) / sum(baseline cost)` over the evaluation window.
pub fn flexibility_savings_index(inputs: VariableInputs) -> Result<f64> {
    let set = VariableSet::new(inputs)?;
    let mask = set.evaluation_mask()?;
    let baseline = set.masked_profile(VariableName::BaselineCostProfile, &mask)?;
    let flexible = set.masked_profile(VariableName::FlexibleCostProfile, &mask)?;
    Ok(1.0 - flexible.iter().sum::<f64>() / baseline.iter().sum::<f64>())
}

/// Peak of the available fleet's flexible demand over its baseline peak.
///
/// `availability`, `baseline` and `flexible` hold one profile per resource.
/// Each resource is bound with the shared `inputs`, its power is weighted by
/// its availability inside the evaluation window, and the weighted profiles
/// are summed per position before the peaks are taken.
pub fn power_payback_ratio(
    availability: &[Vec<bool>],
    baseline: &[Vec<f64>],
    flexible: &[Vec<f64>],
    inputs: VariableInputs,
) -> Result<f64> {
    let resource_count = ensure_fleet_size(&[
        (VariableName::Availability, availability.len()),
        (VariableName::BaselineElectricPowerProfile, baseline.len()),
        (VariableName::FlexibleElectricPowerProfile, flexible.len()),
    ])?;

    let mut fleet_baseline: Vec<f64> = Vec::new();
    let mut fleet_flexible: Vec<f64> = Vec::new();
    for ((available, baseline), flexible) in availability.iter().zip(baseline).zip(flexible) {
        let set = VariableSet::new(
            inputs
                .clone()
                .with(VariableName::Availability, available.clone())
                .with(VariableName::BaselineElectricPowerProfile, baseline.clone())
                .with(VariableName::FlexibleElectricPowerProfile, flexible.clone()),
        )?;
        let mask = set.evaluation_mask()?;
        let weights = set.masked_profile(VariableName::Availability, &mask)?;
        let (baseline, flexible) = masked_power_pair(&set, &mask)?;
        accumulate(&mut fleet_baseline, &baseline, &weights);
        accumulate(&mut fleet_flexible, &flexible, &weights);
    }

    debug!(
        resource_count,
        positions = fleet_baseline.len(),
        "power payback ratio window"
    );
    Ok(peak(&fleet_flexible) / peak(&fleet_baseline))
}

fn accumulate(total: &mut Vec<f64>, values: &[f64], weights: &[f64]) {
    if total.len() < values.len() {
        total.resize(values.len(), 0.0);
    }
    for ((sum, value), weight) in total.iter_mut().zip(values).zip(weights) {
        *sum += value * weight;
    }
}

/// Every per-resource list of a fleet KPI must describe the same resources.
fn ensure_fleet_size(counts: &[(VariableName, usize)]) -> Result<usize> {
    let resource_count = counts.first().map(|(_, count)| *count).unwrap_or(0);
    if counts.iter().any(|(_, count)| *count != resource_count) {
        return Err(VariableError::UnequalSerialLengths {
            lengths: counts
                .iter()
                .map(|(name, count)| (name.to_string(), *count))
                .collect(),
        });
    }
    if resource_count == 0 {
        if let Some((name, _)) = counts.first() {
            return Err(VariableError::MissingVariable(name.to_string()));
        }
    }
    Ok(resource_count)
}

/// Average reduction across a fleet during the generic signal window.
///
/// `baseline` and `flexible` hold one power profile per resource. Profiles
/// are summed per position before binding, so the window is evaluated on the
/// fleet aggregate. The first selected position is excluded from the sum.
pub fn average_load_reduction(
    baseline: &[Vec<f64>],
    flexible: &[Vec<f64>],
    mut inputs: VariableInputs,
) -> Result<f64> {
    let resource_count = ensure_fleet_size(&[
        (VariableName::BaselineElectricPowerProfile, baseline.len()),
        (VariableName::FlexibleElectricPowerProfile, flexible.len()),
    ])?;

    inputs.insert(
        VariableName::BaselineElectricPowerProfile,
        aggregate(VariableName::BaselineElectricPowerProfile, baseline)?,
    );
    inputs.insert(
        VariableName::FlexibleElectricPowerProfile,
        aggregate(VariableName::FlexibleElectricPowerProfile, flexible)?,
    );

    let set = VariableSet::new(inputs)?;
    let signal = set.window_mask(
        VariableName::GenericSignalStartTimestamp,
        VariableName::GenericSignalEndTimestamp,
    )?;
    let mask: Vec<bool> = set
        .evaluation_mask()?
        .into_iter()
        .zip(signal)
        .map(|(evaluated, signalled)| evaluated && signalled)
        .collect();
    let mask_length = mask.iter().filter(|keep| **keep).count();

    let (baseline, flexible) = masked_power_pair(&set, &mask)?;
    let reduction: f64 = power_reduction(&baseline, &flexible).iter().skip(1).sum();
    debug!(resource_count, mask_length, "average load reduction window");

    Ok(reduction / (resource_count as f64 * (mask_length as f64 - 1.0)))
}

fn aggregate(name: VariableName, profiles: &[Vec<f64>]) -> Result<Vec<f64>> {
    let length = profiles.first().map(Vec::len).unwrap_or(0);
    if profiles.iter().any(|profile| profile.len() != length) {
        return Err(VariableError::UnequalSerialLengths {
            lengths: profiles
                .iter()
                .enumerate()
                .map(|(index, profile)| (format!("{}[{}]", name, index), profile.len()))
                .collect(),
        });
    }

    let mut total = vec![0.0; length];
    for profile in profiles {
        for (sum, value) in total.iter_mut().zip(profile) {
            *sum += value;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(count: usize) -> Vec<String> {
        (0..count)
            .map(|hour| format!("2022-01-01T{:02}:00:00", hour))
            .collect()
    }

    fn pair(baseline: Vec<f64>, flexible: Vec<f64>) -> VariableInputs {
        VariableInputs::new()
            .with(VariableName::BaselineElectricPowerProfile, baseline)
            .with(VariableName::FlexibleElectricPowerProfile, flexible)
    }

    #[test]
    fn peak_power_reduction_over_window() {
        let inputs = pair(vec![10.0, 12.0, 14.0, 10.0], vec![9.0, 8.0, 10.0, 10.0])
            .with(VariableName::EvaluationStartTimestamp, 1)
            .with(VariableName::EvaluationEndTimestamp, 2);
        assert_eq!(peak_power_reduction(inputs).unwrap(), vec![4.0, 4.0]);
    }

    #[test]
    fn relative_reductions() {
        let inputs = pair(vec![10.0, 20.0], vec![5.0, 15.0]);
        assert_eq!(
            hourly_relative_power_demand_reduction(inputs.clone()).unwrap(),
            vec![0.5, 0.25]
        );
        assert_eq!(
            relative_peak_power_demand_reduction(inputs).unwrap(),
            vec![0.5, 0.25]
        );
    }

    #[test]
    fn energy_deviation_scales_mean_by_length() {
        let inputs = pair(vec![4.0, 4.0, 4.0], vec![1.0, 2.0, 3.0]);
        assert_eq!(energy_deviation_for_peak_shaving(inputs).unwrap(), 6.0);
    }

    #[test]
    fn load_factor_is_mean_over_peak() {
        let inputs = VariableInputs::new()
            .with(VariableName::GenericElectricPowerProfile, vec![1.0, 2.0, 3.0, 2.0]);
        assert_eq!(load_factor(inputs).unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn relative_cost_divides_flexible_by_baseline() {
        let inputs = VariableInputs::new()
            .with(VariableName::BaselineCostProfile, vec![2.0, 4.0])
            .with(VariableName::FlexibleCostProfile, vec![1.0, 3.0]);
        assert_eq!(relative_operational_cost(inputs).unwrap(), vec![0.5, 0.75]);
    }

    #[test]
    fn missing_profile_is_reported() {
        let inputs = VariableInputs::new()
            .with(VariableName::BaselineElectricPowerProfile, vec![1.0, 2.0]);
        assert_eq!(
            peak_power_reduction(inputs).unwrap_err(),
            VariableError::MissingVariable("flexible_electric_power_profile".into())
        );
    }

    #[test]
    fn average_load_reduction_over_signal_window() {
        let baseline = vec![vec![5.0; 6], vec![5.0; 6]];
        let flexible = vec![vec![4.0; 6], vec![3.0; 6]];
        let inputs = VariableInputs::new()
            .with(VariableName::GenericSignalStartTimestamp, 1)
            .with(VariableName::GenericSignalEndTimestamp, 4);
        // window covers 4 positions with a fleet reduction of 3 kW each; the
        // first is skipped: 9 / (2 * 3)
        let value = average_load_reduction(&baseline, &flexible, inputs).unwrap();
        assert_eq!(value, 1.5);
    }

    #[test]
    fn average_load_reduction_rejects_ragged_fleet() {
        let baseline = vec![vec![5.0; 6], vec![5.0; 5]];
        let flexible = vec![vec![4.0; 6], vec![3.0; 6]];
        let err = average_load_reduction(&baseline, &flexible, VariableInputs::new()).unwrap_err();
        assert!(matches!(err, VariableError::UnequalSerialLengths { .. }));
    }

    #[test]
    fn average_load_reduction_rejects_mismatched_fleets() {
        let baseline = vec![vec![5.0; 6], vec![5.0; 6]];
        let flexible = vec![vec![4.0; 6]];
        let inputs = VariableInputs::new()
            .with(VariableName::GenericSignalStartTimestamp, 1)
            .with(VariableName::GenericSignalEndTimestamp, 4);
        assert_eq!(
            average_load_reduction(&baseline, &flexible, inputs).unwrap_err(),
            VariableError::UnequalSerialLengths {
                lengths: vec![
                    ("baseline_electric_power_profile".into(), 2),
                    ("flexible_electric_power_profile".into(), 1),
                ],
            }
        );
    }

    #[test]
    fn flexibility_savings_index_over_window() {
        let inputs = VariableInputs::new()
            .with(VariableName::BaselineCostProfile, vec![2.0, 4.0, 6.0, 100.0])
            .with(VariableName::FlexibleCostProfile, vec![1.0, 3.0, 4.0, 0.0])
            .with(VariableName::EvaluationEndTimestamp, 2);
        let value = flexibility_savings_index(inputs).unwrap();
        assert!((value - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn power_payback_ratio_weights_by_availability() {
        let availability = vec![vec![true, true, false, true], vec![true; 4]];
        let baseline = vec![vec![10.0; 4], vec![4.0, 6.0, 4.0, 4.0]];
        let flexible = vec![vec![5.0, 8.0, 6.0, 5.0], vec![4.0, 2.0, 3.0, 4.0]];
        let inputs = VariableInputs::new()
            .with(VariableName::Timestamps, hourly(4))
            .with(VariableName::EvaluationStartTimestamp, "2022-01-01T01:00:00")
            .with(VariableName::EvaluationEndTimestamp, "2022-01-01T02:00:00");
        // fleet baseline [16, 4], fleet flexible [10, 3]
        let value = power_payback_ratio(&availability, &baseline, &flexible, inputs).unwrap();
        assert_eq!(value, 0.625);
    }

    #[test]
    fn power_payback_ratio_needs_one_availability_per_resource() {
        let err = power_payback_ratio(
            &[vec![true; 3]],
            &[vec![1.0; 3], vec![1.0; 3]],
            &[vec![1.0; 3], vec![1.0; 3]],
            VariableInputs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, VariableError::UnequalSerialLengths { .. }));
        assert_eq!(
            power_payback_ratio(&[], &[], &[], VariableInputs::new()).unwrap_err(),
            VariableError::MissingVariable("availability".into())
        );
    }

    #[test]
    fn catalogue_units_render() {
        assert_eq!(ENERGY_DEVIATION_FOR_PEAK_SHAVING.unit().to_string(), "(kW*h)");
        assert_eq!(catalogue().len(), 9);
        assert_eq!(POWER_PAYBACK_RATIO.unit().to_string(), "");
    }
}
