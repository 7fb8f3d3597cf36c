//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Typed variable binding and evaluation windows for flexibility KPIs."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use chrono::{Duration, NaiveDate, NaiveDateTime};
use efkpi_core::{
    BaseUnit, DefaultVariable, RawValue, Series, TimeAxis, Value, VariableError, VariableInputs,
    VariableName, VariableSet,
};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly_stamps(count: i64) -> Vec<NaiveDateTime> {
    (0..count).map(|hour| start() + Duration::hours(hour)).collect()
}

fn profile(count: usize) -> Vec<f64> {
    (0..count).map(|i| 10.0 + i as f64).collect()
}

#[test]
fn mismatched_profile_lengths_fail_construction() {
    let inputs = VariableInputs::new()
        .with(VariableName::BaselineElectricPowerProfile, profile(24))
        .with(VariableName::FlexibleElectricPowerProfile, profile(23));
    assert!(matches!(
        VariableSet::new(inputs),
        Err(VariableError::UnequalSerialLengths { .. })
    ));
}

#[test]
fn serial_values_read_back_element_for_element() {
    let inputs = VariableInputs::new().with(
        VariableName::GenericElectricPowerProfile,
        vec![1.0, 2.0, 3.0],
    );
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(
        set.value(VariableName::GenericElectricPowerProfile),
        Some(&Value::Serial(Series::Float(vec![1.0, 2.0, 3.0])))
    );
}

#[test]
fn full_day_without_bounds_evaluates_every_hour() {
    let inputs = VariableInputs::new()
        .with(VariableName::Timestamps, hourly_stamps(24))
        .with(VariableName::BaselineElectricPowerProfile, profile(24));
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(set.evaluation_length().unwrap(), 24);
    assert!(set.evaluation_mask().unwrap().into_iter().all(|keep| keep));
}

#[test]
fn afternoon_window_selects_three_hours() {
    let inputs = VariableInputs::new()
        .with(VariableName::Timestamps, hourly_stamps(24))
        .with(VariableName::EvaluationStartTimestamp, "2022-01-01T13:00")
        .with(VariableName::EvaluationEndTimestamp, "2022-01-01T15:00");
    let set = VariableSet::new(inputs).unwrap();

    let mask = set.evaluation_mask().unwrap();
    assert_eq!(set.evaluation_length().unwrap(), 3);
    let selected: Vec<NaiveDateTime> = hourly_stamps(24)
        .into_iter()
        .zip(mask)
        .filter(|(_, keep)| *keep)
        .map(|(stamp, _)| stamp)
        .collect();
    assert_eq!(
        selected,
        vec![
            start() + Duration::hours(13),
            start() + Duration::hours(14),
            start() + Duration::hours(15),
        ]
    );
}

#[test]
fn hourly_timestamps_have_unit_resolution() {
    let inputs = VariableInputs::new().with(VariableName::Timestamps, hourly_stamps(24));
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(set.get_temporal_resolution(BaseUnit::Hour, None).unwrap(), 1.0);
    assert_eq!(set.get_temporal_resolution(BaseUnit::Minute, None).unwrap(), 60.0);

    let uneven = vec![
        start(),
        start() + Duration::hours(1),
        start() + Duration::hours(2),
        start() + Duration::hours(5),
    ];
    let err = set
        .get_temporal_resolution(BaseUnit::Hour, Some(&uneven[..]))
        .unwrap_err();
    assert!(err.to_string().starts_with("discontinuous time series"));
}

#[test]
fn integer_timesteps_are_indices() {
    let steps: Vec<i64> = (0..10).collect();
    let inputs = VariableInputs::new()
        .with(VariableName::Timestamps, steps.clone())
        .with(VariableName::GenericElectricPowerProfile, profile(10));
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(set.time_axis(), TimeAxis::Steps(steps));
    assert_eq!(set.evaluation_length().unwrap(), 10);
    assert!(matches!(
        set.get_temporal_resolution(BaseUnit::Hour, None),
        Err(VariableError::NonTemporalResolution { .. })
    ));
}

#[test]
fn absent_inputs_are_not_errors() {
    let inputs = VariableInputs::new()
        .with(VariableName::BaselineElectricPowerProfile, profile(6))
        .with(VariableName::FlexibleElectricPowerProfile, RawValue::Absent)
        .with(VariableName::FlexibleCostProfile, f64::NAN)
        .with(VariableName::EvaluationEndTimestamp, "NaT")
        .with(VariableName::NumZones, None::<i64>);
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(set.serial_length(), Some(6));
    for name in [
        VariableName::FlexibleElectricPowerProfile,
        VariableName::FlexibleCostProfile,
        VariableName::EvaluationEndTimestamp,
        VariableName::NumZones,
    ] {
        assert!(set.value(name).is_none(), "{name} should be absent");
    }
    assert_eq!(set.evaluation_length().unwrap(), 6);
}

#[test]
fn type_errors_name_the_variable() {
    let inputs = VariableInputs::new().with(VariableName::FloorArea, vec![1.0, 2.0]);
    let err = VariableSet::new(inputs).unwrap_err();
    assert!(err.to_string().contains("floor_area"));
}

#[test]
fn signal_window_mask_uses_its_own_bounds() {
    let inputs = VariableInputs::new()
        .with(VariableName::Timestamps, hourly_stamps(6))
        .with(VariableName::HighPriceStartTimestamp, "2022-01-01 02:00")
        .with(VariableName::HighPriceEndTimestamp, "2022-01-01 03:00");
    let set = VariableSet::new(inputs).unwrap();
    let mask = set
        .window_mask(
            VariableName::HighPriceStartTimestamp,
            VariableName::HighPriceEndTimestamp,
        )
        .unwrap();
    assert_eq!(mask, vec![false, false, true, true, false, false]);
    assert_eq!(set.evaluation_length().unwrap(), 6);
}

#[test]
fn json_inputs_build_a_set() {
    let inputs: VariableInputs = serde_json::from_str(
        r#"{
            "timestamps": ["2022-01-01 00:00:00", "2022-01-01 00:30:00", "2022-01-01 01:00:00"],
            "baseline_electric_power_profile": [5.0, 6.0, 7.0],
            "flexible_electric_power_profile": [4.0, 6, 5.5],
            "evaluation_start_timestamp": "2022-01-01 00:30:00",
            "floor_area": 120.5
        }"#,
    )
    .unwrap();
    let set = VariableSet::new(inputs).unwrap();
    assert_eq!(set.evaluation_length().unwrap(), 2);
    assert_eq!(set.get_temporal_resolution(BaseUnit::Minute, None).unwrap(), 30.0);
    let mask = set.evaluation_mask().unwrap();
    assert_eq!(
        set.masked_profile(VariableName::FlexibleElectricPowerProfile, &mask)
            .unwrap(),
        vec![6.0, 5.5]
    );
}

#[test]
fn registry_hands_out_fresh_templates() {
    for name in DefaultVariable::names() {
        let first = DefaultVariable::get(name);
        let second = DefaultVariable::get(name);
        assert_eq!(first, second);
        assert!(first.value().is_none());
    }
}
