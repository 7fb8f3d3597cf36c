//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared configuration and tracing setup for flexibility KPI evaluation."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;

use efkpi_common::{init_tracing, AppConfig, LogFormat};
use efkpi_core::{BaseUnit, VariableInputs, VariableName};
use tempfile::tempdir;

const CONFIG: &str = r#"
[logging]
format = "pretty"
file_prefix = "efkpi-test"

[evaluation]
resolution_unit = "minute"
timestamp_formats = ["%d.%m.%Y %H:%M"]
"#;

#[test]
fn loads_first_existing_candidate() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let present = dir.path().join("efkpi.toml");
    fs::write(&present, CONFIG).unwrap();

    let loaded = AppConfig::load_from_candidates(&[&missing, &present]).unwrap();
    assert_eq!(loaded.source, present);
    assert_eq!(loaded.config.logging.format, LogFormat::Pretty);
    assert_eq!(loaded.config.evaluation.resolution_unit, BaseUnit::Minute);
}

#[test]
fn missing_candidates_are_listed() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere.toml");
    let err = AppConfig::load_from_candidates(&[&missing]).unwrap_err();
    assert!(err.to_string().contains("nowhere.toml"));
}

#[test]
fn invalid_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[evaluation]\nresolution_unit = \"ton\"\n").unwrap();
    let err = AppConfig::load_from_candidates(&[&path]).unwrap_err();
    assert!(format!("{err:#}").contains("not a time unit"));
}

#[test]
fn configured_formats_drive_binding() {
    let config: AppConfig = CONFIG.parse().unwrap();
    let stamps: Vec<String> = (0..4)
        .map(|quarter| format!("01.01.2022 10:{:02}", quarter * 15))
        .collect();
    let inputs = VariableInputs::new()
        .with(VariableName::Timestamps, stamps)
        .with(VariableName::EvaluationStartTimestamp, "01.01.2022 10:15");
    let set = config.evaluation.variable_set(inputs).unwrap();
    assert_eq!(set.evaluation_length().unwrap(), 3);
    assert_eq!(config.evaluation.resolution(&set).unwrap(), 15.0);

    let rejected = AppConfig::default()
        .evaluation
        .variable_set(VariableInputs::new().with(VariableName::Timestamps, vec!["01.01.2022 10:00"]));
    assert!(rejected.is_err());
}

#[test]
fn tracing_writes_into_configured_directory() {
    let dir = tempdir().unwrap();
    let mut config: AppConfig = CONFIG.parse().unwrap();
    config.logging.directory = dir.path().join("logs");

    init_tracing("efkpi-test", &config.logging).unwrap();
    assert!(config.logging.directory.is_dir());
    // a second initialisation keeps the installed subscriber
    init_tracing("efkpi-test", &config.logging).unwrap();
}
