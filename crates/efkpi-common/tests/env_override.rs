//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared configuration and tracing setup for flexibility KPI evaluation."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::{env, fs};

use efkpi_common::AppConfig;
use efkpi_core::BaseUnit;
use tempfile::tempdir;

#[test]
fn environment_path_wins_over_candidates() {
    let dir = tempdir().unwrap();
    let candidate = dir.path().join("candidate.toml");
    let override_path = dir.path().join("override.toml");
    fs::write(&candidate, "[evaluation]\nresolution_unit = \"minute\"\n").unwrap();
    fs::write(&override_path, "[evaluation]\nresolution_unit = \"second\"\n").unwrap();

    env::set_var(AppConfig::ENV_CONFIG_PATH, &override_path);
    let loaded = AppConfig::load_with_source(&[&candidate]).unwrap();
    env::remove_var(AppConfig::ENV_CONFIG_PATH);

    assert_eq!(loaded.source, override_path);
    assert_eq!(loaded.config.evaluation.resolution_unit, BaseUnit::Second);
}
