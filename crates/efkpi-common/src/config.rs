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
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use efkpi_core::{
    BaseUnit, TimestampParser, VariableInputs, VariableSet, DEFAULT_TIMESTAMP_FORMATS,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_file_output() -> bool {
    true
}

fn default_resolution_unit() -> BaseUnit {
    BaseUnit::Hour
}

fn default_timestamp_formats() -> Vec<String> {
    DEFAULT_TIMESTAMP_FORMATS
        .iter()
        .map(|format| (*format).to_owned())
        .collect()
}

/// Top-level configuration for KPI evaluation tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "EFKPI_CONFIG";

    /// Load configuration from disk, respecting the `EFKPI_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Self::load_from_candidates(candidates)
    }

    /// Load the first existing candidate, ignoring the environment override.
    pub fn load_from_candidates<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.evaluation.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Also write a daily rolling JSON log under `directory`.
    #[serde(default = "default_file_output")]
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            file_output: default_file_output(),
        }
    }
}

/// How timestamps are read and which unit resolutions are reported in.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_resolution_unit")]
    #[serde_as(as = "DisplayFromStr")]
    pub resolution_unit: BaseUnit,
    #[serde(default = "default_timestamp_formats")]
    pub timestamp_formats: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            resolution_unit: default_resolution_unit(),
            timestamp_formats: default_timestamp_formats(),
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.resolution_unit.is_time_unit() {
            return Err(anyhow!(
                "evaluation resolution_unit '{}' is not a time unit",
                self.resolution_unit
            ));
        }
        if self.timestamp_formats.is_empty() {
            return Err(anyhow!(
                "evaluation must declare at least one timestamp format"
            ));
        }
        if let Some(index) = self
            .timestamp_formats
            .iter()
            .position(|format| format.trim().is_empty())
        {
            return Err(anyhow!("timestamp format #{} is blank", index));
        }
        Ok(())
    }

    pub fn timestamp_parser(&self) -> TimestampParser {
        TimestampParser::with_formats(self.timestamp_formats.iter().cloned())
    }

    /// Bind `inputs` using the configured timestamp formats.
    pub fn variable_set(&self, inputs: VariableInputs) -> Result<VariableSet> {
        VariableSet::with_parser(inputs, &self.timestamp_parser())
            .context("failed to bind evaluation inputs")
    }

    /// Resolution of the set's timestamps in the configured unit.
    pub fn resolution(&self, set: &VariableSet) -> Result<f64> {
        set.get_temporal_resolution(self.resolution_unit, None)
            .with_context(|| format!("unable to infer resolution in {}", self.resolution_unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = "".parse().unwrap();
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
        assert!(config.logging.file_output);
        assert_eq!(config.evaluation.resolution_unit, BaseUnit::Hour);
        assert_eq!(
            config.evaluation.timestamp_formats.len(),
            DEFAULT_TIMESTAMP_FORMATS.len()
        );
    }

    #[test]
    fn parses_sections() {
        let config: AppConfig = r#"
            [logging]
            directory = "logs"
            format = "pretty"
            file_output = false

            [evaluation]
            resolution_unit = "minute"
            timestamp_formats = ["%d/%m/%Y %H:%M"]
        "#
        .parse()
        .unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.logging.file_output);
        assert_eq!(config.evaluation.resolution_unit, BaseUnit::Minute);
        assert!(config
            .evaluation
            .timestamp_parser()
            .parse("01/01/2022 13:00")
            .is_some());
    }

    #[test]
    fn rejects_non_time_resolution_unit() {
        let err = r#"
            [evaluation]
            resolution_unit = "kw"
        "#
        .parse::<AppConfig>()
        .unwrap_err();
        assert!(err.to_string().contains("not a time unit"));
    }

    #[test]
    fn rejects_blank_formats() {
        let err = r#"
            [evaluation]
            timestamp_formats = ["%Y", " "]
        "#
        .parse::<AppConfig>()
        .unwrap_err();
        assert!(err.to_string().contains("#1 is blank"));
    }
}
