//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared configuration and tracing setup for flexibility KPI evaluation."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Configuration loading and tracing initialisation shared by tools that
//! evaluate flexibility KPIs.

pub mod config;
pub mod logging;

pub use config::{AppConfig, EvaluationConfig, LoadedAppConfig, LoggingConfig};
pub use logging::{init_tracing, LogFormat};
