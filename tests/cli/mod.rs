//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod binary_run;
pub mod toml_config;
