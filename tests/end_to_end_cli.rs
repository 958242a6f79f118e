//! CLI Integration Tests
//!
//! Tests are organized by functionality:
//! - `cli::argument_parsing` - argument parsing and validation
//! - `cli::toml_config` - configuration files combined with CLI overrides
//! - `cli::binary_run` - running the built binary end to end

mod cli;
