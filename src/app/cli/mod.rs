//! Command line handling for the load driver

pub mod args;
pub mod config;
pub mod display;
pub mod validation;

pub use args::{Args, OutputFormat};
