// Library interface for apertium-setup
// This allows integration tests and external code to drive the generator

pub mod cli;
pub mod cli_utils;
pub mod commands;
pub mod config;
pub mod emit;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod modes;
pub mod pipeline;
pub mod recipe;
pub mod setup;

// Re-export commonly used types
pub use config::SetupConfig;
pub use metadata::{SettingsStore, Value};
pub use modes::ModeDescriptor;
pub use pipeline::{run, Generated, PipelineInputs};
pub use recipe::{RecipeCatalog, TargetResolver};
pub use setup::PackageConfig;
