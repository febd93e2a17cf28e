use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::cli::ShowArgs;
use crate::config::SetupConfig;
use crate::metadata::{SettingsStore, Value};

pub fn run(args: ShowArgs) -> Result<()> {
    info!("Showing settings from: {}", args.meta);

    let config = SetupConfig::load(args.config.as_deref().map(Path::new))?;
    let metadata = SettingsStore::load(Path::new(&args.meta), &config.program_defaults())
        .with_context(|| format!("Failed to load {}", args.meta))?;

    println!("{}", render(&metadata)?);
    Ok(())
}

/// Settings as a sorted TOML table; the `CUSTOM` block is appended as a comment
fn render(metadata: &SettingsStore) -> Result<String> {
    let settings: BTreeMap<&String, &Value> = metadata.iter().collect();
    let mut out = toml::to_string_pretty(&settings)?;

    if let Some(custom) = metadata.custom() {
        out.push_str("\n# CUSTOM\n");
        for line in custom.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }

    Ok(out)
}
