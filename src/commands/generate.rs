use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::cli::GenerateArgs;
use crate::cli_utils::setup_prefix;
use crate::logging::{operations, status};
use crate::pipeline;

pub fn run(args: GenerateArgs) -> Result<()> {
    let inputs = super::pipeline_inputs(&args.pipeline, args.output_dir.as_deref())?;
    let generated = pipeline::run(&inputs)?;

    // Only reached when every stage succeeded
    let output_dir = &generated.output_dir;
    let makefile_path = output_dir.join("Makefile");
    fs::write(&makefile_path, &generated.makefile)
        .with_context(|| format!("Failed to write {}", makefile_path.display()))?;

    let pc_path = output_dir.join(generated.pkgconfig_name());
    fs::write(&pc_path, &generated.pkgconfig)
        .with_context(|| format!("Failed to write {}", pc_path.display()))?;

    info!(
        operation = operations::EMIT,
        status = status::SUCCESS,
        makefile = %makefile_path.display(),
        pkgconfig = %pc_path.display(),
        "wrote build files"
    );

    println!("{} Wrote {}", setup_prefix(), makefile_path.display());
    println!("{} Wrote {}", setup_prefix(), pc_path.display());

    Ok(())
}
