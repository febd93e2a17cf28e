pub mod check;
pub mod generate;
pub mod show;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::PipelineArgs;
use crate::config::SetupConfig;
use crate::pipeline::PipelineInputs;

/// Load tool configuration and merge command line overrides into pipeline inputs
pub(crate) fn pipeline_inputs(
    args: &PipelineArgs,
    output_dir: Option<&str>,
) -> Result<PipelineInputs> {
    let config_path = SetupConfig::locate(args.config.as_deref().map(Path::new))?;
    let config = SetupConfig::load_located(config_path.as_deref())?;

    Ok(PipelineInputs {
        meta_path: PathBuf::from(&args.meta),
        modes_path: PathBuf::from(&args.modes),
        output_dir: output_dir.map(PathBuf::from),
        config_path,
        programs: config.program_defaults(),
        setup: config.setup_options(args.prefix.as_deref()),
    })
}
