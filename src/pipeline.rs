/// End-to-end generation: parse, derive, resolve, render
///
/// Nothing is written here. Callers get the rendered text only when every
/// stage succeeded, so a fatal error never leaves partial output behind.
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::emit::{render_makefile, render_pkgconfig, MakefileInputs};
use crate::logging::{operations, status};
use crate::metadata::{ProgramDefaults, SettingsStore};
use crate::modes::ModeDescriptor;
use crate::recipe::{RecipeCatalog, ResolvedRecipeSet, TargetResolver};
use crate::setup::{PackageConfig, SetupOptions};

#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub meta_path: PathBuf,
    pub modes_path: PathBuf,
    /// Where the build files go; defaults to the metadata file's directory
    pub output_dir: Option<PathBuf>,
    /// Tool config file in effect, carried into the regeneration rule
    pub config_path: Option<PathBuf>,
    pub programs: ProgramDefaults,
    pub setup: SetupOptions,
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub metadata: SettingsStore,
    pub config: PackageConfig,
    pub recipes: ResolvedRecipeSet,
    /// Directory the build files belong in
    pub output_dir: PathBuf,
    pub makefile: String,
    pub pkgconfig: String,
}

impl Generated {
    /// File name of the pkg-config file
    pub fn pkgconfig_name(&self) -> String {
        format!("{}.pc", self.config.basename)
    }
}

pub fn run(inputs: &PipelineInputs) -> Result<Generated> {
    let metadata = SettingsStore::load(&inputs.meta_path, &inputs.programs)
        .with_context(|| format!("Failed to load {}", inputs.meta_path.display()))?;
    let modes = ModeDescriptor::load(&inputs.modes_path)
        .with_context(|| format!("Failed to load {}", inputs.modes_path.display()))?;

    let (output_dir, makefile_inputs) = makefile_layout(inputs)?;

    let config = PackageConfig::derive(&metadata, &modes, &inputs.setup)?;
    let variables = config.variables(&metadata);

    let recipes = match config.resolve_context(&variables) {
        Some(ctx) => {
            let catalog = RecipeCatalog::monolingual()?;
            TargetResolver::new(&catalog)
                .resolve(&ctx, config.requested_targets())
                .inspect_err(|e| {
                    error!(
                        operation = operations::RESOLVE,
                        status = status::ERROR,
                        basename = %config.basename,
                        "{}", e
                    )
                })?
        }
        None => {
            warn!(
                operation = operations::RESOLVE,
                status = status::SKIPPED,
                basename = %config.basename,
                "no recipe catalog for language pairs; rules must come from the CUSTOM block"
            );
            ResolvedRecipeSet::default()
        }
    };

    let makefile = render_makefile(&variables, &recipes, metadata.custom(), &makefile_inputs);
    let pkgconfig = render_pkgconfig(&config);

    info!(
        operation = operations::EMIT,
        status = status::SUCCESS,
        basename = %config.basename,
        recipe_count = recipes.len(),
        size_bytes = makefile.len(),
        "rendered build script"
    );

    Ok(Generated {
        metadata,
        config,
        recipes,
        output_dir,
        makefile,
        pkgconfig,
    })
}

/// Resolve the output directory and the input paths as seen from it
///
/// Recipes name sources relative to the metadata file, so the Makefile has
/// to live next to it. Every path the Makefile mentions is made relative to
/// that directory.
fn makefile_layout(inputs: &PipelineInputs) -> Result<(PathBuf, MakefileInputs)> {
    let meta_dir = match inputs.meta_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let base = canonical(&meta_dir)?;

    let output_dir = match &inputs.output_dir {
        Some(dir) => {
            if fs::canonicalize(dir).ok().as_deref() != Some(base.as_path()) {
                bail!(
                    "Output directory {} must be the directory containing {}",
                    dir.display(),
                    inputs.meta_path.display()
                );
            }
            dir.clone()
        }
        None => meta_dir,
    };

    let relative = |path: &Path| -> Result<String> {
        Ok(relative_to(&canonical(path)?, &base).display().to_string())
    };
    let makefile_inputs = MakefileInputs {
        meta_file: relative(&inputs.meta_path)?,
        modes_file: relative(&inputs.modes_path)?,
        config_file: inputs.config_path.as_deref().map(relative).transpose()?,
    };

    Ok((output_dir, makefile_inputs))
}

fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

/// `target` as a path relative to `base`; both must be absolute
fn relative_to(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<_> = target.components().collect();
    let base: Vec<_> = base.components().collect();
    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}
