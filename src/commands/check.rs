use anyhow::Result;
use tracing::info;

use crate::cli::CheckArgs;
use crate::pipeline;
use crate::setup::PackageKind;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Checking package: {}", args.pipeline.meta);

    let inputs = super::pipeline_inputs(&args.pipeline, None)?;
    let generated = pipeline::run(&inputs)?;
    let config = &generated.config;

    println!("✓ Package resolves: {}", config.basename);
    println!("\nSummary:");
    match &config.kind {
        PackageKind::Monolingual { lang, lang_name } => {
            println!("  - Monolingual: {} ({})", lang, lang_name)
        }
        PackageKind::Pair { lang1, lang2, .. } => println!("  - Pair: {}-{}", lang1, lang2),
    }
    println!("  - Version: {}", config.version);
    println!("  - Sources: {}", config.sources.len());
    println!("  - Targets: {}", config.targets.len());
    println!("  - Extra targets: {}", config.extra_targets.len());
    println!("  - Install modes: {}", config.install_modes.len());
    println!("  - Recipes: {}", generated.recipes.len());

    for (target, resolved) in generated.recipes.sorted() {
        println!("    {} ({})", target, resolved.kind);
    }

    let warnings = generated.metadata.warnings();
    if !warnings.is_empty() {
        println!("  - Warnings: {}", warnings.len());
    }

    Ok(())
}
