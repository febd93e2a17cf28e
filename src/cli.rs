use clap::{Parser, Subcommand};

/// apertium-setup - Build script generator for Apertium language data
///
/// Reads a package's metadata file and mode descriptor, works out how every
/// needed artifact is built, and writes a Makefile and a pkg-config file.
#[derive(Parser, Debug)]
#[command(name = "apertium-setup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build script generator for Apertium language data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs and configuration shared by every command that runs the pipeline
#[derive(Parser, Debug, Clone)]
pub struct PipelineArgs {
    /// Metadata file (e.g. apertium-eng.meta)
    pub meta: String,

    /// Mode descriptor (e.g. modes.xml)
    pub modes: String,

    /// Installation prefix
    #[arg(long, env = "APERTIUM_SETUP_PREFIX")]
    pub prefix: Option<String>,

    /// Config file path
    #[arg(short = 'c', long, env = "APERTIUM_SETUP_CONFIG")]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the Makefile and pkg-config file
    Generate(GenerateArgs),

    /// Resolve everything and report, without writing files
    Check(CheckArgs),

    /// Print the parsed metadata settings as TOML
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Directory the generated files are written to; must hold the metadata
    /// file [default: the metadata file's directory]
    #[arg(short = 'o', long)]
    pub output_dir: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Metadata file
    pub meta: String,

    /// Config file path
    #[arg(short = 'c', long, env = "APERTIUM_SETUP_CONFIG")]
    pub config: Option<String>,
}
