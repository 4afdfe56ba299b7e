//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// cmakegen - CMake build file generator for yotta-style components
#[derive(Parser)]
#[command(name = "cmakegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate CMakeLists.txt files for a component and its dependencies
    Generate(GenerateArgs),

    /// Show include directories, definitions and Objective-C flags
    Flags(FlagsArgs),
}

/// Output format for `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Component directory (containing module.json)
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Target directory (containing target.json)
    #[arg(long, env = "CMAKEGEN_TARGET")]
    pub target: PathBuf,

    /// Output directory [default: <path>/build/<target name>]
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Component directory (containing module.json)
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Target directory (containing target.json)
    #[arg(long, env = "CMAKEGEN_TARGET")]
    pub target: PathBuf,
}
