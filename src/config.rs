/*!
 * Configuration handling for rbxplugin
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;

/// Command-line arguments for rbxplugin
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "rbxplugin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Build a Roblox plugin model from a directory",
    long_about = "Converts a directory tree into a Roblox model file: directories become containers, .lua files become scripts, .module.lua files become module scripts, .rbxm files are spliced in and every other file becomes a string value."
)]
pub struct Args {
    /// The directory to process into a plugin
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    pub input: String,

    /// The rbxm file to output to
    #[clap(short, long, value_name = "FILE", default_value = "./build.rbxm")]
    pub output: String,

    /// Build the plugin to the output file
    #[clap(short, long)]
    pub build: bool,

    /// Do not print the build summary
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to convert
    pub input: PathBuf,

    /// Output model file path
    pub output: PathBuf,

    /// Whether to build to the output file
    pub build: bool,

    /// Suppress the summary report
    pub quiet: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            input: PathBuf::from(args.input),
            output: PathBuf::from(args.output),
            build: args.build,
            quiet: args.quiet,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.input.is_dir(),
            Config,
            "Building requires an input directory to be specified (got {})",
            self.input.display()
        );

        if self.build {
            ensure!(
                !self.output.as_os_str().is_empty(),
                Config,
                "Building requires an output file to be specified"
            );

            // Check if output file directory exists
            if let Some(parent) = self.output.parent() {
                ensure!(
                    parent.as_os_str().is_empty() || parent.is_dir(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }
}
