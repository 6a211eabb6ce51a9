use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::Target;

/// kernel-meta - Find the kernel metapackage this host should track
#[derive(Parser)]
#[command(name = "kernel-meta")]
#[command(about = "Resolve the kernel and headers metapackages for the installed kernels")]
#[command(version)]
pub struct Cli {
    /// Resolver configuration file (JSON); built-in defaults otherwise
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log resolution decisions to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the package snapshot comes from. Live `dpkg-query` when neither is given.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON snapshot of package records
    #[arg(long, conflicts_with = "dpkg_output")]
    pub snapshot: Option<PathBuf>,

    /// Saved output of `dpkg-query -W -f='${Package}\t${Source}\t${db:Status-Abbrev}\n'`
    #[arg(long)]
    pub dpkg_output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the metapackage name(s) to track
    Resolve {
        #[command(flatten)]
        input: InputArgs,

        /// Which metapackage to resolve (kernel, headers, both)
        #[arg(short, long, default_value = "both")]
        target: Target,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every installed kernel image with its stack and the selection
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the current package snapshot as JSON
    Snapshot {
        #[command(flatten)]
        input: InputArgs,

        /// Output file
        output: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
    /// Write the default configuration to a file
    InitConfig {
        /// Output file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
