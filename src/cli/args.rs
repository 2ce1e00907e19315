//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::GeonameId;

/// Builds the continent/country/subdivision tree of the world from GeoNames
#[derive(Parser, Debug)]
#[command(name = "regiontree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Config file (default: ./regiontree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// GeoNames username
    #[arg(short, long, global = true, env = "GEONAMES_USERNAME")]
    pub username: Option<String>,

    /// Seconds to wait before each request
    #[arg(short, long, global = true)]
    pub throttle: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the indented text report
    Report {
        /// Output file, `-` for stdout (default: <output_dir>/worldtree.txt)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Write continents and countries as one graph
    Dot {
        /// Output file, `-` for stdout (default: <output_dir>/worldtree.dot)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Write one graph per continent, down to subdivisions
    Continents {
        /// Target directory (default: output_dir)
        #[arg(short = 'o', long, value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Show the tree
    Tree,

    /// Look up a region in the built tree
    Find {
        /// GeoNames id
        id: GeonameId,
    },

    /// List all countries of the built tree
    Countries,

    /// Fetch the direct children of a region
    Children {
        /// GeoNames id
        id: GeonameId,
    },

    /// Fetch the raw GeoNames record of a region
    Get {
        /// GeoNames id
        id: GeonameId,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Show config file locations
    Path,
}
