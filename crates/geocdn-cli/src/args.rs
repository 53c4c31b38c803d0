use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geocdn::DEFAULT_BASE_URL;

/// CLI arguments for geocdn
#[derive(Debug, Parser)]
#[command(
    name = "geocdn",
    version,
    about = "Browse and load GeoJSON datasets from the carto data CDN"
)]
pub struct CliArgs {
    /// Base URL of the CDN (a mirror or local server also works)
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output options shared by the dataset commands.
#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Print the decoded GeoJSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the catalog's last update and per-category file counts
    Catalog,

    /// List the files the catalog advertises for a category
    List {
        /// Category name (types, countries, regions)
        category: String,
    },

    /// Load a dataset by logical path (e.g. countries/france.geojson)
    Load {
        /// Logical path under data/, without the .gz suffix
        path: String,

        /// Skip the gzip variant and fetch the plain file
        #[arg(long)]
        uncompressed: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Load a country dataset
    Country {
        /// Country code or name (case-insensitive)
        code: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Load a barrier-type dataset
    Type {
        /// Barrier type name (case-insensitive)
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Load a region dataset
    Region {
        /// Region name (case-insensitive)
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Gzip local GeoJSON files for publishing next to the originals
    Compress {
        /// A single .geojson file; the output is written to <file>.gz
        file: Option<PathBuf>,

        /// Compress every .geojson file under this directory (default: data)
        #[arg(short, long, conflicts_with = "file")]
        directory: Option<PathBuf>,

        /// Delete each original after it has been compressed
        #[arg(short = 'x', long)]
        delete: bool,
    },
}
