//! geocdn — command-line client for the carto data CDN.
//!
//! Usage examples
//! --------------
//!
//! - Show when the CDN was last updated and what it holds
//!   $ geocdn catalog
//!
//! - List the barrier types the catalog advertises
//!   $ geocdn list types
//!
//! - Load a country (gzip first, plain JSON fallback) and print a summary
//!   $ geocdn country FR
//!
//! - Dump a dataset as GeoJSON from a local mirror
//!   $ geocdn --base-url http://localhost:8000 load types/seuil.geojson --json
//!
//! - Prepare a file, or a whole data directory, for publishing
//!   $ geocdn compress data/countries/france.geojson
//!   $ geocdn compress --directory data --delete

mod args;
mod compress;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geocdn::{Category, DataLoader, FeatureCollection};

use crate::args::{CliArgs, Commands, OutputArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let loader = DataLoader::new().with_base_url(args.base_url);

    match args.command {
        Commands::Catalog => {
            let catalog = loader
                .fetch_catalog()
                .await
                .context("failed to fetch catalog")?;
            println!("Last updated: {}", catalog.last_updated);
            for (name, category) in &catalog.data_categories {
                println!("  {name:<12} {} files", category.files.len());
            }
        }
        Commands::List { category } => {
            anyhow::ensure!(loader.initialize().await, "failed to initialize catalog");
            for file in loader.list_available_files(&category)? {
                println!("{file}");
            }
        }
        Commands::Load {
            path,
            uncompressed,
            output,
        } => {
            let fc = loader.load_geojson(&path, !uncompressed).await?;
            print_collection(&path, &fc, &output)?;
        }
        Commands::Country { code, output } => {
            load_and_print(&loader, Category::Countries, &code, &output).await?;
        }
        Commands::Type { name, output } => {
            load_and_print(&loader, Category::Types, &name, &output).await?;
        }
        Commands::Region { name, output } => {
            load_and_print(&loader, Category::Regions, &name, &output).await?;
        }
        Commands::Compress {
            file,
            directory,
            delete,
        } => {
            if let Some(file) = file {
                let result = compress::compress_file(&file, delete)?;
                print_compressed(&result);
            } else {
                let dir = directory.unwrap_or_else(|| PathBuf::from("data"));
                let summary = compress::compress_directory(&dir, delete);
                for result in &summary.compressed {
                    print_compressed(result);
                }
                for (path, e) in &summary.failed {
                    eprintln!("failed to compress {}: {e:#}", path.display());
                }
                println!("{} files compressed", summary.compressed.len());
                anyhow::ensure!(
                    summary.failed.is_empty(),
                    "{} files failed to compress",
                    summary.failed.len()
                );
            }
        }
    }

    Ok(())
}

fn print_compressed(result: &compress::Compressed) {
    println!(
        "{} -> {}: {} -> {} bytes ({:.1}% smaller){}",
        result.source.display(),
        result.output.display(),
        result.original_size,
        result.compressed_size,
        result.reduction(),
        if result.deleted { ", original deleted" } else { "" },
    );
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

async fn load_and_print(
    loader: &DataLoader,
    category: Category,
    name: &str,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let fc = loader.load_category(category, name).await?;
    print_collection(&category.logical_path(name), &fc, output)
}

fn print_collection(
    path: &str,
    fc: &FeatureCollection,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(fc)?);
    } else {
        println!("{path}: {} features", fc.len());
    }
    Ok(())
}
