//! Gzip GeoJSON files for publishing next to their plain originals.
//!
//! The CDN serves every dataset twice, `<name>.geojson` and
//! `<name>.geojson.gz`; this produces the second from the first.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Extension of the files picked up by a directory run.
const GEOJSON_EXTENSION: &str = ".geojson";

/// Outcome of compressing one file.
#[derive(Debug)]
pub struct Compressed {
    /// The plain `.geojson` input.
    pub source: PathBuf,
    /// The `.geojson.gz` written next to it.
    pub output: PathBuf,
    /// Input size in bytes.
    pub original_size: usize,
    /// Output size in bytes.
    pub compressed_size: usize,
    /// Whether the plain original was removed afterwards.
    pub deleted: bool,
}

impl Compressed {
    /// Size reduction in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction(&self) -> f64 {
        (1.0 - self.compressed_size as f64 / self.original_size.max(1) as f64) * 100.0
    }
}

/// Outcome of a directory run. Failures do not stop the run.
#[derive(Debug, Default)]
pub struct DirectorySummary {
    /// Files compressed successfully.
    pub compressed: Vec<Compressed>,
    /// Files or directory entries that failed, with the reason.
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

/// Gzip `path` into `<path>.gz`, optionally deleting the original.
///
/// The input must be valid JSON; nothing is written or deleted otherwise.
pub fn compress_file(path: &Path, delete_original: bool) -> anyhow::Result<Compressed> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    geocdn::parse_feature_collection(&data)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let compressed = geocdn::compress(&data)?;
    let mut output = path.to_path_buf().into_os_string();
    output.push(".gz");
    let output = PathBuf::from(output);
    fs::write(&output, &compressed)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let result = Compressed {
        source: path.to_path_buf(),
        output,
        original_size: data.len(),
        compressed_size: compressed.len(),
        deleted: delete_original,
    };
    tracing::info!(
        source = %result.source.display(),
        output = %result.output.display(),
        original_size = result.original_size,
        compressed_size = result.compressed_size,
        "compressed"
    );

    if delete_original {
        fs::remove_file(path).with_context(|| format!("failed to delete {}", path.display()))?;
        tracing::info!(path = %path.display(), "deleted original");
    }

    Ok(result)
}

/// Find every `*.geojson` file under `dir`, in path order.
///
/// Entries that cannot be read are returned as failures.
pub fn find_geojson_files(dir: &Path) -> (Vec<PathBuf>, Vec<(PathBuf, anyhow::Error)>) {
    let mut files = Vec::new();
    let mut failed = Vec::new();

    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let is_geojson = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(GEOJSON_EXTENSION));
                if entry.file_type().is_file() && is_geojson {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                failed.push((path, e.into()));
            }
        }
    }

    (files, failed)
}

/// Compress every `*.geojson` file under `dir`, continuing past failures.
pub fn compress_directory(dir: &Path, delete_originals: bool) -> DirectorySummary {
    let (files, failed) = find_geojson_files(dir);
    tracing::info!(dir = %dir.display(), files = files.len(), "compressing directory");

    let mut summary = DirectorySummary {
        failed,
        ..DirectorySummary::default()
    };

    for file in files {
        match compress_file(&file, delete_originals) {
            Ok(compressed) => summary.compressed.push(compressed),
            Err(e) => {
                tracing::error!(
                    path = %file.display(),
                    error = %format!("{e:#}"),
                    "failed to compress"
                );
                summary.failed.push((file, e));
            }
        }
    }

    tracing::info!(
        compressed = summary.compressed.len(),
        failed = summary.failed.len(),
        "compression finished"
    );
    summary
}
