#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zip packaging for `OpenTrails` bundles.
//!
//! Transformed data is shipped as a flat zip of fixed-name files
//! (`trail_segments.geojson`, `trailheads.geojson`, `named_trails.csv`,
//! `stewards.csv`). Uploaded bundles come back the same way, possibly
//! wrapped in a folder or carrying OS metadata files; [`extract_archive`]
//! pulls out only the recognized files so the validator can find them at
//! their fixed paths.

use std::io::{Seek, Write};
use std::path::Path;

use open_trails_models::{BundlePaths, Table};
use thiserror::Error;
use zip::write::SimpleFileOptions;

/// Errors from archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Archive file not found.
    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    /// Malformed zip or a zip write failure.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error during packaging or extraction.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Serialized tables to package.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveContents<'a> {
    /// Canonical segments `GeoJSON`.
    pub trail_segments: &'a [u8],
    /// Canonical trailheads `GeoJSON`, when the dataset has trailheads.
    pub trailheads: Option<&'a [u8]>,
    /// `named_trails.csv` contents.
    pub named_trails: &'a [u8],
    /// `stewards.csv` contents.
    pub stewards: &'a [u8],
}

impl<'a> ArchiveContents<'a> {
    /// The entries to write, in archive order.
    fn entries(&self) -> Vec<(Table, &'a [u8])> {
        let mut entries = vec![(Table::TrailSegments, self.trail_segments)];
        if let Some(trailheads) = self.trailheads {
            entries.push((Table::Trailheads, trailheads));
        }
        entries.push((Table::NamedTrails, self.named_trails));
        entries.push((Table::Stewards, self.stewards));
        entries
    }
}

/// Writes `contents` as a zip archive of sibling entries into `writer`.
///
/// Returns the writer once the archive is finished.
///
/// # Errors
///
/// Returns [`ArchiveError::Zip`] if an entry cannot be written.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    contents: &ArchiveContents<'_>,
) -> Result<W, ArchiveError> {
    let mut zip_writer = zip::ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (table, data) in contents.entries() {
        log::debug!("  adding {} ({} bytes)", table.file_name(), data.len());
        zip_writer.start_file(table.file_name(), options)?;
        zip_writer
            .write_all(data)
            .map_err(|e| ArchiveError::Io {
                path: table.file_name().to_string(),
                source: e,
            })?;
    }

    Ok(zip_writer.finish()?)
}

/// Packages `contents` into a zip archive at `archive_path`.
///
/// The archive is written to a temp file first and renamed into place, so
/// an interrupted run never leaves a truncated archive behind. Returns the
/// archive size in bytes.
///
/// # Errors
///
/// Returns an error if the archive cannot be written.
pub fn package_archive(
    archive_path: &Path,
    contents: &ArchiveContents<'_>,
) -> Result<u64, ArchiveError> {
    log::info!("Packaging bundle -> {}", archive_path.display());

    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ArchiveError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let tmp_path = archive_path.with_extension("zip.tmp");

    let file = std::fs::File::create(&tmp_path).map_err(|e| ArchiveError::Io {
        path: tmp_path.display().to_string(),
        source: e,
    })?;

    let mut file = write_archive(file, contents)?;
    file.flush().map_err(|e| ArchiveError::Io {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    drop(file);

    std::fs::rename(&tmp_path, archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.display().to_string(),
        source: e,
    })?;

    let size = std::fs::metadata(archive_path)
        .map(|m| m.len())
        .unwrap_or(0);

    log::info!("  archive size: {size} bytes");

    Ok(size)
}

/// Extracts the recognized bundle files of a zip archive into `dest_dir`.
///
/// Entries are matched by basename, so a bundle zipped inside a folder
/// still works. Directories, dot-files (including `__MACOSX/._*` resource
/// forks) and unrecognized names are skipped. The returned paths point at
/// the fixed locations inside `dest_dir` whether or not each file was
/// present in the archive.
///
/// # Errors
///
/// Returns an error if the archive is missing, malformed, or an entry
/// cannot be written.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<BundlePaths, ArchiveError> {
    if !archive_path.is_file() {
        return Err(ArchiveError::ArchiveNotFound(
            archive_path.display().to_string(),
        ));
    }

    log::info!(
        "Extracting {} -> {}",
        archive_path.display(),
        dest_dir.display()
    );

    std::fs::create_dir_all(dest_dir).map_err(|e| ArchiveError::Io {
        path: dest_dir.display().to_string(),
        source: e,
    })?;

    let file = std::fs::File::open(archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.display().to_string(),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(file)?;
    let mut extracted = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let Some(table) = entry
            .enclosed_name()
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .filter(|name| !name.starts_with('.'))
            .and_then(Table::from_file_name)
        else {
            log::warn!("  skipping unrecognized entry {}", entry.name());
            continue;
        };

        let out_path = dest_dir.join(table.file_name());
        let mut out = std::fs::File::create(&out_path).map_err(|e| ArchiveError::Io {
            path: out_path.display().to_string(),
            source: e,
        })?;
        std::io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::Io {
            path: out_path.display().to_string(),
            source: e,
        })?;

        log::debug!("  extracted {} -> {}", entry.name(), out_path.display());
        extracted += 1;
    }

    log::info!("  extracted {extracted} bundle file(s)");

    Ok(BundlePaths::in_dir(dest_dir))
}
