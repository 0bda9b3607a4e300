//! Subcommand implementations.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use open_trails_archive::{ArchiveContents, extract_archive, package_archive};
use open_trails_models::{BundlePaths, Message};
use open_trails_transform::{
    TransformContext, TransformOutput, make_named_trails, make_steward, parse_feature_collection,
    transform_segments, transform_trailheads, write_named_trails_csv, write_stewards_csv,
};
use open_trails_validate::{ValidationReport, check_bundle};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Environment variable naming where uploaded bundles are extracted.
pub const WORK_DIR_ENV: &str = "OPEN_TRAILS_WORK_DIR";

/// Which transform to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Trail segments (lines).
    Segments,
    /// Trailheads (points).
    Trailheads,
}

/// Arguments for `package`.
#[derive(Debug, clap::Args)]
pub struct PackageArgs {
    /// Uploaded segments `GeoJSON`
    #[arg(long)]
    pub segments: PathBuf,

    /// Uploaded trailheads `GeoJSON`
    #[arg(long)]
    pub trailheads: Option<PathBuf>,

    /// Steward (publishing organization) name
    #[arg(long)]
    pub steward_name: String,

    /// Steward website
    #[arg(long, default_value = "")]
    pub steward_url: String,

    /// Steward phone number
    #[arg(long, default_value = "")]
    pub steward_phone: String,

    /// Steward mailing address
    #[arg(long, default_value = "")]
    pub steward_address: String,

    /// Data license
    #[arg(long, default_value = "")]
    pub license: String,

    /// Whether the steward is also the publisher
    #[arg(long)]
    pub publisher: bool,

    /// Dataset identifier used in log output
    #[arg(long, default_value = "dataset")]
    pub dataset: String,

    /// Zip archive to write
    #[arg(long)]
    pub output: PathBuf,
}

/// Directory under which uploaded archives are extracted.
#[must_use]
pub fn work_dir() -> PathBuf {
    std::env::var(WORK_DIR_ENV).map_or_else(|_| std::env::temp_dir(), PathBuf::from)
}

fn run_transform(kind: FeatureKind, input: &Path, ctx: &TransformContext) -> CliResult<TransformOutput> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("Failed to read {}: {e}", input.display()))?;
    let raw = parse_feature_collection(&text)
        .map_err(|e| format!("{} is not a feature collection: {e}", input.display()))?;

    Ok(match kind {
        FeatureKind::Segments => transform_segments(&raw, ctx),
        FeatureKind::Trailheads => transform_trailheads(&raw, ctx),
    })
}

/// Writes `bytes` to `output`, or to stdout when no output is given.
fn write_output(output: Option<&Path>, bytes: &[u8]) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, bytes).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        log::info!("Wrote {}", path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Prints diagnostics to stderr so they never mix with data on stdout.
pub fn print_messages(messages: &[Message]) {
    for message in messages {
        eprintln!("{message}");
    }
}

/// `segments` / `trailheads`: transforms one uploaded file.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or the output
/// cannot be written.
pub fn transform(
    kind: FeatureKind,
    input: &Path,
    output: Option<&Path>,
    dataset: &str,
) -> CliResult<Vec<Message>> {
    let result = run_transform(kind, input, &TransformContext::new(dataset))?;
    let mut json = serde_json::to_vec_pretty(&result.geojson)?;
    json.push(b'\n');
    write_output(output, &json)?;
    Ok(result.messages)
}

/// `named-trails`: derives `named_trails.csv` from canonical segments.
///
/// # Errors
///
/// Returns an error if the segments cannot be read or parsed, or the CSV
/// cannot be written.
pub fn named_trails(segments: &Path, output: Option<&Path>) -> CliResult<usize> {
    let text = std::fs::read_to_string(segments)
        .map_err(|e| format!("Failed to read {}: {e}", segments.display()))?;
    let collection = parse_feature_collection(&text)?;
    let trails = make_named_trails(&collection);

    let mut csv = Vec::new();
    write_named_trails_csv(&mut csv, &trails)?;
    write_output(output, &csv)?;

    Ok(trails.len())
}

/// `package`: transforms uploaded files and writes the bundle archive.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or the archive
/// cannot be written.
pub fn package(args: &PackageArgs) -> CliResult<Vec<Message>> {
    let ctx = TransformContext::new(args.dataset.as_str());

    let segments = run_transform(FeatureKind::Segments, &args.segments, &ctx)?;
    let trailheads = args
        .trailheads
        .as_deref()
        .map(|path| run_transform(FeatureKind::Trailheads, path, &ctx))
        .transpose()?;

    let mut named_trails_csv = Vec::new();
    write_named_trails_csv(&mut named_trails_csv, &make_named_trails(&segments.geojson))?;

    let steward = make_steward(
        &args.steward_name,
        &args.steward_url,
        &args.steward_phone,
        &args.steward_address,
        &args.license,
        args.publisher,
    );
    let mut stewards_csv = Vec::new();
    write_stewards_csv(&mut stewards_csv, &[steward])?;

    let segments_json = serde_json::to_vec(&segments.geojson)?;
    let trailheads_json = trailheads
        .as_ref()
        .map(|output| serde_json::to_vec(&output.geojson))
        .transpose()?;

    package_archive(
        &args.output,
        &ArchiveContents {
            trail_segments: &segments_json,
            trailheads: trailheads_json.as_deref(),
            named_trails: &named_trails_csv,
            stewards: &stewards_csv,
        },
    )?;

    let mut messages = segments.messages;
    if let Some(trailheads) = trailheads {
        messages.extend(trailheads.messages);
    }
    Ok(messages)
}

/// `validate`: checks a bundle directory or zip archive.
///
/// Archives are extracted into a per-archive directory under `work_dir`,
/// replacing anything left there by a previous run.
///
/// # Errors
///
/// Returns an error if the archive cannot be extracted or a bundle file
/// cannot be read.
pub fn validate(bundle: &Path, work_dir: &Path) -> CliResult<ValidationReport> {
    let paths = if bundle.is_dir() {
        BundlePaths::in_dir(bundle)
    } else {
        let stem = bundle
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bundle");
        let dest = work_dir.join(format!("open_trails_{stem}"));
        if dest.exists() {
            std::fs::remove_dir_all(&dest)
                .map_err(|e| format!("Failed to clear {}: {e}", dest.display()))?;
        }
        extract_archive(bundle, &dest)?
    };

    Ok(check_bundle(&paths)?)
}
