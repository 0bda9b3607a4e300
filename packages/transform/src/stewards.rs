//! The single steward record written alongside every dataset.

use std::io::Write;

use open_trails_models::{DEFAULT_STEWARD_ID, Steward, YesNo};

use crate::TransformError;

/// Column order of `stewards.csv`.
pub const STEWARDS_HEADER: &[&str] = &["name", "id", "url", "phone", "address", "publisher", "license"];

/// Builds the steward every feature's `steward_id` points at.
#[must_use]
pub fn make_steward(
    name: &str,
    url: &str,
    phone: &str,
    address: &str,
    license: &str,
    publisher: bool,
) -> Steward {
    Steward {
        name: name.trim().to_string(),
        id: DEFAULT_STEWARD_ID.to_string(),
        url: url.trim().to_string(),
        phone: phone.trim().to_string(),
        address: address.trim().to_string(),
        publisher: if publisher { YesNo::Yes } else { YesNo::No },
        license: license.trim().to_string(),
    }
}

/// Writes `stewards.csv`.
///
/// # Errors
///
/// Returns [`TransformError::Csv`] if writing fails.
pub fn write_stewards_csv<W: Write>(writer: W, stewards: &[Steward]) -> Result<(), TransformError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(STEWARDS_HEADER)?;
    for steward in stewards {
        csv_writer.serialize(steward)?;
    }
    csv_writer.flush()?;

    Ok(())
}
