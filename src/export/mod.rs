//! CSV export of stored tyres.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::database::TyreRow;

/// Writes `rows` to `path` with a header row, replacing any existing file.
pub fn export_to_csv(rows: &[TyreRow], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Exported {} tyres to {}", rows.len(), path.display());
    Ok(rows.len())
}
