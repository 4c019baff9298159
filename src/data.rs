use std::path::Path;

use anyhow::Context;

use crate::models::{ClassroomRecord, Dataset};

/// Read the classroom activity CSV into an in-memory dataset.
///
/// Any failure here is fatal to startup: a missing file, an unreadable file,
/// or a row that does not match the expected columns all abort the load.
pub fn load(path: &Path) -> anyhow::Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<ClassroomRecord>().enumerate() {
        let record = result.with_context(|| {
            format!("malformed row {} in {}", index + 1, path.display())
        })?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}
