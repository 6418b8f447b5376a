//! Generic CSV record I/O

use crate::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

fn csv_error(path: &Path, source: csv::Error) -> StorageError {
    StorageError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read every record of a CSV file after checking its header for `required`
/// columns. Returns the header alongside the records.
pub(crate) fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<(Vec<String>, Vec<T>), StorageError> {
    if !path.is_file() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if let Some(missing) = required.iter().find(|c| !headers.iter().any(|h| h == *c)) {
        return Err(StorageError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| csv_error(path, e))?;

    debug!("Read {} records from {}", records.len(), path.display());
    Ok((headers, records))
}

/// Write records to `path`, replacing it only once the whole table is on disk.
///
/// `header` is used when `records` is empty, since serde cannot derive it then.
pub(crate) fn write_records<T: Serialize>(
    path: &Path,
    header: &[&str],
    records: &[T],
) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let staging = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    {
        let mut writer = csv::Writer::from_writer(staging.as_file());
        if records.is_empty() {
            writer.write_record(header).map_err(|e| csv_error(path, e))?;
        }
        for record in records {
            writer.serialize(record).map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| io_error(path, e))?;
    }
    staging
        .persist(path)
        .map_err(|e| io_error(path, e.error))?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
