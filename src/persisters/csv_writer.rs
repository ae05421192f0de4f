use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use csv::{StringRecord, WriterBuilder};
use tempfile::NamedTempFile;

use crate::{
    error::{Result, TrackerError},
    model::schema::Schema,
};

pub struct CsvWriter {}

impl CsvWriter {
    /// Writes the header and then `rows` as given.
    ///
    /// Rows may be wider than the header: cells the header has no name for
    /// are written too.
    pub fn write_rows<W: Write>(
        out: W,
        schema: &Schema,
        rows: &[StringRecord],
        file_name: &Path,
    ) -> Result<()> {
        let mut wrt = WriterBuilder::new().flexible(true).from_writer(out);
        wrt.write_record(schema.headers())
            .map_err(|e| TrackerError::from_csv(file_name, e))?;

        for (idx, row) in rows.iter().enumerate() {
            wrt.write_record(row).map_err(|e| {
                log::debug!("Failed to write line {}", idx + 2);
                TrackerError::from_csv(file_name, e)
            })?;
        }

        wrt.flush().map_err(|e| TrackerError::io(file_name, e))?;
        Ok(())
    }

    /// Replaces `file_name` with the header and `rows`.
    ///
    /// The destination is either fully rewritten or left as it was.
    pub fn save_rows_to_csv(
        schema: &Schema,
        rows: &[StringRecord],
        file_name: &Path,
    ) -> Result<()> {
        write_atomically(file_name, |file| {
            CsvWriter::write_rows(file, schema, rows, file_name)
        })
    }
}

/// Writes through a temporary file in the destination directory and renames
/// it over `path` once everything reached the disk.
///
/// An existing destination keeps its permissions.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| TrackerError::io(&dir, e))?;

    write(tmp.as_file_mut())?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TrackerError::io(tmp.path(), e))?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| TrackerError::io(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| TrackerError::io(path, e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
