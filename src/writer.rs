//! Output persistence.
//!
//! Records are never streamed straight into the destination. They are
//! serialized into a temporary file next to it and only moved into place by
//! [`StagedOutput::commit`]. An uncommitted stage deletes its temporary file on
//! drop, so a failed run leaves the destination untouched.
//!
//! A commit keeps whatever it replaced until the [`CommittedOutput`] is
//! dropped, so the orchestrator can undo the first of its two commits when the
//! second one fails.

use crate::error::{ExtractError, Result, ResultExt as _};
use crate::record::{Record, SourceShape};
use crate::source::{self, RecordFormat as _};
use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// Serialized output waiting to be moved onto its destination.
#[derive(Debug)]
pub struct StagedOutput {
    destination: PathBuf,
    file: NamedTempFile,
    records: usize,
}

impl StagedOutput {
    /// Atomically replace the destination with the staged file.
    ///
    /// An existing destination is first copied aside so the commit can be
    /// undone with [`CommittedOutput::rollback`].
    pub fn commit(self) -> Result<CommittedOutput> {
        let Self {
            destination,
            file,
            records,
        } = self;

        let backup = if destination.is_file() {
            let backup = NamedTempFile::new_in(staging_dir(&destination))
                .write_context(&destination)?
                .into_temp_path();
            fs::copy(&destination, &backup).write_context(&destination)?;
            Some(backup)
        } else {
            None
        };

        file.persist(&destination)
            .map_err(|e| e.error)
            .write_context(&destination)?;
        log::info!("Wrote {records} records to {}", destination.display());

        Ok(CommittedOutput {
            destination,
            backup,
        })
    }
}

/// An output that has been moved into place but can still be undone.
///
/// Dropping it discards the backup and makes the commit final.
#[derive(Debug)]
pub struct CommittedOutput {
    destination: PathBuf,
    /// Previous contents of the destination, `None` if it did not exist.
    backup: Option<TempPath>,
}

impl CommittedOutput {
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Put the destination back the way it was before the commit.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Write`] if the previous file cannot be restored
    /// or the new one cannot be removed.
    pub fn rollback(self) -> Result<()> {
        let Self {
            destination,
            backup,
        } = self;
        match backup {
            Some(previous) => previous
                .persist(&destination)
                .map_err(|e| e.error)
                .write_context(&destination)?,
            None => fs::remove_file(&destination).write_context(&destination)?,
        }
        log::warn!("Rolled back {}", destination.display());
        Ok(())
    }
}

fn staging_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Give the staged file the permissions a plain `File::create` would have, or
/// those of the file it replaces.
#[cfg(unix)]
fn match_permissions(staged: &Path, destination: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;

    let permissions = match fs::metadata(destination) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::Permissions::from_mode(0o644),
    };
    fs::set_permissions(staged, permissions)
}

#[cfg(not(unix))]
fn match_permissions(_staged: &Path, _destination: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Serialize `records` for `destination` without touching it yet.
///
/// # Errors
///
/// Returns [`ExtractError::Write`] if the destination is a directory or the
/// temporary file cannot be created or written.
pub fn stage(destination: &Path, records: &[Record], shape: &SourceShape) -> Result<StagedOutput> {
    if destination.is_dir() {
        return Err(ExtractError::Write {
            path: destination.to_path_buf(),
            source: io::Error::new(io::ErrorKind::IsADirectory, "destination is a directory"),
        });
    }
    if let Some(columns) = shape.columns() {
        let mismatched = records
            .iter()
            .filter(|r| r.width().is_some_and(|w| w != columns.len()))
            .count();
        if mismatched > 0 {
            log::warn!(
                "{mismatched} rows for {} do not have {} columns and will be reshaped",
                destination.display(),
                columns.len()
            );
        }
    }

    let mut file = NamedTempFile::new_in(staging_dir(destination)).write_context(destination)?;

    {
        let mut out = BufWriter::new(file.as_file_mut());
        source::for_shape(shape)
            .serialize(records, &mut out)
            .write_context(destination)?;
        out.flush().write_context(destination)?;
    }
    file.as_file().sync_all().write_context(destination)?;
    match_permissions(file.path(), destination).write_context(destination)?;

    log::debug!(
        "Staged {} records for {} at {}",
        records.len(),
        destination.display(),
        file.path().display()
    );

    Ok(StagedOutput {
        destination: destination.to_path_buf(),
        file,
        records: records.len(),
    })
}

/// Write `records` to `destination`, overwriting it.
///
/// # Errors
///
/// Returns [`ExtractError::Write`] on any I/O failure.
pub fn write(destination: &Path, records: &[Record], shape: &SourceShape) -> Result<()> {
    stage(destination, records, shape)?.commit()?;
    Ok(())
}
