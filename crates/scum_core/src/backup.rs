use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::core_api::{CoreError, CoreErrorCode};

/// `SCUM.db` with timestamp `2023-08-05T14:03:09.123456` becomes
/// `SCUM-bak-2023-08-05T14-03-09.123456.db` in the same directory.
pub fn backup_path_for<Tz: TimeZone>(db_path: &Path, timestamp: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = timestamp
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .replace(':', "-");
    let stem = db_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "database".to_string());
    let file_name = match db_path.extension() {
        Some(ext) => format!("{stem}-bak-{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}-bak-{stamp}"),
    };

    db_path.with_file_name(file_name)
}

pub fn create_backup(db_path: &Path) -> Result<PathBuf, CoreError> {
    create_backup_at(db_path, &Local::now())
}

pub fn create_backup_at<Tz: TimeZone>(
    db_path: &Path,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf, CoreError>
where
    Tz::Offset: std::fmt::Display,
{
    let backup_path = backup_path_for(db_path, timestamp);

    // Claim the name first so an existing backup is never clobbered.
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&backup_path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("backup {} already exists", backup_path.display()),
                )
            } else {
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to create {}: {e}", backup_path.display()),
                )
            }
        })?;
    let copied = match fs::copy(db_path, &backup_path) {
        Ok(copied) => copied,
        Err(e) => {
            // An empty file with a backup name must not outlive a failed copy.
            let _ = fs::remove_file(&backup_path);
            return Err(CoreError::new(
                CoreErrorCode::Io,
                format!(
                    "failed to copy {} to {}: {e}",
                    db_path.display(),
                    backup_path.display()
                ),
            ));
        }
    };

    tracing::info!(
        source = %db_path.display(),
        backup = %backup_path.display(),
        bytes = copied,
        "database backed up"
    );
    Ok(backup_path)
}
