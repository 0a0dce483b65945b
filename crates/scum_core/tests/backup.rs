use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use scum_core::backup::{backup_path_for, create_backup, create_backup_at};
use scum_core::core_api::CoreErrorCode;

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn backup_name_is_file_name_safe_sibling() {
    let stamp = Utc.with_ymd_and_hms(2023, 8, 5, 14, 3, 9).unwrap();
    let path = backup_path_for(Path::new("/saves/SCUM.db"), &stamp);

    assert_eq!(
        path,
        PathBuf::from("/saves/SCUM-bak-2023-08-05T14-03-09.000000.db")
    );
}

#[test]
fn backup_name_without_extension() {
    let stamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let path = backup_path_for(Path::new("/saves/SCUM"), &stamp);

    assert_eq!(
        path,
        PathBuf::from("/saves/SCUM-bak-2024-01-02T03-04-05.000000")
    );
}

#[test]
fn backup_copies_database_bytes() {
    let dir = temp_dir("scum_backup_copy");
    let db = dir.join("SCUM.db");
    fs::write(&db, b"not really sqlite").unwrap();

    let backup = create_backup(&db).expect("backup failed");

    assert_eq!(backup.parent(), Some(dir.as_path()));
    assert!(
        backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("SCUM-bak-")
    );
    assert_eq!(fs::read(&backup).unwrap(), b"not really sqlite");
    assert_eq!(fs::read(&db).unwrap(), b"not really sqlite");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn backup_never_overwrites_existing_file() {
    let dir = temp_dir("scum_backup_exists");
    let db = dir.join("SCUM.db");
    fs::write(&db, b"fresh").unwrap();
    let stamp = Utc.with_ymd_and_hms(2023, 8, 5, 0, 0, 0).unwrap();
    let existing = backup_path_for(&db, &stamp);
    fs::write(&existing, b"older backup").unwrap();

    let err = create_backup_at(&db, &stamp).unwrap_err();

    assert_eq!(err.code, CoreErrorCode::Io);
    assert_eq!(fs::read(&existing).unwrap(), b"older backup");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn backup_of_missing_database_fails() {
    let dir = temp_dir("scum_backup_missing");
    let err = create_backup(&dir.join("SCUM.db")).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Io);
    assert!(err.message.contains("SCUM-bak-"));
    // The claimed backup name is released again.
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_copy_leaves_no_empty_backup() {
    let dir = temp_dir("scum_backup_failed_copy");
    let not_a_file = dir.join("SCUM.db");
    fs::create_dir(&not_a_file).unwrap();
    let stamp = Utc.with_ymd_and_hms(2023, 8, 5, 0, 0, 0).unwrap();

    let err = create_backup_at(&not_a_file, &stamp).unwrap_err();

    assert_eq!(err.code, CoreErrorCode::Io);
    assert!(!backup_path_for(&not_a_file, &stamp).exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

    let _ = fs::remove_dir_all(&dir);
}
