//! Rotating pre-write snapshots of the event collection.
//!
//! Every mutating write is preceded by a full copy of the current events
//! file into the backup directory. Backups are best-effort: any failure is
//! logged and swallowed so the primary write is never blocked.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CalSyncResult;
use crate::event::Event;

/// Maximum number of snapshots kept after a cleanup pass.
pub const RETENTION_LIMIT: usize = 100;

const BACKUP_PREFIX: &str = "events.backup.";
const BACKUP_SUFFIX: &str = ".json";

/// Writes timestamp-named snapshots and prunes old ones.
pub struct BackupManager {
    enabled: bool,
    dir: PathBuf,
    // Last issued stamp; bumping collisions forward keeps names strictly
    // increasing even for back-to-back writes within one millisecond.
    last_stamp: AtomicI64,
}

impl BackupManager {
    pub fn new(config: &Config) -> Self {
        BackupManager {
            enabled: config.backup_enabled,
            dir: config.backup_dir.clone(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Snapshot `current` into a fresh timestamp-named file, then prune
    /// anything beyond the retention limit. No-op when backups are
    /// disabled. Failures never propagate to the caller.
    pub fn snapshot(&self, current: &[Event]) {
        if !self.enabled {
            return;
        }

        match self.write_snapshot(current) {
            Ok(path) => debug!("backup written: {}", path.display()),
            Err(err) => {
                warn!("could not create backup: {err}");
                return;
            }
        }

        if let Err(err) = self.prune() {
            warn!("could not clean up old backups: {err}");
        }
    }

    fn write_snapshot(&self, current: &[Event]) -> CalSyncResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let name = format!("{BACKUP_PREFIX}{}{BACKUP_SUFFIX}", self.next_stamp());
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(current)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Millisecond timestamp, strictly greater than any previously issued
    /// stamp. Thirteen-digit millis sort lexicographically until year 2286.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            });
        match prev {
            Ok(prev) => now.max(prev + 1),
            Err(_) => now,
        }
    }

    /// Delete all but the newest `RETENTION_LIMIT` snapshots. Name order is
    /// creation order, so sorting descending puts the newest first.
    fn prune(&self) -> std::io::Result<()> {
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_backup_name(name))
            .collect();

        names.sort();
        names.reverse();

        for name in names.iter().skip(RETENTION_LIMIT) {
            std::fs::remove_file(self.dir.join(name))?;
            debug!("removed old backup: {name}");
        }

        Ok(())
    }

    /// Snapshot names currently on disk, newest first.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_backup_name(name))
            .collect();

        names.sort();
        names.reverse();
        names
    }
}

fn is_backup_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn test_config(dir: &Path, enabled: bool) -> Config {
        Config {
            port: 0,
            tokens: HashMap::new(),
            events_file: dir.join("events.json"),
            backup_enabled: enabled,
            backup_dir: dir.join("backups"),
        }
    }

    fn sample_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: "Sample".to_string(),
            description: None,
            start: "2024-01-01T09:00".to_string(),
            end: "2024-01-01T10:00".to_string(),
            color: "#3498db".to_string(),
        }
    }

    #[test]
    fn disabled_backups_write_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(&test_config(tmp.path(), false));
        manager.snapshot(&[sample_event("a")]);
        assert!(!tmp.path().join("backups").exists());
    }

    #[test]
    fn snapshot_writes_a_full_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(&test_config(tmp.path(), true));
        let events = vec![sample_event("a"), sample_event("b")];
        manager.snapshot(&events);

        let names = manager.list();
        assert_eq!(names.len(), 1);
        let data = std::fs::read_to_string(tmp.path().join("backups").join(&names[0])).unwrap();
        let restored: Vec<Event> = serde_json::from_str(&data).unwrap();
        assert_eq!(restored, events);
    }

    #[test]
    fn stamps_are_strictly_increasing() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(&test_config(tmp.path(), true));
        let stamps: Vec<i64> = (0..50).map(|_| manager.next_stamp()).collect();
        for pair in stamps.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn retention_keeps_the_newest_hundred() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(&test_config(tmp.path(), true));
        let events = vec![sample_event("a")];
        manager.snapshot(&events);
        let oldest = manager.list().pop().unwrap();

        for _ in 0..(RETENTION_LIMIT + 5) {
            manager.snapshot(&events);
        }

        let names = manager.list();
        assert_eq!(names.len(), RETENTION_LIMIT);
        // The very first snapshot fell off the end of the retention window.
        assert!(!names.contains(&oldest));
    }

    #[test]
    fn unrelated_files_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(&test_config(tmp.path(), true));
        let backups = tmp.path().join("backups");
        std::fs::create_dir_all(&backups).unwrap();
        std::fs::write(backups.join("notes.txt"), "keep me").unwrap();

        let events = vec![sample_event("a")];
        for _ in 0..(RETENTION_LIMIT + 5) {
            manager.snapshot(&events);
        }

        assert!(backups.join("notes.txt").exists());
        assert_eq!(manager.list().len(), RETENTION_LIMIT);
    }

    #[test]
    fn unwritable_backup_dir_is_swallowed() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("backups");
        // A file where the directory should be makes create_dir_all fail.
        std::fs::write(&blocker, "in the way").unwrap();

        let config = Config {
            backup_dir: blocker,
            ..test_config(tmp.path(), true)
        };
        let manager = BackupManager::new(&config);
        // Must not panic or propagate.
        manager.snapshot(&[sample_event("a")]);
    }

    #[test]
    fn list_is_empty_for_missing_dir() {
        let manager = BackupManager::new(&test_config(&PathBuf::from("/nonexistent"), true));
        assert!(manager.list().is_empty());
    }
}
