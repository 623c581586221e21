//! The durable, file-backed event collection.
//!
//! One JSON file holds the whole collection; every mutation is a full
//! read-modify-write guarded by the store's write lock, with a backup
//! snapshot of the previous state taken before the file is overwritten.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::backup::BackupManager;
use crate::config::Config;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::{Event, EventDraft, EventPatch};

/// What reading the events file produced.
///
/// A missing file is the normal empty state; corrupt content is a distinct
/// case so callers can tell possible data loss apart from a fresh start.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Event>),
    Missing,
    Corrupt(String),
}

/// Owns the events file and the backup manager.
pub struct EventStore {
    path: PathBuf,
    backup: BackupManager,
    // Serializes every load->mutate->replace sequence. Readers skip it and
    // see whatever the latest committed state is.
    write_lock: Mutex<()>,
}

impl EventStore {
    pub fn new(config: &Config) -> Self {
        EventStore {
            path: config.events_file.clone(),
            backup: BackupManager::new(config),
            write_lock: Mutex::new(()),
        }
    }

    /// Read and parse the events file, reporting missing and corrupt
    /// content as distinct outcomes.
    pub fn read_events(&self) -> LoadOutcome {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return LoadOutcome::Missing;
            }
            Err(err) => return LoadOutcome::Corrupt(err.to_string()),
        };

        match serde_json::from_str(&data) {
            Ok(events) => LoadOutcome::Loaded(events),
            Err(err) => LoadOutcome::Corrupt(err.to_string()),
        }
    }

    /// All persisted events. A missing file is an empty collection;
    /// unreadable or unparseable content is logged and also treated as
    /// empty rather than failing the request.
    pub fn load_all(&self) -> Vec<Event> {
        match self.read_events() {
            LoadOutcome::Loaded(events) => events,
            LoadOutcome::Missing => Vec::new(),
            LoadOutcome::Corrupt(err) => {
                warn!("could not load events from {}: {err}", self.path.display());
                Vec::new()
            }
        }
    }

    /// The sole mutation primitive: snapshot the current persisted state,
    /// then overwrite the events file in full. A failed write means no
    /// durable change happened, though the backup may already exist.
    pub fn replace_all(&self, events: &[Event]) -> CalSyncResult<()> {
        self.backup.snapshot(&self.load_all());

        let json = serde_json::to_string_pretty(events)
            .map_err(|err| CalSyncError::Persistence(err.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|err| CalSyncError::Persistence(err.to_string()))?;
        Ok(())
    }

    /// Append a new event, filling in id and color defaults.
    pub fn create(&self, draft: EventDraft) -> CalSyncResult<Event> {
        let _guard = self.lock_writes();
        let mut events = self.load_all();
        let event = draft.into_event();
        events.push(event.clone());
        self.replace_all(&events)?;
        Ok(event)
    }

    /// Shallow-merge `patch` onto the event with `id`.
    pub fn update(&self, id: &str, patch: EventPatch) -> CalSyncResult<Event> {
        let _guard = self.lock_writes();
        let mut events = self.load_all();
        let event = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| CalSyncError::EventNotFound(id.to_string()))?;
        patch.apply(event);
        let updated = event.clone();
        self.replace_all(&events)?;
        Ok(updated)
    }

    /// Remove the event with `id`. Removing nothing is an error, detected
    /// by comparing lengths before and after the filter.
    pub fn delete(&self, id: &str) -> CalSyncResult<()> {
        let _guard = self.lock_writes();
        let events = self.load_all();
        let remaining: Vec<Event> = events
            .iter()
            .filter(|event| event.id != id)
            .cloned()
            .collect();
        if remaining.len() == events.len() {
            return Err(CalSyncError::EventNotFound(id.to_string()));
        }
        self.replace_all(&remaining)?;
        Ok(())
    }

    /// Wholesale replacement of the entire collection with the client's
    /// events. Ids are assigned where missing; unknown fields were already
    /// dropped at deserialization. Returns how many events were stored.
    pub fn sync(&self, drafts: Vec<EventDraft>) -> CalSyncResult<usize> {
        let _guard = self.lock_writes();
        let events: Vec<Event> = drafts.into_iter().map(EventDraft::into_event).collect();
        self.replace_all(&events)?;
        Ok(events.len())
    }

    /// Events whose `start` begins with `date`. A plain string prefix
    /// match, not a calendar-aware comparison.
    pub fn events_on(&self, date: &str) -> Vec<Event> {
        self.load_all()
            .into_iter()
            .filter(|event| event.start.starts_with(date))
            .collect()
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn lock_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means an earlier writer panicked; the file
        // itself is still in its last committed state.
        match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
