use std::{
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use log::*;
use square_tools::{Location, OAuthToken, Refund, Transaction};
use tokio::{runtime::Handle, task::JoinHandle};

use crate::Record;

/// Owns the process-wide [`Record`].
///
/// Clones share the same record. Mutations go through the `replace_*` methods, each of which swaps out one top-level
/// field and then schedules a write of the whole record to disk. Concurrent mutations of the same field race and the
/// last one wins. Disk writes run on detached tasks and may complete in any order; their failures are logged and
/// never reported to the caller, since the in-memory record is authoritative while the process runs.
#[derive(Clone)]
pub struct RecordStore {
    record: Arc<RwLock<Record>>,
    path: Option<Arc<PathBuf>>,
}

impl Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(p) => write!(f, "RecordStore ({})", p.display()),
            None => write!(f, "RecordStore (in memory)"),
        }
    }
}

impl RecordStore {
    /// Loads the record from `path`. A missing or unreadable file is not an error: the store starts from
    /// [`Record::default`] and creates the file on the first save.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let record = match std::fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str::<Record>(&s).unwrap_or_else(|e| {
                warn!("💾️ {} does not contain a valid record. Starting from an empty one. {e}", path.display());
                Record::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("💾️ No saved record at {}. Starting from an empty one.", path.display());
                Record::default()
            },
            Err(e) => {
                warn!("💾️ Could not read {}. Starting from an empty one. {e}", path.display());
                Record::default()
            },
        };
        debug!("💾️ Loaded record: {}", summary(&record));
        Self { record: Arc::new(RwLock::new(record)), path: Some(Arc::new(path)) }
    }

    /// A store that never touches the disk.
    pub fn in_memory(record: Record) -> Self {
        Self { record: Arc::new(RwLock::new(record)), path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> Record {
        self.record.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace_oauth(&self, oauth: OAuthToken) -> Option<JoinHandle<()>> {
        self.update(|r| r.oauth = oauth)
    }

    pub fn replace_locations(&self, locations: Vec<Location>) -> Option<JoinHandle<()>> {
        self.update(|r| r.locations = locations)
    }

    pub fn replace_transaction(&self, transaction: Transaction) -> Option<JoinHandle<()>> {
        self.update(|r| r.transaction = transaction)
    }

    pub fn replace_refund(&self, refund: Refund) -> Option<JoinHandle<()>> {
        self.update(|r| r.refund = refund)
    }

    fn update<F: FnOnce(&mut Record)>(&self, f: F) -> Option<JoinHandle<()>> {
        {
            let mut record = self.record.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut record);
        }
        self.save()
    }

    /// Schedules a write of the current record to disk and returns the handle of the write task. Nothing needs to
    /// await the handle; it is returned so that tests can.
    ///
    /// Returns `None` for in-memory stores, and when the record could not be scheduled for writing (which is logged).
    pub fn save(&self) -> Option<JoinHandle<()>> {
        let path = self.path.clone()?;
        let json = match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(s) => s,
            Err(e) => {
                error!("💾️ Could not serialize the record. It was not saved. {e}");
                return None;
            },
        };
        let handle = match Handle::try_current() {
            Ok(h) => h,
            Err(e) => {
                error!("💾️ No async runtime available to save the record. {e}");
                return None;
            },
        };
        let task = handle.spawn(async move {
            match tokio::fs::write(path.as_path(), json).await {
                Ok(()) => debug!("💾️ Record saved to {}", path.display()),
                Err(e) => error!("💾️ Saving the record to {} failed. {e}", path.display()),
            }
        });
        Some(task)
    }
}

/// A loggable description of the record. Never includes the tokens.
fn summary(record: &Record) -> String {
    format!(
        "token held: {}, {} location(s), transaction: {}, refund: {}",
        record.oauth.is_authenticated(),
        record.locations.len(),
        record.transaction.id.as_deref().unwrap_or("none"),
        record.refund.id.as_deref().unwrap_or("none"),
    )
}
