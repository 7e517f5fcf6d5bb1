use std::{path::PathBuf, str::FromStr, sync::Arc};

use thiserror::Error;
use uuid::Uuid;

use crate::{
    consts::consts::EntityId,
    database::{request_manager::RequestManagerError, table::row::UpdateContactData},
    model::contact::Contact,
};

pub mod document;
pub mod file;

pub use document::DocumentStore;
pub use file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Name is already used: {0}")]
    DuplicateName(String),

    #[error("Contact field is required: {0}")]
    MissingField(String),

    #[error("Contact storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Contact data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unable to restore database from transaction log: {0}")]
    Restore(String),

    #[error("Contact file lock was poisoned by a panicking writer")]
    LockPoisoned,

    #[error(transparent)]
    Database(#[from] RequestManagerError),
}

/// Persistence contract shared by both stores. Names are compared case-insensitively and are
/// unique within a store; the store rejects a clashing write with `StoreError::DuplicateName`.
pub trait ContactStore: Send + Sync {
    fn list_all(&self) -> StoreResult<Vec<Contact>>;

    fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>>;

    fn find_by_name(&self, name: &str) -> StoreResult<Option<Contact>>;

    /// Returns the stored contact, the store may replace the id
    fn insert(&self, contact: Contact) -> StoreResult<Contact>;

    /// `Ok(None)` when no contact has the id
    fn update(&self, id: &EntityId, update: UpdateContactData) -> StoreResult<Option<Contact>>;

    /// Deleting a missing contact is a no-op returning `Ok(None)`
    fn delete_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>>;

    fn delete_by_name(&self, name: &str) -> StoreResult<Option<Contact>>;

    /// Id first, then name. Routes accept either.
    fn find_by_key(&self, key: &str) -> StoreResult<Option<Contact>> {
        match self.find_by_id(&EntityId::from(key))? {
            Some(contact) => Ok(Some(contact)),
            None => self.find_by_name(key),
        }
    }

    fn delete_by_key(&self, key: &str) -> StoreResult<Option<Contact>> {
        match self.delete_by_id(&EntityId::from(key))? {
            Some(contact) => Ok(Some(contact)),
            None => self.delete_by_name(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEngine {
    /// Embedded document database, `transaction_log.json`
    Document,
    /// Whole-file JSON array, `contacts.json`
    File,
}

impl FromStr for StoreEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" | "db" => Ok(StoreEngine::Document),
            "file" | "json" => Ok(StoreEngine::File),
            other => Err(format!(
                "unknown store engine '{}', expected 'document' or 'file'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub data_directory: PathBuf,
    pub engine: StoreEngine,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl StoreOptions {
    pub fn set_data_directory(mut self, data_directory: PathBuf) -> Self {
        self.data_directory = data_directory;
        self
    }

    pub fn set_engine(mut self, engine: StoreEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Fresh directory under /tmp, used by tests and benchmarks
    pub fn new_temporary() -> Self {
        let data_directory: PathBuf = ["/", "tmp", "contactdb", &Uuid::new_v4().to_string()]
            .iter()
            .collect();

        Self::default().set_data_directory(data_directory)
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        // Defaults to $CWD/data
        Self {
            data_directory: PathBuf::from("data"),
            engine: StoreEngine::Document,
        }
    }
}

/// Opens the configured store. Failing here is a startup error, the backing data is unreadable.
pub fn open_store(options: &StoreOptions) -> StoreResult<Arc<dyn ContactStore>> {
    let store: Arc<dyn ContactStore> = match options.engine {
        StoreEngine::Document => Arc::new(DocumentStore::open(&options.data_directory)?),
        StoreEngine::File => Arc::new(JsonFileStore::open(&options.data_directory)?),
    };

    Ok(store)
}
