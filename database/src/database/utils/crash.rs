use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum DatabaseCrash {
    #[error("Inconsistent, uncommitted world state due to storage error: {0}")]
    InconsistentUncommittedInMemoryWorldStateFromWALWrite(StoreError),
}

/// The in-memory table no longer matches the transaction log. The database thread must stop
/// accepting requests, it is restored from the log on the next start.
pub fn crash_database(reason: &DatabaseCrash) -> String {
    log::error!("Database crash: {}", reason);

    format!("{}", reason)
}
