use std::path::Path;

use crate::{
    consts::consts::EntityId,
    database::{
        database::Database,
        request_manager::{RequestManager, RequestManagerError},
        table::{row::UpdateContactData, table::ApplyErrors},
    },
    model::contact::Contact,
};

use super::{ContactStore, StoreError, StoreResult};

/// Contact store backed by the embedded document database. Ids are UUIDs assigned on insert.
pub struct DocumentStore {
    request_manager: RequestManager,
}

impl DocumentStore {
    /// Replays the transaction log in `data_directory` and starts the database thread
    pub fn open(data_directory: &Path) -> StoreResult<Self> {
        let mut database = Database::new(data_directory)?;

        database.restore(data_directory)?;

        Ok(Self {
            request_manager: database.run(),
        })
    }
}

impl Drop for DocumentStore {
    fn drop(&mut self) {
        match self.request_manager.send_shutdown_request() {
            Ok(status) => log::info!("{}", status),
            Err(err) => log::warn!("Database did not shut down cleanly: {}", err),
        }
    }
}

/// Constraint violations become store errors, "does not exist" becomes `None`
fn missing_as_none(result: Result<Contact, RequestManagerError>) -> StoreResult<Option<Contact>> {
    match result {
        Ok(contact) => Ok(Some(contact)),
        Err(RequestManagerError::Rejected(
            ApplyErrors::CannotUpdateDoesNotExist(_)
            | ApplyErrors::CannotDeleteDoesNotExist(_)
            | ApplyErrors::CannotDeleteNameDoesNotExist(_),
        )) => Ok(None),
        Err(err) => Err(into_store_error(err)),
    }
}

fn into_store_error(err: RequestManagerError) -> StoreError {
    match err {
        RequestManagerError::Rejected(ApplyErrors::UniqueConstraintViolation(name)) => {
            StoreError::DuplicateName(name)
        }
        RequestManagerError::Rejected(ApplyErrors::NotNullConstraintViolation(field)) => {
            StoreError::MissingField(field)
        }
        other => StoreError::Database(other),
    }
}

impl ContactStore for DocumentStore {
    fn list_all(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.request_manager.send_list()?)
    }

    fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>> {
        Ok(self.request_manager.send_get(id.clone())?)
    }

    fn find_by_name(&self, name: &str) -> StoreResult<Option<Contact>> {
        Ok(self.request_manager.send_get_by_name(name.to_string())?)
    }

    fn insert(&self, contact: Contact) -> StoreResult<Contact> {
        // The database owns id assignment
        let contact = Contact {
            id: EntityId::new(),
            ..contact
        };

        self.request_manager
            .send_add(contact)
            .map_err(into_store_error)
    }

    fn update(&self, id: &EntityId, update: UpdateContactData) -> StoreResult<Option<Contact>> {
        missing_as_none(self.request_manager.send_update(id.clone(), update))
    }

    fn delete_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>> {
        missing_as_none(self.request_manager.send_remove(id.clone()))
    }

    fn delete_by_name(&self, name: &str) -> StoreResult<Option<Contact>> {
        missing_as_none(self.request_manager.send_remove_by_name(name.to_string()))
    }
}
