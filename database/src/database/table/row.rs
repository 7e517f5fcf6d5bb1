use serde::{Deserialize, Serialize};

use crate::{
    consts::consts::{EntityId, TransactionId, VersionId},
    model::contact::Contact,
};

use super::table::ApplyErrors;

#[derive(Debug)]
pub struct ApplyUpdateResult {
    pub previous: Contact,
    pub current: Contact,
}

#[derive(Debug)]
pub struct ApplyDeleteResult {
    pub previous: Contact,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateContactData {
    pub name: UpdateStatement,
    pub number: UpdateStatement,
    pub email: UpdateStatement,
}

impl UpdateContactData {
    /// Full replacement of every field, this is what the edit form submits
    pub fn replace_all(name: String, number: String, email: String) -> Self {
        Self {
            name: UpdateStatement::Set(name),
            number: UpdateStatement::Set(number),
            email: UpdateStatement::Set(email),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum UpdateStatement {
    Set(String),
    Unset,
    NoChanges,
}

impl UpdateStatement {
    pub fn apply_to(&self, field: &mut String, field_name: &str) -> Result<(), ApplyErrors> {
        match self {
            UpdateStatement::Set(value) if !value.trim().is_empty() => *field = value.clone(),
            // Every contact field is required
            UpdateStatement::Set(_) | UpdateStatement::Unset => {
                return Err(ApplyErrors::NotNullConstraintViolation(
                    field_name.to_string(),
                ))
            }
            UpdateStatement::NoChanges => {}
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ContactVersionState {
    State(Contact),
    Delete,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContactVersion {
    pub id: EntityId,
    pub state: ContactVersionState,
    pub version: VersionId,
    pub transaction_id: TransactionId,
}

impl ContactVersion {
    pub fn get_contact(&self) -> Option<Contact> {
        match &self.state {
            ContactVersionState::State(contact) => Some(contact.clone()),
            ContactVersionState::Delete => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactRow {
    /// Earliest versions are at beginning, latest version is last
    pub versions: Vec<ContactVersion>,
}

impl ContactRow {
    pub fn new(contact: Contact, transaction_id: TransactionId) -> Self {
        ContactRow {
            versions: vec![ContactVersion {
                id: contact.id.clone(),
                state: ContactVersionState::State(contact),
                version: VersionId::new_first_version(),
                transaction_id,
            }],
        }
    }

    pub fn apply_update(
        &mut self,
        id: &EntityId,
        update: UpdateContactData,
        transaction_id: TransactionId,
    ) -> Result<ApplyUpdateResult, ApplyErrors> {
        let previous_version = self.current_version().clone();

        // Verify
        let previous_contact = match previous_version.state.clone() {
            ContactVersionState::Delete => {
                return Err(ApplyErrors::CannotUpdateDoesNotExist(id.clone()))
            }
            ContactVersionState::State(s) => s,
        };

        let mut current_contact = previous_contact.clone();

        update.name.apply_to(&mut current_contact.name, "Name")?;
        update.number.apply_to(&mut current_contact.number, "Number")?;
        update.email.apply_to(&mut current_contact.email, "Email")?;

        // Apply
        self.apply_new_version(
            &previous_version,
            ContactVersionState::State(current_contact.clone()),
            transaction_id,
        );

        Ok(ApplyUpdateResult {
            previous: previous_contact,
            current: current_contact,
        })
    }

    pub fn apply_delete(
        &mut self,
        id: &EntityId,
        transaction_id: TransactionId,
    ) -> Result<ApplyDeleteResult, ApplyErrors> {
        let current_version = self.current_version().clone();

        // Verify
        let previous_contact = match current_version.state.clone() {
            ContactVersionState::State(s) => s,
            ContactVersionState::Delete => {
                return Err(ApplyErrors::CannotDeleteDoesNotExist(id.clone()));
            }
        };

        // Apply
        self.apply_new_version(&current_version, ContactVersionState::Delete, transaction_id);

        Ok(ApplyDeleteResult {
            previous: previous_contact,
        })
    }

    fn apply_new_version(
        &mut self,
        current_version: &ContactVersion,
        new_state: ContactVersionState,
        transaction_id: TransactionId,
    ) {
        self.versions.push(ContactVersion {
            id: current_version.id.clone(),
            state: new_state,
            version: current_version.version.increment(),
            transaction_id,
        });
    }

    pub fn current_version(&self) -> &ContactVersion {
        // A row is always created with a version and versions are never removed
        &self.versions[self.versions.len() - 1]
    }

    pub fn current_state(&self) -> Option<Contact> {
        self.current_version().get_contact()
    }

    /// Transaction that first created the row, used to give listings a stable order
    pub fn created_at(&self) -> &TransactionId {
        &self.versions[0].transaction_id
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }
}
