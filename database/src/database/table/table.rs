use std::collections::HashMap;
use thiserror::Error;

use crate::{
    consts::consts::{EntityId, TransactionId},
    model::{
        contact::{name_key, Contact},
        statement::{Statement, StatementResult},
    },
};

use super::row::{ApplyDeleteResult, ApplyUpdateResult, ContactRow, UpdateStatement};

#[derive(Error, Debug, PartialEq)]
pub enum ApplyErrors {
    // CRUD - CREATE
    #[error("Cannot create, record already exists: {0}")]
    CannotCreateWhenAlreadyExists(EntityId),

    // CRUD - UPDATE
    #[error("Cannot update, record does not exist: {0}")]
    CannotUpdateDoesNotExist(EntityId),

    // CRUD - DELETE
    #[error("Cannot delete, record does not exist: {0}")]
    CannotDeleteDoesNotExist(EntityId),

    #[error("Cannot delete, no record has the name: {0}")]
    CannotDeleteNameDoesNotExist(String),

    // Constraints
    #[error("Cannot save contact as a contact already exists with this name: {0}")]
    UniqueConstraintViolation(String),

    #[error("Cannot set field to null: {0}")]
    NotNullConstraintViolation(String),
}

type RowPrimaryKey = String;

pub struct ContactTable {
    pub contact_rows: HashMap<RowPrimaryKey, ContactRow>,
    /// Case-folded contact name -> row key
    pub unique_name_index: HashMap<String, RowPrimaryKey>,
}

impl Default for ContactTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactTable {
    pub fn new() -> Self {
        Self {
            contact_rows: HashMap::new(),
            unique_name_index: HashMap::new(),
        }
    }

    // Each mutation statement can be broken up into 3 steps
    //  - Verifying validity / constraints (uniqueness)
    //  - Applying statement
    //  - Index maintenance
    #[tracing::instrument(skip(self))]
    pub fn apply(
        &mut self,
        statement: Statement,
        transaction_id: TransactionId,
    ) -> Result<StatementResult, ApplyErrors> {
        let statement_result = match statement {
            Statement::Add(contact) => {
                for (field_name, value) in [
                    ("Name", &contact.name),
                    ("Number", &contact.number),
                    ("Email", &contact.email),
                ] {
                    if value.trim().is_empty() {
                        return Err(ApplyErrors::NotNullConstraintViolation(
                            field_name.to_string(),
                        ));
                    }
                }

                let key = contact.name_key();

                if self.unique_name_index.contains_key(&key) {
                    return Err(ApplyErrors::UniqueConstraintViolation(contact.name));
                }

                let id = contact.id.to_string();

                // Rows outlive their deletion, an id is never reused
                if self.contact_rows.contains_key(&id) {
                    return Err(ApplyErrors::CannotCreateWhenAlreadyExists(contact.id));
                }

                self.contact_rows
                    .insert(id.clone(), ContactRow::new(contact.clone(), transaction_id));

                self.unique_name_index.insert(key, id);

                StatementResult::Single(contact)
            }
            Statement::Update(id, update_contact) => {
                let contact_row = self
                    .contact_rows
                    .get_mut(id.as_str())
                    .ok_or(ApplyErrors::CannotUpdateDoesNotExist(id.clone()))?;

                if let (UpdateStatement::Set(new_name), Some(current)) =
                    (&update_contact.name, contact_row.current_state())
                {
                    let new_key = name_key(new_name);

                    // Keeping the same name (in any casing) does not clash with itself
                    if new_key != current.name_key() && self.unique_name_index.contains_key(&new_key)
                    {
                        return Err(ApplyErrors::UniqueConstraintViolation(new_name.clone()));
                    }
                }

                let ApplyUpdateResult { previous, current } =
                    contact_row.apply_update(&id, update_contact, transaction_id)?;

                if previous.name_key() != current.name_key() {
                    self.unique_name_index.remove(&previous.name_key());
                    self.unique_name_index
                        .insert(current.name_key(), id.to_string());
                }

                StatementResult::Single(current)
            }
            Statement::Remove(id) => {
                let previous = self.remove(&id, transaction_id)?;

                StatementResult::Single(previous)
            }
            Statement::RemoveByName(name) => {
                let id = match self.unique_name_index.get(&name_key(&name)) {
                    Some(id) => EntityId(id.clone()),
                    None => return Err(ApplyErrors::CannotDeleteNameDoesNotExist(name)),
                };

                let previous = self.remove(&id, transaction_id)?;

                StatementResult::Single(previous)
            }
            Statement::Get(id) => {
                let contact = self
                    .contact_rows
                    .get(id.as_str())
                    .and_then(|row| row.current_state());

                StatementResult::GetSingle(contact)
            }
            Statement::GetByName(name) => {
                let contact = self
                    .unique_name_index
                    .get(&name_key(&name))
                    .and_then(|id| self.contact_rows.get(id))
                    .and_then(|row| row.current_state());

                StatementResult::GetSingle(contact)
            }
            Statement::List => StatementResult::List(self.list()),
        };

        Ok(statement_result)
    }

    fn remove(
        &mut self,
        id: &EntityId,
        transaction_id: TransactionId,
    ) -> Result<Contact, ApplyErrors> {
        let contact_row = self
            .contact_rows
            .get_mut(id.as_str())
            .ok_or(ApplyErrors::CannotDeleteDoesNotExist(id.clone()))?;

        let ApplyDeleteResult { previous } = contact_row.apply_delete(id, transaction_id)?;

        self.unique_name_index.remove(&previous.name_key());

        Ok(previous)
    }

    fn list(&self) -> Vec<Contact> {
        let mut live_rows: Vec<&ContactRow> = self
            .contact_rows
            .values()
            .filter(|row| row.current_state().is_some())
            .collect();

        live_rows.sort_by(|a, b| a.created_at().cmp(b.created_at()));

        live_rows
            .into_iter()
            .filter_map(|row| row.current_state())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::table::row::{ContactVersionState, UpdateContactData};

    fn add_contact(table: &mut ContactTable, name: &str, transaction_id: usize) -> Contact {
        let contact = Contact::new(
            name.to_string(),
            "081234567890".to_string(),
            format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        );

        table
            .apply(
                Statement::Add(contact.clone()),
                TransactionId(transaction_id),
            )
            .expect("add should succeed");

        contact
    }

    mod add {
        use super::*;

        #[test]
        fn adding_item_creates_version_at_v1() {
            // Given an empty table
            let mut table = ContactTable::new();

            // When we add an item
            let contact = add_contact(&mut table, "Budi Santoso", 1);

            // Then we should have one version holding the contact
            let row = table
                .contact_rows
                .get(contact.id.as_str())
                .expect("should have row");

            assert_eq!(row.version_count(), 1);
            assert_eq!(
                row.current_version().state,
                ContactVersionState::State(contact)
            );
        }

        #[test]
        fn duplicate_name_is_rejected_case_insensitively() {
            let mut table = ContactTable::new();

            add_contact(&mut table, "Budi Santoso", 1);

            let duplicate = Contact::new(
                "budi SANTOSO".to_string(),
                "081298765432".to_string(),
                "other@example.com".to_string(),
            );

            let result = table.apply(Statement::Add(duplicate), TransactionId(2));

            assert_eq!(
                result,
                Err(ApplyErrors::UniqueConstraintViolation(
                    "budi SANTOSO".to_string()
                ))
            );
            assert_eq!(table.list().len(), 1);
        }

        #[test]
        fn ids_are_not_reused_after_removal() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            table
                .apply(Statement::Remove(contact.id.clone()), TransactionId(2))
                .expect("remove should succeed");

            let result = table.apply(Statement::Add(contact.clone()), TransactionId(3));

            assert_eq!(
                result,
                Err(ApplyErrors::CannotCreateWhenAlreadyExists(contact.id.clone()))
            );
            assert!(table.list().is_empty());
            assert!(!table.unique_name_index.contains_key("budi santoso"));
        }

        #[test]
        fn empty_fields_are_rejected() {
            let mut table = ContactTable::new();

            let contact = Contact::new(
                "Budi".to_string(),
                " ".to_string(),
                "budi@example.com".to_string(),
            );

            let result = table.apply(Statement::Add(contact), TransactionId(1));

            assert_eq!(
                result,
                Err(ApplyErrors::NotNullConstraintViolation("Number".to_string()))
            );
        }
    }

    mod update {
        use super::*;

        #[test]
        fn keeping_the_name_skips_the_uniqueness_check() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            let update = UpdateContactData::replace_all(
                "Budi Santoso".to_string(),
                "081311112222".to_string(),
                "new@example.com".to_string(),
            );

            let result = table
                .apply(Statement::Update(contact.id.clone(), update), TransactionId(2))
                .expect("update should succeed")
                .single()
                .expect("should be a single result");

            assert_eq!(result.name, "Budi Santoso");
            assert_eq!(result.number, "081311112222");
            assert_eq!(result.email, "new@example.com");
        }

        #[test]
        fn renaming_moves_the_name_index() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            let update = UpdateContactData {
                name: UpdateStatement::Set("Siti Rahma".to_string()),
                number: UpdateStatement::NoChanges,
                email: UpdateStatement::NoChanges,
            };

            table
                .apply(Statement::Update(contact.id.clone(), update), TransactionId(2))
                .expect("update should succeed");

            assert!(table.unique_name_index.contains_key("siti rahma"));
            assert!(!table.unique_name_index.contains_key("budi santoso"));

            // The old name is free again
            add_contact(&mut table, "Budi Santoso", 3);
        }

        #[test]
        fn renaming_onto_another_contact_is_rejected() {
            let mut table = ContactTable::new();

            let budi = add_contact(&mut table, "Budi Santoso", 1);
            add_contact(&mut table, "Siti Rahma", 2);

            let update = UpdateContactData {
                name: UpdateStatement::Set("SITI RAHMA".to_string()),
                number: UpdateStatement::NoChanges,
                email: UpdateStatement::NoChanges,
            };

            let result = table.apply(Statement::Update(budi.id, update), TransactionId(3));

            assert_eq!(
                result,
                Err(ApplyErrors::UniqueConstraintViolation(
                    "SITI RAHMA".to_string()
                ))
            );
        }

        #[test]
        fn unsetting_a_field_is_rejected() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            let update = UpdateContactData {
                name: UpdateStatement::NoChanges,
                number: UpdateStatement::NoChanges,
                email: UpdateStatement::Unset,
            };

            let result = table.apply(Statement::Update(contact.id, update), TransactionId(2));

            assert_eq!(
                result,
                Err(ApplyErrors::NotNullConstraintViolation("Email".to_string()))
            );
        }

        #[test]
        fn updating_missing_row_is_an_error() {
            let mut table = ContactTable::new();

            let id = EntityId::from("missing");
            let update = UpdateContactData::replace_all(
                "A".to_string(),
                "081234567890".to_string(),
                "a@b.co".to_string(),
            );

            let result = table.apply(Statement::Update(id.clone(), update), TransactionId(1));

            assert_eq!(result, Err(ApplyErrors::CannotUpdateDoesNotExist(id)));
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn remove_by_name_only_removes_that_contact() {
            let mut table = ContactTable::new();

            add_contact(&mut table, "Budi Santoso", 1);
            let siti = add_contact(&mut table, "Siti Rahma", 2);

            table
                .apply(
                    Statement::RemoveByName("BUDI santoso".to_string()),
                    TransactionId(3),
                )
                .expect("remove should succeed");

            assert_eq!(table.list(), vec![siti]);
        }

        #[test]
        fn removing_twice_is_an_error() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            table
                .apply(Statement::Remove(contact.id.clone()), TransactionId(2))
                .expect("remove should succeed");

            let result = table.apply(Statement::Remove(contact.id.clone()), TransactionId(3));

            assert_eq!(result, Err(ApplyErrors::CannotDeleteDoesNotExist(contact.id)));
        }

        #[test]
        fn get_after_remove_is_none() {
            let mut table = ContactTable::new();

            let contact = add_contact(&mut table, "Budi Santoso", 1);

            table
                .apply(Statement::Remove(contact.id.clone()), TransactionId(2))
                .expect("remove should succeed");

            let result = table
                .apply(Statement::Get(contact.id), TransactionId(2))
                .expect("get should succeed");

            assert_eq!(result, StatementResult::GetSingle(None));
        }
    }

    #[test]
    fn list_is_ordered_by_creation() {
        let mut table = ContactTable::new();

        let first = add_contact(&mut table, "Zaki", 1);
        let second = add_contact(&mut table, "Ani", 2);
        let third = add_contact(&mut table, "Mira", 3);

        assert_eq!(table.list(), vec![first, second, third]);
    }
}
