use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};

use crate::{
    consts::consts::EntityId,
    database::table::row::{UpdateContactData, UpdateStatement},
    model::contact::{name_key, Contact},
};

use super::{ContactStore, StoreError, StoreResult};

/// On-disk shape of one contact, existing `contacts.json` files use these keys
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct ContactRecord {
    #[serde(rename = "nama")]
    name: String,
    #[serde(rename = "noHP")]
    number: String,
    email: String,
}

impl ContactRecord {
    fn to_contact(&self) -> Contact {
        Contact {
            // No stored id, the name is the key
            id: EntityId(self.name.clone()),
            name: self.name.clone(),
            number: self.number.clone(),
            email: self.email.clone(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }
}

fn get_contacts_file_location(data_directory: &Path) -> PathBuf {
    data_directory.join("contacts.json")
}

/// Contact store backed by a single JSON array. The file is read once into memory; every write
/// rewrites the whole file while holding the write lock, so writers never lose each other's
/// changes.
pub struct JsonFileStore {
    file_path: PathBuf,
    contacts: RwLock<Vec<ContactRecord>>,
}

impl JsonFileStore {
    pub fn open(data_directory: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_directory)?;

        let file_path = get_contacts_file_location(data_directory);

        if !file_path.exists() {
            fs::write(&file_path, "[]")?;
        }

        let contacts: Vec<ContactRecord> = serde_json::from_str(&fs::read_to_string(&file_path)?)?;

        log::info!(
            "📀 Loaded {} contacts from [{}]",
            contacts.len(),
            file_path.display()
        );

        Ok(Self {
            file_path,
            contacts: RwLock::new(contacts),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&[ContactRecord]) -> T) -> StoreResult<T> {
        let contacts = self.contacts.read().map_err(|_| StoreError::LockPoisoned)?;

        Ok(f(contacts.as_slice()))
    }

    /// Applies `f` to a copy of the contacts; the copy replaces the mirror only once it is on disk
    fn write<T>(
        &self,
        f: impl FnOnce(&mut Vec<ContactRecord>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut contacts = self
            .contacts
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let mut updated = contacts.clone();
        let result = f(&mut updated)?;

        fs::write(&self.file_path, serde_json::to_string(&updated)?)?;
        *contacts = updated;

        Ok(result)
    }
}

fn required(field_name: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::MissingField(field_name.to_string()));
    }

    Ok(())
}

fn apply_update(statement: &UpdateStatement, field: &mut String, field_name: &str) -> StoreResult<()> {
    statement
        .apply_to(field, field_name)
        .map_err(|_| StoreError::MissingField(field_name.to_string()))
}

impl ContactStore for JsonFileStore {
    fn list_all(&self) -> StoreResult<Vec<Contact>> {
        self.read(|contacts| contacts.iter().map(ContactRecord::to_contact).collect())
    }

    fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>> {
        self.find_by_name(id.as_str())
    }

    fn find_by_name(&self, name: &str) -> StoreResult<Option<Contact>> {
        self.read(|contacts| {
            contacts
                .iter()
                .find(|record| record.matches(name))
                .map(ContactRecord::to_contact)
        })
    }

    fn insert(&self, contact: Contact) -> StoreResult<Contact> {
        required("Name", &contact.name)?;
        required("Number", &contact.number)?;
        required("Email", &contact.email)?;

        let record = ContactRecord {
            name: contact.name,
            number: contact.number,
            email: contact.email,
        };

        self.write(|contacts| {
            if contacts.iter().any(|existing| existing.matches(&record.name)) {
                return Err(StoreError::DuplicateName(record.name.clone()));
            }

            let stored = record.to_contact();
            contacts.push(record);

            Ok(stored)
        })
    }

    fn update(&self, id: &EntityId, update: UpdateContactData) -> StoreResult<Option<Contact>> {
        if self.find_by_id(id)?.is_none() {
            return Ok(None);
        }

        self.write(|contacts| {
            let Some(index) = contacts.iter().position(|record| record.matches(id.as_str())) else {
                // Removed between the check and the write lock
                return Ok(None);
            };

            let mut record = contacts[index].clone();

            apply_update(&update.name, &mut record.name, "Name")?;
            apply_update(&update.number, &mut record.number, "Number")?;
            apply_update(&update.email, &mut record.email, "Email")?;

            let clashes = contacts
                .iter()
                .enumerate()
                .any(|(other, existing)| other != index && existing.matches(&record.name));

            if clashes {
                return Err(StoreError::DuplicateName(record.name));
            }

            let updated = record.to_contact();
            contacts[index] = record;

            Ok(Some(updated))
        })
    }

    fn delete_by_id(&self, id: &EntityId) -> StoreResult<Option<Contact>> {
        self.delete_by_name(id.as_str())
    }

    fn delete_by_name(&self, name: &str) -> StoreResult<Option<Contact>> {
        // Skip the rewrite when there is nothing to remove
        if self.find_by_name(name)?.is_none() {
            return Ok(None);
        }

        self.write(|contacts| {
            let removed = contacts
                .iter()
                .find(|record| record.matches(name))
                .map(ContactRecord::to_contact);

            contacts.retain(|record| !record.matches(name));

            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreOptions;

    #[test]
    fn creates_directory_and_empty_array() {
        let options = StoreOptions::new_temporary();

        let store = JsonFileStore::open(&options.data_directory).expect("should open");

        let file_path = get_contacts_file_location(&options.data_directory);
        assert_eq!(fs::read_to_string(file_path).expect("should exist"), "[]");
        assert!(store.list_all().expect("should list").is_empty());
    }

    #[test]
    fn writes_records_with_file_keys() {
        let options = StoreOptions::new_temporary();
        let store = JsonFileStore::open(&options.data_directory).expect("should open");

        store.insert(Contact::new_test()).expect("should insert");

        let raw = fs::read_to_string(get_contacts_file_location(&options.data_directory))
            .expect("should exist");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("should be json");

        assert_eq!(
            json,
            serde_json::json!([{
                "nama": "Budi Santoso",
                "noHP": "081234567890",
                "email": "budi@example.com"
            }])
        );
    }

    #[test]
    fn reads_existing_file_in_insertion_order() {
        let options = StoreOptions::new_temporary();

        fs::create_dir_all(&options.data_directory).expect("should create dir");
        fs::write(
            get_contacts_file_location(&options.data_directory),
            r#"[{"nama":"Zaki","noHP":"081234567890","email":"z@example.com"},
                {"nama":"Ani","noHP":"081298765432","email":"a@example.com"}]"#,
        )
        .expect("should write");

        let store = JsonFileStore::open(&options.data_directory).expect("should open");

        let names: Vec<String> = store
            .list_all()
            .expect("should list")
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Zaki".to_string(), "Ani".to_string()]);
        assert_eq!(
            store.find_by_id(&EntityId::from("ani")).expect("should find").map(|c| c.id),
            Some(EntityId::from("Ani"))
        );
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let options = StoreOptions::new_temporary();

        fs::create_dir_all(&options.data_directory).expect("should create dir");
        fs::write(get_contacts_file_location(&options.data_directory), "{").expect("should write");

        assert!(matches!(
            JsonFileStore::open(&options.data_directory),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn renaming_changes_the_id() {
        let options = StoreOptions::new_temporary();
        let store = JsonFileStore::open(&options.data_directory).expect("should open");

        let stored = store.insert(Contact::new_test()).expect("should insert");

        let updated = store
            .update(
                &stored.id,
                UpdateContactData::replace_all(
                    "Budi S".to_string(),
                    stored.number.clone(),
                    stored.email.clone(),
                ),
            )
            .expect("should update")
            .expect("should exist");

        assert_eq!(updated.id, EntityId::from("Budi S"));
        assert_eq!(store.find_by_id(&stored.id).expect("should query"), None);
    }
}
