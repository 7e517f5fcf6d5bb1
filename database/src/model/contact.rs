use serde::{Deserialize, Serialize};

use crate::consts::consts::EntityId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub name: String,
    pub number: String,
    pub email: String,
}

impl Contact {
    pub fn new(name: String, number: String, email: String) -> Self {
        Contact {
            id: EntityId::new(),
            name,
            number,
            email,
        }
    }

    pub fn new_test() -> Self {
        Contact {
            id: EntityId("1".to_string()),
            name: "Budi Santoso".to_string(),
            number: "081234567890".to_string(),
            email: "budi@example.com".to_string(),
        }
    }

    /// Key used for every name comparison, both stores treat names case-insensitively
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_ignores_case_and_surrounding_whitespace() {
        assert_eq!(name_key("  Budi SANTOSO "), "budi santoso");
        assert_eq!(Contact::new_test().name_key(), "budi santoso");
    }

    #[test]
    fn new_contacts_get_distinct_ids() {
        let a = Contact::new("A".to_string(), "1".to_string(), "a@b.c".to_string());
        let b = Contact::new("A".to_string(), "1".to_string(), "a@b.c".to_string());

        assert_ne!(a.id, b.id);
    }
}
