use contactdb::model::contact::Contact;
use serde::Deserialize;

/// Fields shared by the add and edit forms. Missing fields deserialize as empty strings so they
/// are reported by validation instead of rejected by the extractor.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    #[serde(rename = "fName", default)]
    pub first_name: String,
    #[serde(rename = "lName", default)]
    pub last_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub email: String,
}

impl ContactForm {
    /// Pre-fills the edit form, the first word is the first name
    pub fn from_contact(contact: &Contact) -> Self {
        let (first_name, last_name) = split_name(&contact.name);

        Self {
            first_name,
            last_name,
            number: contact.number.clone(),
            email: contact.email.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim_end())
            .trim()
            .to_string()
    }

    pub fn to_contact(&self) -> Contact {
        Contact::new(
            self.full_name(),
            self.number.trim().to_string(),
            self.email.trim().to_string(),
        )
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UpdateContactForm {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "oldName", default)]
    pub old_name: String,
    #[serde(rename = "fName", default)]
    pub first_name: String,
    #[serde(rename = "lName", default)]
    pub last_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub email: String,
}

impl UpdateContactForm {
    /// The record being edited, by id when the form carries one
    pub fn key(&self) -> &str {
        if self.id.trim().is_empty() {
            self.old_name.trim()
        } else {
            self.id.trim()
        }
    }

    pub fn contact_form(&self) -> ContactForm {
        ContactForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            number: self.number.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DeleteContactForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl DeleteContactForm {
    pub fn key(&self) -> &str {
        if self.id.trim().is_empty() {
            self.name.trim()
        } else {
            self.id.trim()
        }
    }
}

/// Splits at the first space only, so `full_name` gives the stored name back unchanged
fn split_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.to_string()),
        None => (name.to_string(), String::new()),
    }
}
