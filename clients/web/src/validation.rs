use std::sync::OnceLock;

use contactdb::{
    model::contact::Contact,
    store::{ContactStore, StoreResult},
};
use regex::Regex;

pub const NAME_REQUIRED: &str = "Name is required!";
pub const NAME_ALREADY_USED: &str = "Name is already used!";
pub const EMAIL_NOT_VALID: &str = "Email is not valid!";
pub const NUMBER_NOT_VALID: &str = "Phone Number is not valid!";

const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn duplicate_name() -> Self {
        Self {
            field: "name",
            message: NAME_ALREADY_USED,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();

    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

/// Indonesian mobile numbers: `08`, `628` or `+628`, a known operator prefix, then 5-11 digits
fn mobile_number_regex() -> &'static Regex {
    static MOBILE_NUMBER: OnceLock<Regex> = OnceLock::new();

    MOBILE_NUMBER.get_or_init(|| {
        Regex::new(r"^(\+?62|0)8(1[1-9]|2[1238]|3[1238]|5[1-35-9]|7[78]|9[5-9]|8[1-9])[\d\s]{5,11}$")
            .expect("mobile number pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && email_regex().is_match(email)
}

pub fn is_valid_mobile_number(number: &str) -> bool {
    mobile_number_regex().is_match(number)
}

/// Every failing rule is reported, not just the first. `editing` is the stored record an update
/// targets, keeping its own name is not a clash.
pub fn validate_contact(
    store: &dyn ContactStore,
    contact: &Contact,
    editing: Option<&Contact>,
) -> StoreResult<Vec<FieldError>> {
    let mut errors = vec![];

    if contact.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: NAME_REQUIRED,
        });
    } else if let Some(existing) = store.find_by_name(&contact.name)? {
        let is_same_record = editing.is_some_and(|editing| editing.id == existing.id);

        if !is_same_record {
            errors.push(FieldError::duplicate_name());
        }
    }

    if !is_valid_email(&contact.email) {
        errors.push(FieldError {
            field: "email",
            message: EMAIL_NOT_VALID,
        });
    }

    if !is_valid_mobile_number(&contact.number) {
        errors.push(FieldError {
            field: "number",
            message: NUMBER_NOT_VALID,
        });
    }

    Ok(errors)
}
