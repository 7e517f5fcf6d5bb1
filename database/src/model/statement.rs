use serde::{Deserialize, Serialize};

use crate::{consts::consts::EntityId, database::table::row::UpdateContactData};

use super::contact::Contact;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Statement {
    Add(Contact),
    Update(EntityId, UpdateContactData),
    Remove(EntityId),
    /// Name lookups are case-insensitive
    RemoveByName(String),
    Get(EntityId),
    GetByName(String),
    /// Returns every contact, ordered by creation
    List,
}

impl Statement {
    pub fn is_query(&self) -> bool {
        !self.is_mutation()
    }

    pub fn is_mutation(&self) -> bool {
        match self {
            Statement::Add(_)
            | Statement::Update(_, _)
            | Statement::Remove(_)
            | Statement::RemoveByName(_) => true,
            Statement::Get(_) | Statement::GetByName(_) | Statement::List => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum StatementResult {
    /// Used for database status messages
    SuccessStatus(String),
    Single(Contact),
    GetSingle(Option<Contact>),
    List(Vec<Contact>),
}

impl StatementResult {
    pub fn single(self) -> Option<Contact> {
        match self {
            StatementResult::Single(c) => Some(c),
            _ => None,
        }
    }

    pub fn get_single(self) -> Option<Option<Contact>> {
        match self {
            StatementResult::GetSingle(c) => Some(c),
            _ => None,
        }
    }

    pub fn list(self) -> Option<Vec<Contact>> {
        match self {
            StatementResult::List(l) => Some(l),
            _ => None,
        }
    }
}
