use std::time::Duration;
use thiserror::Error;

use crate::{
    consts::consts::EntityId,
    model::{
        contact::Contact,
        statement::{Statement, StatementResult},
    },
};

use super::table::{row::UpdateContactData, table::ApplyErrors};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum DatabaseRequestAction {
    Request(Statement),
    Shutdown,
}

impl DatabaseRequestAction {
    /// Prints complex logs in a more readable format
    pub fn log_format(&self) -> String {
        match self {
            DatabaseRequestAction::Request(statement) => format!("{:?}", statement),
            DatabaseRequestAction::Shutdown => "Shutdown".to_string(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum DatabaseResponseAction {
    Response(StatementResult),
    /// The statement broke a table constraint and was not applied
    Rejected(ApplyErrors),
    /// The statement was applied in memory but could not be logged, the database has stopped
    StorageFailure(String),
}

pub struct DatabaseRequest {
    pub response_sender: oneshot::Sender<DatabaseResponseAction>,
    pub action: DatabaseRequestAction,
}

#[derive(Error, Debug)]
pub enum RequestManagerError {
    #[error("Database took too long to respond to request")]
    DatabaseTimeout,
    #[error("Database is not running")]
    DatabaseUnavailable,
    #[error("Statement rejected: {0}")]
    Rejected(ApplyErrors),
    #[error("Database storage failure: {0}")]
    StorageFailure(String),
    #[error("Database responded with an unexpected result: {0:?}")]
    UnexpectedResult(StatementResult),
}

/// Typed client for the database thread. Every call is a single statement, answered on its
/// own oneshot channel.
#[derive(Clone)]
pub struct RequestManager {
    database_sender: flume::Sender<DatabaseRequest>,
}

impl RequestManager {
    pub fn new(database_sender: flume::Sender<DatabaseRequest>) -> Self {
        Self { database_sender }
    }

    pub fn send_add(&self, contact: Contact) -> Result<Contact, RequestManagerError> {
        let result = self.send_statement(Statement::Add(contact))?;
        result
            .clone()
            .single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_update(
        &self,
        id: EntityId,
        contact_update: UpdateContactData,
    ) -> Result<Contact, RequestManagerError> {
        let result = self.send_statement(Statement::Update(id, contact_update))?;
        result
            .clone()
            .single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_remove(&self, id: EntityId) -> Result<Contact, RequestManagerError> {
        let result = self.send_statement(Statement::Remove(id))?;
        result
            .clone()
            .single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_remove_by_name(&self, name: String) -> Result<Contact, RequestManagerError> {
        let result = self.send_statement(Statement::RemoveByName(name))?;
        result
            .clone()
            .single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_get(&self, id: EntityId) -> Result<Option<Contact>, RequestManagerError> {
        let result = self.send_statement(Statement::Get(id))?;
        result
            .clone()
            .get_single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_get_by_name(&self, name: String) -> Result<Option<Contact>, RequestManagerError> {
        let result = self.send_statement(Statement::GetByName(name))?;
        result
            .clone()
            .get_single()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    pub fn send_list(&self) -> Result<Vec<Contact>, RequestManagerError> {
        let result = self.send_statement(Statement::List)?;
        result
            .clone()
            .list()
            .ok_or(RequestManagerError::UnexpectedResult(result))
    }

    /// Sends a shutdown request to the database and returns the database's response
    pub fn send_shutdown_request(&self) -> Result<String, RequestManagerError> {
        match self.send_database_request(DatabaseRequestAction::Shutdown)? {
            DatabaseResponseAction::Response(StatementResult::SuccessStatus(status)) => Ok(status),
            DatabaseResponseAction::Response(other) => {
                Err(RequestManagerError::UnexpectedResult(other))
            }
            DatabaseResponseAction::Rejected(err) => Err(RequestManagerError::Rejected(err)),
            DatabaseResponseAction::StorageFailure(s) => {
                Err(RequestManagerError::StorageFailure(s))
            }
        }
    }

    /// Sends a single statement to the database and returns a single statement result
    pub fn send_statement(
        &self,
        statement: Statement,
    ) -> Result<StatementResult, RequestManagerError> {
        match self.send_database_request(DatabaseRequestAction::Request(statement))? {
            DatabaseResponseAction::Response(result) => Ok(result),
            DatabaseResponseAction::Rejected(err) => Err(RequestManagerError::Rejected(err)),
            DatabaseResponseAction::StorageFailure(s) => {
                Err(RequestManagerError::StorageFailure(s))
            }
        }
    }

    pub fn send_database_request(
        &self,
        database_request: DatabaseRequestAction,
    ) -> Result<DatabaseResponseAction, RequestManagerError> {
        let (response_sender, response_receiver) = oneshot::channel::<DatabaseResponseAction>();

        let request = DatabaseRequest {
            response_sender,
            action: database_request,
        };

        // Sends the request to the database worker, database will response
        //  on the response_receiver once it's finished processing it's request
        self.database_sender
            .send(request)
            .map_err(|_| RequestManagerError::DatabaseUnavailable)?;

        match response_receiver.recv_timeout(REQUEST_TIMEOUT) {
            Ok(response) => Ok(response),
            Err(oneshot::RecvTimeoutError::Timeout) => Err(RequestManagerError::DatabaseTimeout),
            Err(oneshot::RecvTimeoutError::Disconnected) => {
                Err(RequestManagerError::DatabaseUnavailable)
            }
        }
    }
}
