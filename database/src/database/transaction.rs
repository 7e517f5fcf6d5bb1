use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, prelude::*};
use std::path::{Path, PathBuf};

use crate::consts::consts::TransactionId;
use crate::model::statement::Statement;
use crate::store::{StoreError, StoreResult};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub enum TransactionStatus {
    Committed,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Transaction {
    pub id: TransactionId,
    pub statements: Vec<Statement>,
    pub status: TransactionStatus,
}

#[derive(Debug)]
pub struct TransactionWAL {
    log_file: File,
    current_transaction_id: TransactionId,
}

pub fn get_transaction_log_location(data_directory: &Path) -> PathBuf {
    // Defaults to $CWD/data/transaction_log.json, but $CWD/data can be overridden via the CLI
    data_directory.join("transaction_log.json")
}

impl TransactionWAL {
    pub fn new(data_directory: &Path) -> io::Result<Self> {
        fs::create_dir_all(data_directory)?;

        let log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(get_transaction_log_location(data_directory))?;

        Ok(Self {
            log_file,
            current_transaction_id: TransactionId::new_first_transaction(),
        })
    }

    /// Log whose writes always fail, for exercising the crash path
    #[cfg(test)]
    pub fn new_read_only(data_directory: &Path) -> io::Result<Self> {
        fs::create_dir_all(data_directory)?;
        fs::write(get_transaction_log_location(data_directory), "")?;

        let log_file = OpenOptions::new()
            .read(true)
            .open(get_transaction_log_location(data_directory))?;

        Ok(Self {
            log_file,
            current_transaction_id: TransactionId::new_first_transaction(),
        })
    }

    pub fn get_current_transaction_id(&self) -> &TransactionId {
        &self.current_transaction_id
    }

    /// Appends the statement as one JSON line, queries are never written
    pub fn commit(
        &mut self,
        applied_transaction_id: TransactionId,
        statement: Statement,
    ) -> StoreResult<()> {
        if statement.is_mutation() {
            let transaction_json_line = format!(
                "{}\n",
                serde_json::to_string(&Transaction {
                    id: applied_transaction_id.clone(),
                    statements: vec![statement],
                    status: TransactionStatus::Committed,
                })?
            );

            self.log_file
                .write_all(transaction_json_line.as_bytes())
                .map_err(StoreError::Io)?;

            // Buffered OS write, is not 'durable' without the fsync
            self.log_file.sync_data().map_err(StoreError::Io)?;
        }

        self.current_transaction_id = applied_transaction_id;

        Ok(())
    }

    /// Reads every committed transaction, a missing log means an empty database
    pub fn restore(data_directory: &Path) -> StoreResult<Vec<Transaction>> {
        let mut file = match File::open(get_transaction_log_location(data_directory)) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let mut contents = String::new();

        file.read_to_string(&mut contents)?;

        let mut transactions: Vec<Transaction> = vec![];

        for transaction_string in contents.lines() {
            if transaction_string.trim().is_empty() {
                continue;
            }

            transactions.push(serde_json::from_str(transaction_string)?);
        }

        Ok(transactions)
    }

    pub fn set_current_transaction_id(&mut self, transaction_id: TransactionId) {
        self.current_transaction_id = transaction_id;
    }
}
