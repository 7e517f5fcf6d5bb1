use std::{path::Path, thread, time::Instant};

use num_format::{Locale, ToFormattedString};

use crate::{
    database::request_manager::{DatabaseRequestAction, DatabaseResponseAction},
    model::statement::{Statement, StatementResult},
    store::{StoreError, StoreResult},
};

use super::{
    request_manager::{DatabaseRequest, RequestManager},
    table::table::ContactTable,
    transaction::TransactionWAL,
    utils::crash::{crash_database, DatabaseCrash},
};

pub struct Database {
    contact_table: ContactTable,
    transaction_wal: TransactionWAL,
}

impl Database {
    pub fn new(data_directory: &Path) -> StoreResult<Self> {
        log::info!("Transaction Log Location: [{}]", data_directory.display());

        Ok(Self {
            contact_table: ContactTable::new(),
            transaction_wal: TransactionWAL::new(data_directory)?,
        })
    }

    /// Replays the transaction log into the table. Any failure is fatal, the log and the
    /// table would disagree.
    pub fn restore(&mut self, data_directory: &Path) -> StoreResult<usize> {
        let now = Instant::now();

        let restored_transactions = TransactionWAL::restore(data_directory)?;
        let restored_transaction_count = restored_transactions.len();

        for transaction in restored_transactions {
            for statement in transaction.statements {
                self.contact_table
                    .apply(statement, transaction.id.clone())
                    .map_err(|err| {
                        StoreError::Restore(format!("[TX: {}] {}", transaction.id, err))
                    })?;
            }

            self.transaction_wal.set_current_transaction_id(transaction.id);
        }

        log::info!(
            "✅ Successful Restore [Duration: {}ms]",
            now.elapsed().as_millis(),
        );

        log::info!(
            "📀 Data               [TransactionsApplied: {}, CurrentTxId: {}]",
            restored_transaction_count.to_formatted_string(&Locale::en),
            self.transaction_wal
                .get_current_transaction_id()
                .to_number()
                .to_formatted_string(&Locale::en)
        );

        Ok(restored_transaction_count)
    }

    /// Moves the database onto its own thread. All statements are serialised through it.
    pub fn run(self) -> RequestManager {
        let (database_sender, database_receiver) = flume::unbounded::<DatabaseRequest>();

        thread::spawn(move || self.process_requests(database_receiver));

        RequestManager::new(database_sender)
    }

    fn process_requests(mut self, database_receiver: flume::Receiver<DatabaseRequest>) {
        // Ends once every RequestManager has been dropped
        while let Ok(DatabaseRequest {
            action,
            response_sender,
        }) = database_receiver.recv()
        {
            log::debug!("Received request: {}", action.log_format());

            let statement = match action {
                DatabaseRequestAction::Request(statement) => statement,
                DatabaseRequestAction::Shutdown => {
                    let _ = response_sender.send(DatabaseResponseAction::Response(
                        StatementResult::SuccessStatus(
                            "Successfully shutdown database".to_string(),
                        ),
                    ));

                    return;
                }
            };

            let response = self.process_statement(statement);
            let crashed = matches!(response, DatabaseResponseAction::StorageFailure(_));

            // The caller may have timed out and dropped the receiver
            let _ = response_sender.send(response);

            if crashed {
                return;
            }
        }
    }

    pub fn process_statement(&mut self, statement: Statement) -> DatabaseResponseAction {
        let applying_transaction_id = self
            .transaction_wal
            .get_current_transaction_id()
            .increment();

        let is_mutation = statement.is_mutation();

        let statement_result = match self
            .contact_table
            .apply(statement.clone(), applying_transaction_id.clone())
        {
            Ok(statement_result) => statement_result,
            Err(err) => {
                log::info!("⚠️  Rejected: [TX: {}] {}", &applying_transaction_id, err);

                return DatabaseResponseAction::Rejected(err);
            }
        };

        // Queries do not consume a transaction id
        if !is_mutation {
            return DatabaseResponseAction::Response(statement_result);
        }

        if let Err(err) = self
            .transaction_wal
            .commit(applying_transaction_id.clone(), statement)
        {
            let reason = crash_database(
                &DatabaseCrash::InconsistentUncommittedInMemoryWorldStateFromWALWrite(err),
            );

            return DatabaseResponseAction::StorageFailure(reason);
        }

        log::info!("✅ Committed: [TX: {}]", &applying_transaction_id);

        DatabaseResponseAction::Response(statement_result)
    }
}
