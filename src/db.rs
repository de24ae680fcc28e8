//! Database initialisation and the transaction boundary used by handlers.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, community::create_community_goal_tables, expense::create_expense_table,
    goal::create_goal_table, income::create_income_table, user::create_user_table,
};

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, so this should be
/// called on every new connection.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_income_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_community_goal_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Lock the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Run `operation` inside a database transaction.
///
/// The transaction is committed if `operation` returns `Ok` and rolled back
/// otherwise, so the rows touched by a request are either all written or not
/// written at all.
///
/// # Errors
/// Returns the error from `operation`, or an SQL error if the transaction
/// could not be started or committed.
pub fn with_transaction<T>(
    connection: &mut Connection,
    operation: impl FnOnce(&SqlTransaction) -> Result<T, Error>,
) -> Result<T, Error> {
    let transaction = connection.transaction()?;
    let value = operation(&transaction)?;
    transaction.commit()?;

    Ok(value)
}
