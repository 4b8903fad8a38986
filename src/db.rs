//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    auth::create_user_table,
    balance::create_account_table,
    ledger::{create_category_tables, create_record_tables},
};

/// Create all the tables for the application's domain models.
///
/// Foreign key enforcement is switched on for `connection`, since removing a
/// category that is still used by a record relies on it.
///
/// # Errors
///
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must run first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_category_tables(&transaction)?;
    create_record_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}
