//! The account that holds a user's balance.
//!
//! The balance is never recomputed from the records. Instead, every change to
//! an income or expense adds a signed delta to the balance in the same
//! transaction as the change itself.

use rusqlite::{Connection, Row};

use crate::{Error, auth::UserID, ledger::RecordKind};

/// The single account each user has.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub user_id: UserID,
    pub name: String,
    pub details: String,
    /// The sum of the user's incomes minus the sum of their expenses.
    pub balance: f64,
}

/// How a record changed, used to work out how the balance should change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceChange {
    Created(f64),
    Edited { old: f64, new: f64 },
    Deleted(f64),
}

impl BalanceChange {
    /// The amount to add to the balance when a record of `kind` changes.
    pub fn delta(self, kind: RecordKind) -> f64 {
        let amount = match self {
            BalanceChange::Created(amount) => amount,
            BalanceChange::Edited { old, new } => new - old,
            BalanceChange::Deleted(amount) => -amount,
        };

        kind.signed(amount)
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            details TEXT NOT NULL,
            balance REAL NOT NULL DEFAULT 0,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Create the account for a newly signed up user with a balance of zero.
///
/// Should be called in the same transaction that creates the user.
pub fn create_account(
    user_id: UserID,
    first_name: &str,
    connection: &Connection,
) -> Result<Account, Error> {
    let name = format!("Account for {user_id}-{first_name}");
    let details = format!("Primary account for User={user_id}");

    connection.execute(
        "INSERT INTO account (user_id, name, details, balance) VALUES (?1, ?2, ?3, 0)",
        (user_id.as_i64(), &name, &details),
    )?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        name,
        details,
        balance: 0.0,
    })
}

/// Get the account of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no account.
pub fn get_account(user_id: UserID, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, user_id, name, details, balance FROM account WHERE user_id = :user_id")?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the balance of the account of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no account.
pub fn get_balance(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT balance FROM account WHERE user_id = ?1",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Add `delta` to the balance of the account of `user_id`.
///
/// The update is a single statement, so it never reads a stale balance.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no account.
pub fn apply_balance_delta(
    user_id: UserID,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE user_id = ?2",
        (delta, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        details: row.get(3)?,
        balance: row.get(4)?,
    })
}
