//! Incomes and expenses and their database queries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    ledger::{CategoryId, CategoryName, RecordKind},
};

/// Database identifier for an income or expense.
pub type RecordId = i64;

/// An income or expense as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    /// A short description of what the money was for.
    pub name: String,
    pub category_id: CategoryId,
    /// The name of the category the record is filed under.
    pub category_name: CategoryName,
    /// Always greater than zero, the kind decides the direction the money moved.
    pub amount: f64,
    pub date: Date,
    pub note: Option<String>,
}

/// The validated values for creating or changing an income or expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub category_id: CategoryId,
    pub amount: f64,
    pub date: Date,
    pub note: Option<String>,
}

impl NewRecord {
    /// Validate the values for a record.
    ///
    /// The name and note are trimmed, and a blank note is treated as no note.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyName] if `name` is blank, or [Error::InvalidAmount]
    /// if `amount` is not a finite number greater than zero.
    pub fn new(
        name: &str,
        category_id: CategoryId,
        amount: f64,
        date: Date,
        note: Option<&str>,
    ) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName("Name"));
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        let note = note
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name: name.to_owned(),
            category_id,
            amount,
            date,
            note,
        })
    }
}

/// Create the income and expense tables.
///
/// Records refer to a category of the same kind, and a category cannot be
/// deleted while records refer to it.
pub fn create_record_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in RecordKind::ALL {
        let table = kind.record_table();
        let category_table = kind.category_table();

        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES {category_table}(id) ON UPDATE CASCADE ON DELETE RESTRICT
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, date);"
        ))?;
    }

    Ok(())
}

pub(super) fn insert_record(
    kind: RecordKind,
    user_id: UserID,
    record: &NewRecord,
    connection: &Connection,
) -> Result<RecordId, Error> {
    connection
        .execute(
            &format!(
                "INSERT INTO {} (user_id, name, category_id, amount, date, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                kind.record_table()
            ),
            (
                user_id.as_i64(),
                &record.name,
                record.category_id,
                record.amount,
                record.date,
                &record.note,
            ),
        )
        .map_err(map_foreign_key_error)?;

    Ok(connection.last_insert_rowid())
}

/// Get one of a user's records.
///
/// # Errors
///
/// Returns [Error::NotFound] if the record does not exist or belongs to someone else.
pub(super) fn get_record(
    kind: RecordKind,
    user_id: UserID,
    record_id: RecordId,
    connection: &Connection,
) -> Result<Record, Error> {
    connection
        .prepare(&format!(
            "{} WHERE r.id = ?1 AND r.user_id = ?2",
            select_records(kind)
        ))?
        .query_row((record_id, user_id.as_i64()), |row| map_row(kind, row))
        .map_err(|error| error.into())
}

/// Get a user's records dated on or after `since`, or all of them if `since` is `None`.
///
/// Records are ordered by date, oldest first, then by ID.
pub(super) fn get_records(
    kind: RecordKind,
    user_id: UserID,
    since: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    let order = "ORDER BY r.date ASC, r.id ASC";
    let select = select_records(kind);

    match since {
        Some(since) => connection
            .prepare(&format!(
                "{select} WHERE r.user_id = ?1 AND r.date >= ?2 {order}"
            ))?
            .query_map((user_id.as_i64(), since), |row| map_row(kind, row))?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect(),
        None => connection
            .prepare(&format!("{select} WHERE r.user_id = ?1 {order}"))?
            .query_map([user_id.as_i64()], |row| map_row(kind, row))?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect(),
    }
}

/// Replace the values of one of a user's records.
///
/// # Errors
///
/// Returns [Error::NotFound] if the record does not exist or belongs to someone else.
pub(super) fn update_record(
    kind: RecordKind,
    user_id: UserID,
    record_id: RecordId,
    record: &NewRecord,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            &format!(
                "UPDATE {} SET name = ?1, category_id = ?2, amount = ?3, date = ?4, note = ?5
                 WHERE id = ?6 AND user_id = ?7",
                kind.record_table()
            ),
            (
                &record.name,
                record.category_id,
                record.amount,
                record.date,
                &record.note,
                record_id,
                user_id.as_i64(),
            ),
        )
        .map_err(map_foreign_key_error)?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete one of a user's records and return its amount.
///
/// # Errors
///
/// Returns [Error::NotFound] if the record does not exist or belongs to someone else.
pub(super) fn delete_record(
    kind: RecordKind,
    user_id: UserID,
    record_id: RecordId,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(&format!(
            "DELETE FROM {} WHERE id = ?1 AND user_id = ?2 RETURNING amount",
            kind.record_table()
        ))?
        .query_row((record_id, user_id.as_i64()), |row| row.get(0))
        .map_err(|error| error.into())
}

/// Sum a user's amounts per day for the dates in `from..=to`.
///
/// Days without records are left out.
pub(super) fn get_daily_totals(
    kind: RecordKind,
    user_id: UserID,
    from: Date,
    to: Date,
    connection: &Connection,
) -> Result<Vec<(Date, f64)>, Error> {
    connection
        .prepare(&format!(
            "SELECT date, SUM(amount) FROM {}
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             GROUP BY date
             ORDER BY date ASC",
            kind.record_table()
        ))?
        .query_map((user_id.as_i64(), from, to), |row| {
            Ok((row.get::<_, Date>(0)?, row.get::<_, f64>(1)?))
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

fn select_records(kind: RecordKind) -> String {
    format!(
        "SELECT r.id, r.name, r.category_id, c.name, r.amount, r.date, r.note
         FROM {} r
         INNER JOIN {} c ON c.id = r.category_id",
        kind.record_table(),
        kind.category_table()
    )
}

fn map_foreign_key_error(error: rusqlite::Error) -> Error {
    match error {
        // The category was checked up front, so this only happens if it was deleted since.
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::NotFound,
        error => error.into(),
    }
}

fn map_row(kind: RecordKind, row: &Row) -> Result<Record, rusqlite::Error> {
    let raw_category_name: String = row.get(3)?;

    Ok(Record {
        id: row.get(0)?,
        kind,
        name: row.get(1)?,
        category_id: row.get(2)?,
        category_name: CategoryName::new_unchecked(&raw_category_name),
        amount: row.get(4)?,
        date: row.get(5)?,
        note: row.get(6)?,
    })
}
