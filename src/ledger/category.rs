//! Income and expense categories, each owned by a single user.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, ledger::RecordKind};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from a string with the surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A label a user files their incomes or expenses under, e.g. "Salary" or "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

/// The sum of the amounts filed under one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: CategoryName,
    pub total: f64,
}

/// Create the income and expense category tables.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    for kind in RecordKind::ALL {
        let table = kind.category_table();

        connection.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                UNIQUE(user_id, name),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id);"
        ))?;
    }

    Ok(())
}

/// Create a category for `user_id`.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if the user already has a category
/// of the same kind called `name`.
pub(super) fn insert_category(
    kind: RecordKind,
    user_id: UserID,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        &format!(
            "INSERT INTO {} (user_id, name) VALUES (?1, ?2)",
            kind.category_table()
        ),
        (user_id.as_i64(), name.as_ref()),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name,
    })
}

/// Get a category by ID, as long as it belongs to `user_id`.
pub(super) fn get_category(
    kind: RecordKind,
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} WHERE id = ?1 AND user_id = ?2",
            kind.category_table()
        ))?
        .query_row((category_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Get all of a user's categories of one kind, ordered by name.
pub(super) fn get_categories(
    kind: RecordKind,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} WHERE user_id = ?1 ORDER BY name ASC, id ASC",
            kind.category_table()
        ))?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether any of the user's records are filed under the category.
pub(super) fn is_category_in_use(
    kind: RecordKind,
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE category_id = ?1 AND user_id = ?2)",
                kind.record_table()
            ),
            (category_id, user_id.as_i64()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete one of a user's categories.
///
/// Callers check [is_category_in_use] first, the foreign key only backs it up.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or belongs to
/// someone else.
pub(super) fn delete_category(
    kind: RecordKind,
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!(
            "DELETE FROM {} WHERE id = ?1 AND user_id = ?2",
            kind.category_table()
        ),
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Sum the amounts of a user's records per category.
///
/// Every category of `kind` the user has is included, with a total of zero
/// if nothing has been filed under it yet.
pub(super) fn get_category_totals(
    kind: RecordKind,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(&format!(
            "SELECT c.name, COALESCE(SUM(r.amount), 0)
             FROM {category_table} c
             LEFT JOIN {record_table} r ON r.category_id = c.id AND r.user_id = c.user_id
             WHERE c.user_id = ?1
             GROUP BY c.id
             ORDER BY c.name ASC, c.id ASC",
            category_table = kind.category_table(),
            record_table = kind.record_table(),
        ))?
        .query_map([user_id.as_i64()], |row| {
            let raw_name: String = row.get(0)?;

            Ok(CategoryTotal {
                name: CategoryName::new_unchecked(&raw_name),
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
    })
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(
            CategoryName::new("  Groceries "),
            Ok(CategoryName::new_unchecked("Groceries"))
        );
    }
}
