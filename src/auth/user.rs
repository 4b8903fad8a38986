//! Code for creating the user table and fetching users from the database.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// The details a user can change about themselves, checked for validity.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
}

impl UserDetails {
    /// Validate the raw form values for a user.
    ///
    /// Names are trimmed and the email address is trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyName] if either name is blank, or
    /// [Error::InvalidEmail] if `email` is not an email address.
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Result<Self, Error> {
        Ok(Self {
            email: parse_email(email)?,
            first_name: required_text("First name", first_name)?,
            last_name: required_text("Last name", last_name)?,
        })
    }
}

/// Parse an email address, ignoring surrounding whitespace and case.
pub fn parse_email(raw_email: &str) -> Result<EmailAddress, Error> {
    EmailAddress::from_str(&raw_email.trim().to_lowercase())
        .map_err(|_| Error::InvalidEmail(raw_email.to_owned()))
}

fn required_text(field: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::EmptyName(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::DuplicateEmail] if the email is taken, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    details: UserDetails,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, first_name, last_name, password) VALUES (?1, ?2, ?3, ?4)",
        (
            details.email.as_str(),
            &details.first_name,
            &details.last_name,
            password_hash.as_ref(),
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email: details.email,
        first_name: details.first_name,
        last_name: details.last_name,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, email, first_name, last_name, password FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user that logs in with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if nobody has signed up with `email`.
pub fn get_user_by_email(email: &EmailAddress, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, email, first_name, last_name, password FROM user WHERE email = :email",
        )?
        .query_row(&[(":email", email.as_str())], map_row)
        .map_err(|error| error.into())
}

/// Replace the name and email of a user.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist, or
/// [Error::DuplicateEmail] if another user has the new email.
pub fn update_user_details(
    user_id: UserID,
    details: &UserDetails,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET email = ?1, first_name = ?2, last_name = ?3 WHERE id = ?4",
        (
            details.email.as_str(),
            &details.first_name,
            &details.last_name,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Replace the password hash of a user.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(4)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: EmailAddress::new_unchecked(raw_email),
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
