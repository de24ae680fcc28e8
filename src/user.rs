//! Code for creating the user table and reading and writing user accounts.
//!
//! Registering users and checking passwords happen elsewhere; this module only
//! deals with the money side of a user: their balance, total savings and
//! saving streak.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, streak::SavingStreak};

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

/// A user of the application and the state of their account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name shown to other users, e.g. on community goals.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The money available to the user. May be negative.
    pub balance: f64,
    /// The total amount the user has contributed to goals.
    pub total_saved: f64,
    /// The user's saving streak.
    #[serde(flatten)]
    pub streak: SavingStreak,
}

/// The public identity of a user, used when one user's records are shown to others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
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
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                balance REAL NOT NULL DEFAULT 0,
                total_saved REAL NOT NULL DEFAULT 0,
                saving_streak INTEGER NOT NULL DEFAULT 0,
                last_saving_date TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database with a starting `balance`.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred, e.g. the
/// email is already taken.
pub fn create_user(
    name: &str,
    email: &str,
    balance: f64,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(
            "INSERT INTO user (name, email, balance) VALUES (?1, ?2, ?3)
             RETURNING id, name, email, balance, total_saved, saving_streak, last_saving_date",
        )?
        .query_row((name, email, balance), map_row_to_user)
        .map_err(Error::from)
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user ([Error::UserNotFound]).
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, name, email, balance, total_saved, saving_streak, last_saving_date
             FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })
}

/// Write the balance, total saved and streak of `user` back to the database.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if the user no longer exists, or an SQL error.
pub fn save_account(user: &User, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user
        SET \
            balance = ?1, \
            total_saved = ?2, \
            saving_streak = ?3, \
            last_saving_date = ?4 \
        WHERE id = ?5",
        (
            user.balance,
            user.total_saved,
            user.streak.count,
            user.streak.last_saving_date,
            user.id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let last_saving_date: Option<OffsetDateTime> = row.get(6)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        balance: row.get(3)?,
        total_saved: row.get(4)?,
        streak: SavingStreak {
            count: row.get(5)?,
            last_saving_date,
        },
    })
}
