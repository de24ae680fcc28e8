//! Defines the income model, its request body and the shared database queries.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::IncomeCategory,
    database_id::DatabaseId,
    user::UserID,
    validation::{FieldError, FieldRules, Validate, optional_text},
};

/// Database identifier for an income entry.
pub type IncomeId = DatabaseId;

/// The state needed by the income endpoints.
#[derive(Debug, Clone)]
pub struct IncomeState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Money the user earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    /// The ID of the income entry.
    pub id: IncomeId,
    /// The user who earned the money.
    pub user_id: UserID,
    /// A short name for the income, e.g. "March salary".
    pub title: String,
    /// How much was earned. Never negative.
    pub amount: f64,
    /// Where the money came from.
    pub category: IncomeCategory,
    /// Optional notes.
    pub description: Option<String>,
    /// When the money was earned.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the entry was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated income entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub title: String,
    pub amount: f64,
    pub category: IncomeCategory,
    pub description: Option<String>,
    /// Defaults to the time of the request when not given.
    pub date: Option<OffsetDateTime>,
}

/// The request body for creating or editing income.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeForm {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl Validate for IncomeForm {
    type Output = NewIncome;

    fn validate(self) -> Result<NewIncome, Vec<FieldError>> {
        let mut rules = FieldRules::default();
        let title = rules.non_empty("title", self.title, "Title is required");
        let amount = rules.at_least("amount", self.amount, 0.0, "Amount must be a positive number");
        let category = rules.category("category", self.category);

        match (title, amount, category) {
            (Some(title), Some(amount), Some(category)) => Ok(NewIncome {
                title,
                amount,
                category,
                description: optional_text(self.description),
                date: self.date,
            }),
            _ => Err(rules.into_errors()),
        }
    }
}

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            category TEXT NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_income_user_created ON income(user_id, created_at);",
    )?;

    Ok(())
}

pub(super) const INCOME_COLUMNS: &str =
    "id, user_id, title, amount, category, description, date, created_at";

pub(super) fn map_row_to_income(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Retrieve a single income entry by ID.
///
/// # Errors
/// Returns [Error::IncomeNotFound] if there is no income with `id`.
pub fn get_income(id: IncomeId, connection: &Connection) -> Result<Income, Error> {
    connection
        .prepare(&format!("SELECT {INCOME_COLUMNS} FROM income WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_income)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::IncomeNotFound,
            error => error,
        })
}
