//! Defines the expense model, its request body and the shared database queries.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::ExpenseCategory,
    database_id::DatabaseId,
    goal::GoalId,
    user::UserID,
    validation::{FieldError, FieldRules, Validate, optional_text},
};

/// Database identifier for an expense.
pub type ExpenseId = DatabaseId;

/// The state needed by the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Money the user spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserID,
    pub title: String,
    /// How much was spent. Never negative.
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the expense records a contribution to a goal.
    pub is_goal_contribution: bool,
    /// The personal goal the money went to, if any.
    ///
    /// Cleared when the goal is deleted.
    pub goal_id: Option<GoalId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: Option<OffsetDateTime>,
    /// Left unset, a new expense is a plain expense and an edited one keeps its tag.
    pub is_goal_contribution: Option<bool>,
    /// Left unset, an edited expense keeps its goal link.
    pub goal_id: Option<GoalId>,
}

/// The request body for creating or editing an expense.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub is_goal_contribution: Option<bool>,
    pub goal_id: Option<GoalId>,
}

impl Validate for ExpenseForm {
    type Output = NewExpense;

    fn validate(self) -> Result<NewExpense, Vec<FieldError>> {
        let mut rules = FieldRules::default();
        let title = rules.non_empty("title", self.title, "Title is required");
        let amount = rules.at_least("amount", self.amount, 0.0, "Amount must be a positive number");
        let category = rules.category("category", self.category);

        match (title, amount, category) {
            (Some(title), Some(amount), Some(category)) => Ok(NewExpense {
                title,
                amount,
                category,
                description: optional_text(self.description),
                date: self.date,
                is_goal_contribution: self.is_goal_contribution,
                goal_id: self.goal_id,
            }),
            _ => Err(rules.into_errors()),
        }
    }
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            category TEXT NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            is_goal_contribution INTEGER NOT NULL DEFAULT 0,
            goal_id INTEGER,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(goal_id) REFERENCES goal(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_created ON expense(user_id, created_at);",
    )?;

    Ok(())
}

pub(super) const EXPENSE_COLUMNS: &str = "id, user_id, title, amount, category, description, date, \
    is_goal_contribution, goal_id, created_at";

pub(super) fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        is_goal_contribution: row.get(7)?,
        goal_id: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Retrieve a single expense by ID.
///
/// # Errors
/// Returns [Error::ExpenseNotFound] if there is no expense with `id`.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!("SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_expense)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::ExpenseNotFound,
            error => error,
        })
}

/// Check that `goal_id`, if given, refers to a goal owned by `user_id`.
///
/// # Errors
/// Returns [Error::InvalidGoal] if the goal does not exist or belongs to
/// another user.
pub(super) fn check_goal_reference(
    goal_id: Option<GoalId>,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(goal_id) = goal_id else {
        return Ok(());
    };

    let owned = connection
        .query_row(
            "SELECT 1 FROM goal WHERE id = ?1 AND user_id = ?2",
            (goal_id, user_id.as_i64()),
            |_| Ok(()),
        )
        .optional()?;

    match owned {
        Some(()) => Ok(()),
        None => Err(Error::InvalidGoal(goal_id)),
    }
}
