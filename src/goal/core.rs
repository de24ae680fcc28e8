//! Defines the goal model, its request body and the shared database queries.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::GoalCategory,
    contribution::GoalProgress,
    database_id::DatabaseId,
    user::UserID,
    validation::{FieldError, FieldRules, Validate, optional_text},
};

/// Database identifier for a personal goal.
pub type GoalId = DatabaseId;

/// The state needed by the goal endpoints.
#[derive(Debug, Clone)]
pub struct GoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used for saving streaks.
    pub local_timezone: String,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A user's personal savings target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserID,
    pub title: String,
    #[serde(flatten)]
    pub progress: GoalProgress,
    pub category: GoalCategory,
    pub description: Option<String>,
    /// When the user hopes to reach the target.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated goal that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: f64,
    pub category: GoalCategory,
    pub description: Option<String>,
    pub target_date: Option<OffsetDateTime>,
}

/// The request body for creating or editing a goal.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    pub title: Option<String>,
    pub target_amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
}

impl Validate for GoalForm {
    type Output = NewGoal;

    fn validate(self) -> Result<NewGoal, Vec<FieldError>> {
        let mut rules = FieldRules::default();
        let title = rules.non_empty("title", self.title, "Title is required");
        let target_amount = rules.at_least(
            "targetAmount",
            self.target_amount,
            1.0,
            "Target amount must be greater than 0",
        );
        let category = rules.category("category", self.category);

        match (title, target_amount, category) {
            (Some(title), Some(target_amount), Some(category)) => Ok(NewGoal {
                title,
                target_amount,
                category,
                description: optional_text(self.description),
                target_date: self.target_date,
            }),
            _ => Err(rules.into_errors()),
        }
    }
}

pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount >= 1),
            current_amount REAL NOT NULL DEFAULT 0 CHECK (current_amount >= 0),
            category TEXT NOT NULL,
            description TEXT,
            target_date TEXT,
            is_completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub(super) const GOAL_COLUMNS: &str = "id, user_id, title, target_amount, current_amount, \
    is_completed, completed_at, category, description, target_date, created_at";

pub(super) fn map_row_to_goal(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        title: row.get(2)?,
        progress: GoalProgress {
            target_amount: row.get(3)?,
            current_amount: row.get(4)?,
            is_completed: row.get(5)?,
            completed_at: row.get(6)?,
        },
        category: row.get(7)?,
        description: row.get(8)?,
        target_date: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Retrieve a single goal by ID.
///
/// # Errors
/// Returns [Error::GoalNotFound] if there is no goal with `id`.
pub fn get_goal(id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_goal)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::GoalNotFound,
            error => error,
        })
}

/// Get the goal `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns [Error::GoalNotFound] if the goal does not exist or
/// [Error::NotAuthorized] if it belongs to another user.
pub(super) fn get_owned_goal(id: GoalId, user_id: UserID, connection: &Connection) -> Result<Goal, Error> {
    let goal = get_goal(id, connection)?;

    if goal.user_id != user_id {
        return Err(Error::NotAuthorized);
    }

    Ok(goal)
}

#[cfg(test)]
mod goal_form_tests {
    use crate::{
        category::GoalCategory,
        validation::{FieldError, Validate},
    };

    use super::{GoalForm, NewGoal};

    #[test]
    fn valid_form() {
        let form: GoalForm = serde_json::from_str(
            r#"{"title": "Rainy day", "targetAmount": 1000, "category": "Emergency Fund", "targetDate": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(
            form.validate(),
            Ok(NewGoal {
                title: "Rainy day".to_owned(),
                target_amount: 1000.0,
                category: GoalCategory::EmergencyFund,
                description: None,
                target_date: Some(time::macros::datetime!(2026-01-01 00:00 UTC)),
            })
        );
    }

    #[test]
    fn target_below_one_is_rejected() {
        let form = GoalForm {
            title: Some("Coffee".to_owned()),
            target_amount: Some(0.5),
            category: Some("Other".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            form.validate(),
            Err(vec![FieldError::new(
                "targetAmount",
                "Target amount must be greater than 0"
            )])
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let form = GoalForm {
            title: Some("Boat".to_owned()),
            target_amount: Some(5000.0),
            category: Some("Boat".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            form.validate(),
            Err(vec![FieldError::new("category", "\"Boat\" is not a valid category")])
        );
    }
}
