//! Defines the community goal model, its request body and the shared database queries.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    category::CommunityCategory,
    contribution::GoalProgress,
    database_id::DatabaseId,
    user::{UserID, UserRef},
    validation::{FieldError, FieldRules, Validate},
};

/// Database identifier for a community goal.
pub type CommunityGoalId = DatabaseId;

/// The state needed by the community goal endpoints.
#[derive(Debug, Clone)]
pub struct CommunityState {
    /// The database connection for managing community goals.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used for saving streaks.
    pub local_timezone: String,
}

impl FromRef<AppState> for CommunityState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A savings target shared by all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityGoal {
    pub id: CommunityGoalId,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub progress: GoalProgress,
    pub category: CommunityCategory,
    /// The user who started the goal.
    pub created_by: UserRef,
    /// One entry per contributing user, in order of first contribution.
    pub contributors: Vec<Contributor>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
    /// Inactive goals are hidden from the listing and refuse contributions.
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A user's accumulated contribution to a community goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub user: UserRef,
    /// The sum of all the user's contributions to the goal.
    pub amount: f64,
    /// When the user last contributed.
    #[serde(with = "time::serde::rfc3339")]
    pub contributed_at: OffsetDateTime,
}

/// A validated community goal that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCommunityGoal {
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub category: CommunityCategory,
    pub target_date: Option<OffsetDateTime>,
}

/// The request body for creating a community goal.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityGoalForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub category: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
}

impl Validate for CommunityGoalForm {
    type Output = NewCommunityGoal;

    fn validate(self) -> Result<NewCommunityGoal, Vec<FieldError>> {
        let mut rules = FieldRules::default();
        let title = rules.non_empty("title", self.title, "Title is required");
        let description = rules.non_empty("description", self.description, "Description is required");
        let target_amount = rules.at_least(
            "targetAmount",
            self.target_amount,
            1.0,
            "Target amount must be greater than 0",
        );
        let category = rules.category("category", self.category);

        match (title, description, target_amount, category) {
            (Some(title), Some(description), Some(target_amount), Some(category)) => {
                Ok(NewCommunityGoal {
                    title,
                    description,
                    target_amount,
                    category,
                    target_date: self.target_date,
                })
            }
            _ => Err(rules.into_errors()),
        }
    }
}

/// Create the tables for community goals and their contributors.
pub fn create_community_goal_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS community_goal (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK (target_amount >= 1),
            current_amount REAL NOT NULL DEFAULT 0 CHECK (current_amount >= 0),
            category TEXT NOT NULL,
            created_by INTEGER NOT NULL,
            target_date TEXT,
            is_completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            FOREIGN KEY(created_by) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS community_goal_contributor (
            community_goal_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            contributed_at TEXT NOT NULL,
            PRIMARY KEY(community_goal_id, user_id),
            FOREIGN KEY(community_goal_id) REFERENCES community_goal(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Selects a community goal joined with its creator's name. Contributors are
/// loaded separately by [attach_contributors].
pub(super) const COMMUNITY_GOAL_QUERY: &str = "SELECT \
        g.id, g.title, g.description, g.target_amount, g.current_amount, g.is_completed, \
        g.completed_at, g.category, g.created_by, u.name, g.target_date, g.is_active, g.created_at \
    FROM community_goal g \
    INNER JOIN user u ON u.id = g.created_by";

pub(super) fn map_row_to_community_goal(row: &Row) -> Result<CommunityGoal, rusqlite::Error> {
    Ok(CommunityGoal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        progress: GoalProgress {
            target_amount: row.get(3)?,
            current_amount: row.get(4)?,
            is_completed: row.get(5)?,
            completed_at: row.get(6)?,
        },
        category: row.get(7)?,
        created_by: UserRef {
            id: UserID::new(row.get(8)?),
            name: row.get(9)?,
        },
        contributors: Vec::new(),
        target_date: row.get(10)?,
        is_active: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// Fill in the contributors of `goal` with their names.
pub(super) fn attach_contributors(
    mut goal: CommunityGoal,
    connection: &Connection,
) -> Result<CommunityGoal, Error> {
    goal.contributors = connection
        .prepare(
            "SELECT c.user_id, u.name, c.amount, c.contributed_at
             FROM community_goal_contributor c
             INNER JOIN user u ON u.id = c.user_id
             WHERE c.community_goal_id = :id
             ORDER BY c.rowid",
        )?
        .query_map(&[(":id", &goal.id)], |row| {
            Ok(Contributor {
                user: UserRef {
                    id: UserID::new(row.get(0)?),
                    name: row.get(1)?,
                },
                amount: row.get(2)?,
                contributed_at: row.get(3)?,
            })
        })?
        .collect::<Result<_, _>>()?;

    Ok(goal)
}

/// Retrieve a community goal with its creator and contributors.
///
/// # Errors
/// Returns [Error::CommunityGoalNotFound] if there is no community goal with `id`.
pub fn get_community_goal(id: CommunityGoalId, connection: &Connection) -> Result<CommunityGoal, Error> {
    let goal = connection
        .prepare(&format!("{COMMUNITY_GOAL_QUERY} WHERE g.id = :id"))?
        .query_row(&[(":id", &id)], map_row_to_community_goal)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::CommunityGoalNotFound,
            error => error,
        })?;

    attach_contributors(goal, connection)
}
