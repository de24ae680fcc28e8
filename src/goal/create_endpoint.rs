//! Defines the endpoint for creating a goal.

use axum::{Extension, Json, extract::State, http::StatusCode};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    contribution::GoalProgress,
    db::lock_connection,
    goal::core::{GOAL_COLUMNS, Goal, GoalForm, GoalState, NewGoal, map_row_to_goal},
    user::UserID,
    validation::Validated,
};

/// A route handler for creating a goal, responds with the new goal.
pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Validated(new_goal): Validated<GoalForm>,
) -> Result<(StatusCode, Json<Goal>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let goal = create_goal(user_id, new_goal, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// Store `new_goal` for `user_id` with no progress.
///
/// # Errors
/// Returns an [Error::SqlError] if the goal could not be stored, e.g. the user
/// does not exist.
pub fn create_goal(
    user_id: UserID,
    new_goal: NewGoal,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Goal, Error> {
    let progress = GoalProgress::new(new_goal.target_amount);

    connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, title, target_amount, current_amount, is_completed, \
                category, description, target_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &new_goal.title,
                progress.target_amount,
                progress.current_amount,
                progress.is_completed,
                new_goal.category,
                &new_goal.description,
                new_goal.target_date,
                now,
            ),
            map_row_to_goal,
        )
        .map_err(Error::from)
}
