//! Defines the endpoint for updating a goal.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    goal::core::{GOAL_COLUMNS, Goal, GoalForm, GoalId, GoalState, NewGoal, get_owned_goal, map_row_to_goal},
    user::UserID,
    validation::Validated,
};

/// A route handler for updating a goal, responds with the updated goal.
pub async fn edit_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Validated(new_goal): Validated<GoalForm>,
) -> Result<Json<Goal>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_goal(goal_id, user_id, new_goal, &connection).map(Json)
}

/// Replace the details of the goal `goal_id` with `new_goal`.
///
/// The amount saved so far and the completion state are kept, even if the
/// new target is already met. The target date is kept if `new_goal` has none.
///
/// # Errors
/// Returns a:
/// - [Error::GoalNotFound] if the goal does not exist,
/// - [Error::NotAuthorized] if the goal belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_goal(
    goal_id: GoalId,
    user_id: UserID,
    new_goal: NewGoal,
    connection: &Connection,
) -> Result<Goal, Error> {
    let existing = get_owned_goal(goal_id, user_id, connection)?;

    connection
        .prepare(&format!(
            "UPDATE goal
            SET \
                title = ?1, \
                target_amount = ?2, \
                category = ?3, \
                description = ?4, \
                target_date = ?5 \
            WHERE id = ?6
            RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                &new_goal.title,
                new_goal.target_amount,
                new_goal.category,
                &new_goal.description,
                new_goal.target_date.or(existing.target_date),
                goal_id,
            ),
            map_row_to_goal,
        )
        .map_err(Error::from)
}
