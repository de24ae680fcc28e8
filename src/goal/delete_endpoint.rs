//! Defines the endpoint for deleting a goal.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    Error,
    db::lock_connection,
    goal::core::{GoalId, GoalState, get_owned_goal},
    user::UserID,
};

/// A route handler for deleting a goal, responds with a confirmation message.
pub async fn delete_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_goal(goal_id, user_id, &connection)?;

    Ok(Json(json!({ "message": "Goal removed" })))
}

/// Delete the goal `goal_id`.
///
/// Money already contributed stays spent: the contribution expenses are kept
/// and lose their link to the goal.
///
/// # Errors
/// Returns a:
/// - [Error::GoalNotFound] if the goal does not exist,
/// - [Error::NotAuthorized] if the goal belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    get_owned_goal(goal_id, user_id, connection)?;

    connection.execute("DELETE FROM goal WHERE id = :id", &[(":id", &goal_id)])?;

    Ok(())
}
