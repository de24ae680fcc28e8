//! Defines the endpoint for listing a user's goals.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    goal::core::{GOAL_COLUMNS, Goal, GoalState, map_row_to_goal},
    user::UserID,
};

/// A route handler for listing the user's goals, newest first.
pub async fn list_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Goal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_goals_for_user(user_id, &connection).map(Json)
}

/// Retrieve all goals owned by `user_id`, most recently created first.
pub fn get_goals_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE user_id = :user_id \
             ORDER BY created_at DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_goal)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}
