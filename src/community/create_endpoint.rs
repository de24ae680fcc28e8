//! Defines the endpoint for starting a community goal.

use axum::{Extension, Json, extract::State, http::StatusCode};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    community::core::{
        CommunityGoal, CommunityGoalForm, CommunityState, NewCommunityGoal, get_community_goal,
    },
    db::lock_connection,
    user::UserID,
    validation::Validated,
};

/// A route handler for creating a community goal, responds with the new goal.
pub async fn create_community_goal_endpoint(
    State(state): State<CommunityState>,
    Extension(user_id): Extension<UserID>,
    Validated(new_goal): Validated<CommunityGoalForm>,
) -> Result<(StatusCode, Json<CommunityGoal>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let goal = create_community_goal(user_id, new_goal, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// Store `new_goal` as an active community goal started by `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if the goal could not be stored, e.g. the user
/// does not exist.
pub fn create_community_goal(
    user_id: UserID,
    new_goal: NewCommunityGoal,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<CommunityGoal, Error> {
    let id = connection
        .prepare(
            "INSERT INTO community_goal \
                (title, description, target_amount, category, created_by, target_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id",
        )?
        .query_row(
            (
                &new_goal.title,
                &new_goal.description,
                new_goal.target_amount,
                new_goal.category,
                user_id.as_i64(),
                new_goal.target_date,
                now,
            ),
            |row| row.get(0),
        )?;

    get_community_goal(id, connection)
}
