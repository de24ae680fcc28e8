//! Defines the endpoint for contributing to a personal goal.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    contribution::{Contribution, ContributionForm, settle_contribution},
    db::{lock_connection, with_transaction},
    goal::core::{Goal, GoalId, GoalState, get_owned_goal},
    timezone::get_local_offset,
    user::UserID,
    validation::Validated,
};

/// The response to a successful contribution.
#[derive(Debug, Serialize)]
pub struct GoalContributionResponse {
    goal: Goal,
    message: &'static str,
}

/// A route handler for contributing to one of the user's goals.
pub async fn contribute_to_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Validated(amount): Validated<ContributionForm>,
) -> Result<Json<GoalContributionResponse>, Error> {
    let now = OffsetDateTime::now_utc();
    let local_offset = get_local_offset(&state.local_timezone, now)?;
    let mut connection = lock_connection(&state.db_connection)?;

    let goal = with_transaction(&mut connection, |transaction| {
        contribute_to_goal(goal_id, user_id, amount, now, local_offset, transaction)
    })?;

    Ok(Json(GoalContributionResponse {
        goal,
        message: "Contribution successful",
    }))
}

/// Move `amount` from the balance of `user_id` into their goal `goal_id`.
///
/// See [settle_contribution] for the changes made to the user's account.
/// Returns the goal with its new progress.
///
/// # Errors
/// Returns a:
/// - [Error::GoalNotFound] if the goal does not exist,
/// - [Error::NotAuthorized] if the goal belongs to another user,
/// - [Error::InsufficientBalance] if the user's balance is below `amount`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn contribute_to_goal(
    goal_id: GoalId,
    user_id: UserID,
    amount: f64,
    now: OffsetDateTime,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Goal, Error> {
    let mut goal = get_owned_goal(goal_id, user_id, connection)?;

    settle_contribution(
        user_id,
        Contribution {
            amount,
            goal_title: goal.title.clone(),
            goal_kind: "personal goal",
            goal_id: Some(goal_id),
        },
        now,
        local_offset,
        connection,
    )?;

    goal.progress.add(amount, now);

    connection.execute(
        "UPDATE goal SET current_amount = ?1, is_completed = ?2, completed_at = ?3 WHERE id = ?4",
        (
            goal.progress.current_amount,
            goal.progress.is_completed,
            goal.progress.completed_at,
            goal_id,
        ),
    )?;

    Ok(goal)
}
