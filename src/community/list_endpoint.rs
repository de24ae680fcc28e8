//! Defines the endpoint for listing community goals.

use axum::{Json, extract::State};
use rusqlite::Connection;

use crate::{
    Error,
    community::core::{
        COMMUNITY_GOAL_QUERY, CommunityGoal, CommunityState, attach_contributors,
        map_row_to_community_goal,
    },
    db::lock_connection,
};

/// A route handler for listing the active community goals, newest first.
pub async fn list_community_goal_endpoint(
    State(state): State<CommunityState>,
) -> Result<Json<Vec<CommunityGoal>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_active_community_goals(&connection).map(Json)
}

/// Retrieve every active community goal with its creator and contributors.
pub fn get_active_community_goals(connection: &Connection) -> Result<Vec<CommunityGoal>, Error> {
    let goals = connection
        .prepare(&format!(
            "{COMMUNITY_GOAL_QUERY} WHERE g.is_active = 1 ORDER BY g.created_at DESC, g.id DESC"
        ))?
        .query_map([], map_row_to_community_goal)?
        .collect::<Result<Vec<_>, _>>()?;

    goals
        .into_iter()
        .map(|goal| attach_contributors(goal, connection))
        .collect()
}
