//! Defines the endpoint for listing a user's income.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    income::core::{INCOME_COLUMNS, Income, IncomeState, map_row_to_income},
    user::UserID,
};

/// A route handler for listing the user's income, newest first.
pub async fn list_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Income>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_incomes_for_user(user_id, &connection).map(Json)
}

/// Retrieve all income recorded by `user_id`, most recently recorded first.
pub fn get_incomes_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(&format!(
            "SELECT {INCOME_COLUMNS} FROM income WHERE user_id = :user_id \
             ORDER BY created_at DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_income)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}
