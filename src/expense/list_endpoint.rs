//! Defines the endpoint for listing a user's expenses.

use axum::{Extension, Json, extract::State};
use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    expense::core::{EXPENSE_COLUMNS, Expense, ExpenseState, map_row_to_expense},
    user::UserID,
};

/// A route handler for listing the user's expenses, newest first.
pub async fn list_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expenses_for_user(user_id, &connection).map(Json)
}

/// Retrieve all expenses recorded by `user_id`, most recently recorded first.
pub fn get_expenses_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE user_id = :user_id \
             ORDER BY created_at DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}
