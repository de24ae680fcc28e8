//! Defines the endpoint for deleting expenses.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    expense::core::{ExpenseId, ExpenseState, get_expense},
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
};

/// A route handler for deleting an expense, responds with a confirmation message.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Value>, Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    with_transaction(&mut connection, |transaction| {
        delete_expense(expense_id, user_id, transaction)
    })?;

    Ok(Json(json!({ "message": "Expense removed" })))
}

/// Delete the expense `expense_id` and give its amount back to the user.
///
/// # Errors
/// Returns a:
/// - [Error::ExpenseNotFound] if the expense does not exist,
/// - [Error::NotAuthorized] if the expense belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let expense = get_expense(expense_id, connection)?;

    if expense.user_id != user_id {
        return Err(Error::NotAuthorized);
    }

    apply_balance_change(
        user_id,
        BalanceChange::deleted(Direction::Debit, expense.amount),
        connection,
    )?;

    connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &expense_id)])?;

    Ok(())
}
