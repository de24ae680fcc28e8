//! Defines the endpoint for deleting income.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    income::core::{IncomeId, IncomeState, get_income},
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
};

/// A route handler for deleting income, responds with a confirmation message.
pub async fn delete_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Result<Json<Value>, Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    with_transaction(&mut connection, |transaction| {
        delete_income(income_id, user_id, transaction)
    })?;

    Ok(Json(json!({ "message": "Income removed" })))
}

/// Delete the income `income_id` and take its amount back out of the user's balance.
///
/// # Errors
/// Returns a:
/// - [Error::IncomeNotFound] if the income does not exist,
/// - [Error::NotAuthorized] if the income belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_income(income_id: IncomeId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let income = get_income(income_id, connection)?;

    if income.user_id != user_id {
        return Err(Error::NotAuthorized);
    }

    apply_balance_change(
        user_id,
        BalanceChange::deleted(Direction::Credit, income.amount),
        connection,
    )?;

    connection.execute("DELETE FROM income WHERE id = :id", &[(":id", &income_id)])?;

    Ok(())
}
