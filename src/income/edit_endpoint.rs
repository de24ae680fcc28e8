//! Defines the endpoint for updating income.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    income::core::{
        INCOME_COLUMNS, Income, IncomeForm, IncomeId, IncomeState, NewIncome, get_income,
        map_row_to_income,
    },
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
    validation::Validated,
};

/// A route handler for updating income, responds with the updated entry.
pub async fn edit_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Validated(new_income): Validated<IncomeForm>,
) -> Result<Json<Income>, Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    with_transaction(&mut connection, |transaction| {
        update_income(income_id, user_id, new_income, transaction)
    })
    .map(Json)
}

/// Replace the income `income_id` with `new_income` and move the user's
/// balance by the difference between the new and old amounts.
///
/// The original date is kept if `new_income` has none.
///
/// # Errors
/// Returns a:
/// - [Error::IncomeNotFound] if the income does not exist,
/// - [Error::NotAuthorized] if the income belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_income(
    income_id: IncomeId,
    user_id: UserID,
    new_income: NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    let existing = get_income(income_id, connection)?;

    if existing.user_id != user_id {
        return Err(Error::NotAuthorized);
    }

    let income = connection
        .prepare(&format!(
            "UPDATE income
            SET \
                title = ?1, \
                amount = ?2, \
                category = ?3, \
                description = ?4, \
                date = ?5 \
            WHERE id = ?6
            RETURNING {INCOME_COLUMNS}"
        ))?
        .query_row(
            (
                &new_income.title,
                new_income.amount,
                new_income.category,
                &new_income.description,
                new_income.date.unwrap_or(existing.date),
                income_id,
            ),
            map_row_to_income,
        )?;

    apply_balance_change(
        user_id,
        BalanceChange::updated(Direction::Credit, existing.amount, income.amount),
        connection,
    )?;

    Ok(income)
}
