//! Defines the endpoint for recording new income.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    income::core::{INCOME_COLUMNS, Income, IncomeForm, IncomeState, NewIncome, map_row_to_income},
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
    validation::Validated,
};

/// A route handler for recording income, responds with the new entry.
pub async fn create_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Validated(new_income): Validated<IncomeForm>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    let income = with_transaction(&mut connection, |transaction| {
        create_income(user_id, new_income, OffsetDateTime::now_utc(), transaction)
    })?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// Store `new_income` for `user_id` and add its amount to the user's balance.
///
/// # Errors
/// Returns [Error::UserNotFound] if the user does not exist, or an SQL error.
pub fn create_income(
    user_id: UserID,
    new_income: NewIncome,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Income, Error> {
    let income = connection
        .prepare(&format!(
            "INSERT INTO income (user_id, title, amount, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {INCOME_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &new_income.title,
                new_income.amount,
                new_income.category,
                &new_income.description,
                new_income.date.unwrap_or(now),
                now,
            ),
            map_row_to_income,
        )?;

    apply_balance_change(
        user_id,
        BalanceChange::created(Direction::Credit, income.amount),
        connection,
    )?;

    Ok(income)
}
