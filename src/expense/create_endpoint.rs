//! Defines the endpoint for recording new expenses.

use axum::{Extension, Json, extract::State, http::StatusCode};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    expense::core::{
        EXPENSE_COLUMNS, Expense, ExpenseForm, ExpenseState, NewExpense, check_goal_reference,
        map_row_to_expense,
    },
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
    validation::Validated,
};

/// A route handler for recording an expense, responds with the new entry.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Validated(new_expense): Validated<ExpenseForm>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    let expense = with_transaction(&mut connection, |transaction| {
        create_expense(user_id, new_expense, OffsetDateTime::now_utc(), transaction)
    })?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Store `new_expense` for `user_id` and take its amount from the user's balance.
///
/// The balance is allowed to go negative.
///
/// # Errors
/// Returns a:
/// - [Error::InvalidGoal] if the expense names a goal the user does not own,
/// - [Error::UserNotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(
    user_id: UserID,
    new_expense: NewExpense,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    check_goal_reference(new_expense.goal_id, user_id, connection)?;

    let expense = connection
        .prepare(&format!(
            "INSERT INTO expense (user_id, title, amount, category, description, date, \
                is_goal_contribution, goal_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &new_expense.title,
                new_expense.amount,
                new_expense.category,
                &new_expense.description,
                new_expense.date.unwrap_or(now),
                new_expense.is_goal_contribution.unwrap_or(false),
                new_expense.goal_id,
                now,
            ),
            map_row_to_expense,
        )?;

    apply_balance_change(
        user_id,
        BalanceChange::created(Direction::Debit, expense.amount),
        connection,
    )?;

    Ok(expense)
}
