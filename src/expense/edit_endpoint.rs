//! Defines the endpoint for updating expenses.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{
    Error,
    db::{lock_connection, with_transaction},
    expense::core::{
        EXPENSE_COLUMNS, Expense, ExpenseForm, ExpenseId, ExpenseState, NewExpense,
        check_goal_reference, get_expense, map_row_to_expense,
    },
    ledger::{BalanceChange, Direction, apply_balance_change},
    user::UserID,
    validation::Validated,
};

/// A route handler for updating an expense, responds with the updated entry.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Validated(new_expense): Validated<ExpenseForm>,
) -> Result<Json<Expense>, Error> {
    let mut connection = lock_connection(&state.db_connection)?;

    with_transaction(&mut connection, |transaction| {
        update_expense(expense_id, user_id, new_expense, transaction)
    })
    .map(Json)
}

/// Replace the expense `expense_id` with `new_expense` and move the user's
/// balance by the difference between the old and new amounts.
///
/// Only the balance follows the change. If the expense records a goal
/// contribution, the goal's progress is left as it is, and the goal link and
/// contribution tag stay unless `new_expense` sets them.
///
/// # Errors
/// Returns a:
/// - [Error::ExpenseNotFound] if the expense does not exist,
/// - [Error::NotAuthorized] if the expense belongs to another user,
/// - [Error::InvalidGoal] if the new goal reference is not one of the user's goals,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let existing = get_expense(expense_id, connection)?;

    if existing.user_id != user_id {
        return Err(Error::NotAuthorized);
    }

    check_goal_reference(new_expense.goal_id, user_id, connection)?;
    let goal_id = new_expense.goal_id.or(existing.goal_id);

    let expense = connection
        .prepare(&format!(
            "UPDATE expense
            SET \
                title = ?1, \
                amount = ?2, \
                category = ?3, \
                description = ?4, \
                date = ?5, \
                is_goal_contribution = ?6, \
                goal_id = ?7 \
            WHERE id = ?8
            RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                &new_expense.title,
                new_expense.amount,
                new_expense.category,
                &new_expense.description,
                new_expense.date.unwrap_or(existing.date),
                new_expense
                    .is_goal_contribution
                    .unwrap_or(existing.is_goal_contribution),
                goal_id,
                expense_id,
            ),
            map_row_to_expense,
        )?;

    apply_balance_change(
        user_id,
        BalanceChange::updated(Direction::Debit, existing.amount, expense.amount),
        connection,
    )?;

    Ok(expense)
}
