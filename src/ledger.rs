//! Keeps a user's balance in step with their income and expenses.

use rusqlite::Connection;

use crate::{Error, user::UserID};

/// Which way a ledger entry moves the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Income adds to the balance.
    Credit,
    /// Expenses take from the balance.
    Debit,
}

impl Direction {
    /// The amount with the sign it has on the balance.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        }
    }
}

/// A change to a balance: undo the effect of an old entry, then apply a new one.
///
/// The new balance is `balance - reversed + applied`, where both amounts are
/// signed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    reversed: f64,
    applied: f64,
}

impl BalanceChange {
    /// The change for recording a new entry of `amount`.
    pub fn created(direction: Direction, amount: f64) -> Self {
        Self {
            reversed: 0.0,
            applied: direction.signed(amount),
        }
    }

    /// The change for replacing an entry of `old_amount` with one of `new_amount`.
    pub fn updated(direction: Direction, old_amount: f64, new_amount: f64) -> Self {
        Self {
            reversed: direction.signed(old_amount),
            applied: direction.signed(new_amount),
        }
    }

    /// The change for removing an entry of `amount`.
    pub fn deleted(direction: Direction, amount: f64) -> Self {
        Self {
            reversed: direction.signed(amount),
            applied: 0.0,
        }
    }
}

/// Apply `change` to the balance of the user `user_id`.
///
/// There is no lower bound on the balance; it may go negative.
///
/// # Errors
/// Returns [Error::UserNotFound] if the user does not exist, or an SQL error.
pub fn apply_balance_change(
    user_id: UserID,
    change: BalanceChange,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET balance = balance - ?1 + ?2 WHERE id = ?3",
        (change.reversed, change.applied, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}
