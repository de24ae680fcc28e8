//! Moving money from a user's balance into a goal.
//!
//! Personal and community goals share the same rules for progress and for
//! settling a contribution against the contributor's account.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    category::ExpenseCategory,
    expense::{NewExpense, create_expense},
    goal::GoalId,
    streak::apply_streak,
    user::{User, UserID, get_user_by_id, save_account},
    validation::{FieldError, FieldRules, Validate},
};

/// How far a goal is towards its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// The amount the goal is saving towards. At least 1.
    pub target_amount: f64,
    /// The total contributed so far.
    pub current_amount: f64,
    /// Set once the current amount reaches the target and never unset.
    pub is_completed: bool,
    /// When the goal was first completed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl GoalProgress {
    /// Progress for a goal nobody has contributed to yet.
    pub fn new(target_amount: f64) -> Self {
        Self {
            target_amount,
            current_amount: 0.0,
            is_completed: false,
            completed_at: None,
        }
    }

    /// Add a contribution of `amount` made at `now`.
    pub fn add(&mut self, amount: f64, now: OffsetDateTime) {
        self.current_amount += amount;

        if !self.is_completed && self.current_amount >= self.target_amount {
            self.is_completed = true;
            self.completed_at = Some(now);
        }
    }
}

/// The request body for contributing to a goal.
#[derive(Debug, Default, Deserialize)]
pub struct ContributionForm {
    pub amount: Option<f64>,
}

impl Validate for ContributionForm {
    type Output = f64;

    fn validate(self) -> Result<f64, Vec<FieldError>> {
        let mut rules = FieldRules::default();

        rules
            .at_least("amount", self.amount, 0.01, "Contribution amount must be greater than 0")
            .ok_or_else(|| rules.into_errors())
    }
}

/// A contribution to be settled against the contributor's account.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub amount: f64,
    /// The title of the goal receiving the money.
    pub goal_title: String,
    /// Describes the kind of goal, e.g. "personal goal".
    pub goal_kind: &'static str,
    /// Set for personal goals so the derived expense links back to the goal.
    pub goal_id: Option<GoalId>,
}

impl Contribution {
    fn into_expense(self) -> NewExpense {
        NewExpense {
            title: format!("Contribution to {}", self.goal_title),
            amount: self.amount,
            category: ExpenseCategory::GoalContribution,
            description: Some(format!(
                "Contribution to {}: {}",
                self.goal_kind, self.goal_title
            )),
            date: None,
            is_goal_contribution: Some(true),
            goal_id: self.goal_id,
        }
    }
}

/// Take `contribution` out of the balance of `user_id`.
///
/// Records the contribution as an expense, adds the amount to the user's total
/// saved and updates their saving streak, with calendar days taken in
/// `local_offset`. Returns the updated account.
///
/// This does not change the goal itself. Callers should run this and the goal
/// update in one transaction.
///
/// # Errors
/// Returns a:
/// - [Error::InsufficientBalance] if the user's balance is below the amount,
/// - [Error::UserNotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn settle_contribution(
    user_id: UserID,
    contribution: Contribution,
    now: OffsetDateTime,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<User, Error> {
    let amount = contribution.amount;
    let user = get_user_by_id(user_id, connection)?;

    if user.balance < amount {
        tracing::debug!(
            "user {user_id} tried to contribute {amount} with a balance of {}",
            user.balance
        );
        return Err(Error::InsufficientBalance);
    }

    create_expense(user_id, contribution.into_expense(), now, connection)?;

    // Re-read the account so the balance includes the expense.
    let mut user = get_user_by_id(user_id, connection)?;
    user.total_saved += amount;
    user.streak = apply_streak(user.streak, now, local_offset);
    save_account(&user, connection)?;

    Ok(user)
}
