//! Defines the endpoint for contributing to a community goal.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    community::core::{CommunityGoal, CommunityGoalId, CommunityState, get_community_goal},
    contribution::{Contribution, ContributionForm, settle_contribution},
    db::{lock_connection, with_transaction},
    timezone::get_local_offset,
    user::UserID,
    validation::Validated,
};

/// The response to a successful contribution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityContributionResponse {
    community_goal: CommunityGoal,
    message: &'static str,
}

/// A route handler for contributing to a community goal.
pub async fn contribute_to_community_goal_endpoint(
    State(state): State<CommunityState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<CommunityGoalId>,
    Validated(amount): Validated<ContributionForm>,
) -> Result<Json<CommunityContributionResponse>, Error> {
    let now = OffsetDateTime::now_utc();
    let local_offset = get_local_offset(&state.local_timezone, now)?;
    let mut connection = lock_connection(&state.db_connection)?;

    let community_goal = with_transaction(&mut connection, |transaction| {
        contribute_to_community_goal(goal_id, user_id, amount, now, local_offset, transaction)
    })?;

    Ok(Json(CommunityContributionResponse {
        community_goal,
        message: "Contribution successful",
    }))
}

/// Move `amount` from the balance of `user_id` into the community goal `goal_id`.
///
/// The user's contributor entry accumulates the amount, or is added if this
/// is their first contribution. See [settle_contribution] for the changes
/// made to the user's account. Returns the goal as it reads after the change.
///
/// # Errors
/// Returns a:
/// - [Error::CommunityGoalNotFound] if the goal does not exist,
/// - [Error::InactiveCommunityGoal] if the goal no longer accepts contributions,
/// - [Error::InsufficientBalance] if the user's balance is below `amount`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn contribute_to_community_goal(
    goal_id: CommunityGoalId,
    user_id: UserID,
    amount: f64,
    now: OffsetDateTime,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<CommunityGoal, Error> {
    let mut goal = get_community_goal(goal_id, connection)?;

    if !goal.is_active {
        return Err(Error::InactiveCommunityGoal);
    }

    settle_contribution(
        user_id,
        Contribution {
            amount,
            goal_title: goal.title.clone(),
            goal_kind: "community goal",
            goal_id: None,
        },
        now,
        local_offset,
        connection,
    )?;

    goal.progress.add(amount, now);

    connection.execute(
        "UPDATE community_goal SET current_amount = ?1, is_completed = ?2, completed_at = ?3 \
         WHERE id = ?4",
        (
            goal.progress.current_amount,
            goal.progress.is_completed,
            goal.progress.completed_at,
            goal_id,
        ),
    )?;

    connection.execute(
        "INSERT INTO community_goal_contributor (community_goal_id, user_id, amount, contributed_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(community_goal_id, user_id) DO UPDATE SET \
            amount = amount + excluded.amount, \
            contributed_at = excluded.contributed_at",
        (goal_id, user_id.as_i64(), amount, now),
    )?;

    get_community_goal(goal_id, connection)
}

#[cfg(test)]
mod contribute_to_community_goal_tests {
    use time::{UtcOffset, macros::datetime};

    use crate::{
        Error,
        community::{contribute_to_community_goal, get_community_goal},
        expense::get_expenses_for_user,
        test_utils::{
            must_create_test_community_goal, must_create_test_connection, must_create_test_user,
        },
        user::{UserRef, get_user_by_id},
    };

    #[test]
    fn accumulates_repeat_contributions() {
        let connection = must_create_test_connection();
        let creator = must_create_test_user(0.0, &connection);
        let user = must_create_test_user(100.0, &connection);
        let goal = must_create_test_community_goal(creator.id, 500.0, &connection);
        let first = datetime!(2025-06-01 12:00 UTC);
        let second = datetime!(2025-06-02 09:00 UTC);

        contribute_to_community_goal(goal.id, user.id, 20.0, first, UtcOffset::UTC, &connection)
            .unwrap();
        let got =
            contribute_to_community_goal(goal.id, user.id, 15.0, second, UtcOffset::UTC, &connection)
                .unwrap();

        assert_eq!(got.progress.current_amount, 35.0);
        assert_eq!(got.contributors.len(), 1);
        assert_eq!(
            got.contributors[0].user,
            UserRef {
                id: user.id,
                name: user.name.clone()
            }
        );
        assert_eq!(got.contributors[0].amount, 35.0);
        assert_eq!(got.contributors[0].contributed_at, second);

        let account = get_user_by_id(user.id, &connection).unwrap();
        assert_eq!(account.balance, 65.0);
        assert_eq!(account.total_saved, 35.0);
        assert_eq!(account.streak.count, 2);
    }

    #[test]
    fn keeps_contributors_in_order_of_first_contribution() {
        let connection = must_create_test_connection();
        let alice = must_create_test_user(100.0, &connection);
        let bob = must_create_test_user(100.0, &connection);
        let goal = must_create_test_community_goal(alice.id, 500.0, &connection);
        let now = datetime!(2025-06-01 12:00 UTC);

        for user_id in [bob.id, alice.id, bob.id] {
            contribute_to_community_goal(goal.id, user_id, 10.0, now, UtcOffset::UTC, &connection)
                .unwrap();
        }

        let contributors: Vec<_> = get_community_goal(goal.id, &connection)
            .unwrap()
            .contributors
            .into_iter()
            .map(|contributor| (contributor.user.id, contributor.amount))
            .collect();
        assert_eq!(contributors, [(bob.id, 20.0), (alice.id, 10.0)]);
    }

    #[test]
    fn completes_goal_once() {
        let connection = must_create_test_connection();
        let user = must_create_test_user(100.0, &connection);
        let goal = must_create_test_community_goal(user.id, 10.0, &connection);
        let completed_at = datetime!(2025-06-01 12:00 UTC);

        contribute_to_community_goal(goal.id, user.id, 10.0, completed_at, UtcOffset::UTC, &connection)
            .unwrap();
        let got = contribute_to_community_goal(
            goal.id,
            user.id,
            5.0,
            datetime!(2025-06-03 12:00 UTC),
            UtcOffset::UTC,
            &connection,
        )
        .unwrap();

        assert!(got.progress.is_completed);
        assert_eq!(got.progress.completed_at, Some(completed_at));
        assert!(got.is_active);
    }

    #[test]
    fn records_unlinked_expense() {
        let connection = must_create_test_connection();
        let user = must_create_test_user(100.0, &connection);
        let goal = must_create_test_community_goal(user.id, 500.0, &connection);

        contribute_to_community_goal(
            goal.id,
            user.id,
            20.0,
            datetime!(2025-06-01 12:00 UTC),
            UtcOffset::UTC,
            &connection,
        )
        .unwrap();

        let expenses = get_expenses_for_user(user.id, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(
            expenses[0].description,
            Some(format!("Contribution to community goal: {}", goal.title))
        );
        assert_eq!(expenses[0].goal_id, None);
    }

    #[test]
    fn inactive_goal_refuses_contributions() {
        let connection = must_create_test_connection();
        let user = must_create_test_user(100.0, &connection);
        let goal = must_create_test_community_goal(user.id, 500.0, &connection);
        connection
            .execute("UPDATE community_goal SET is_active = 0 WHERE id = ?1", [goal.id])
            .unwrap();

        let result = contribute_to_community_goal(
            goal.id,
            user.id,
            20.0,
            datetime!(2025-06-01 12:00 UTC),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(result, Err(Error::InactiveCommunityGoal));
        assert_eq!(get_user_by_id(user.id, &connection), Ok(user));
    }

    #[test]
    fn insufficient_balance_leaves_goal_unchanged() {
        let connection = must_create_test_connection();
        let user = must_create_test_user(5.0, &connection);
        let goal = must_create_test_community_goal(user.id, 500.0, &connection);

        let result = contribute_to_community_goal(
            goal.id,
            user.id,
            20.0,
            datetime!(2025-06-01 12:00 UTC),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(result, Err(Error::InsufficientBalance));
        assert_eq!(get_community_goal(goal.id, &connection), Ok(goal));
    }

    #[test]
    fn fails_for_missing_goal() {
        let connection = must_create_test_connection();
        let user = must_create_test_user(5.0, &connection);

        let result = contribute_to_community_goal(
            8,
            user.id,
            1.0,
            datetime!(2025-06-01 12:00 UTC),
            UtcOffset::UTC,
            &connection,
        );

        assert_eq!(result, Err(Error::CommunityGoalNotFound));
    }
}
