#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{TestApp, must_create_test_app};

use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    category::{CommunityCategory, GoalCategory},
    community::{CommunityGoal, NewCommunityGoal, create_community_goal},
    db::initialize,
    goal::{Goal, NewGoal, create_goal},
    user::{User, UserID, create_user},
};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Create a user with a unique name and email.
#[track_caller]
pub(crate) fn must_create_test_user(balance: f64, connection: &Connection) -> User {
    let count: i64 = connection
        .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
        .expect("Could not count users");
    let number = count + 1;

    create_user(
        &format!("Test User {number}"),
        &format!("user{number}@example.com"),
        balance,
        connection,
    )
    .expect("Could not create test user")
}

#[track_caller]
pub(crate) fn must_create_test_goal(user_id: UserID, target_amount: f64, connection: &Connection) -> Goal {
    create_goal(
        user_id,
        NewGoal {
            title: "Emergency fund".to_owned(),
            target_amount,
            category: GoalCategory::EmergencyFund,
            description: None,
            target_date: None,
        },
        datetime!(2025-01-01 00:00 UTC),
        connection,
    )
    .expect("Could not create test goal")
}

#[track_caller]
pub(crate) fn must_create_test_community_goal(
    user_id: UserID,
    target_amount: f64,
    connection: &Connection,
) -> CommunityGoal {
    create_community_goal(
        user_id,
        NewCommunityGoal {
            title: "Beach clean up".to_owned(),
            description: "Gear and skips for the summer clean up".to_owned(),
            target_amount,
            category: CommunityCategory::Environment,
            target_date: None,
        },
        datetime!(2025-01-01 00:00 UTC),
        connection,
    )
    .expect("Could not create test community goal")
}
