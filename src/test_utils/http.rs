use axum_test::TestServer;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, DEFAULT_TOKEN_DURATION, build_router, encode_token,
    test_utils::must_create_test_user,
    user::User,
};

/// A server running the full router with a user who holds a valid token.
pub(crate) struct TestApp {
    pub(crate) server: TestServer,
    pub(crate) state: AppState,
    pub(crate) user: User,
    pub(crate) token: String,
}

impl TestApp {
    /// Create another user and a token for them.
    #[track_caller]
    pub(crate) fn must_add_user(&self, balance: f64) -> (User, String) {
        let connection = self.state.db_connection.lock().unwrap();
        let user = must_create_test_user(balance, &connection);
        let token = must_create_token(&self.state, &user);

        (user, token)
    }
}

#[track_caller]
fn must_create_token(state: &AppState, user: &User) -> String {
    encode_token(
        user.id,
        &state.jwt_keys.encoding_key,
        OffsetDateTime::now_utc(),
        DEFAULT_TOKEN_DURATION,
    )
    .expect("Could not create token")
}

/// Start a test server whose first user has `balance`.
#[track_caller]
pub(crate) fn must_create_test_app(balance: f64) -> TestApp {
    let state = AppState::new(
        Connection::open_in_memory().expect("Could not create in-memory SQLite database"),
        "test secret",
        "Etc/UTC",
    )
    .expect("Could not create app state");

    let user = {
        let connection = state.db_connection.lock().unwrap();
        must_create_test_user(balance, &connection)
    };
    let token = must_create_token(&state, &user);
    let server = TestServer::new(build_router(state.clone()));

    TestApp {
        server,
        state,
        user,
        token,
    }
}
