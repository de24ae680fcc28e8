//! The account summary for the logged in user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    user::{User, UserID, get_user_by_id},
};

/// The state needed to read a user's account.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the user's balance, total saved and saving streak.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_user_by_id(user_id, &connection).map(Json)
}
