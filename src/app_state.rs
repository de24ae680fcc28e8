//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Error, auth::JwtKeys, db::initialize, timezone::get_local_offset};

/// The state of the REST server.
///
/// Route handlers take a narrower state struct built from this one with
/// [axum::extract::FromRef], so each handler only sees what it needs.
#[derive(Clone)]
pub struct AppState {
    /// The database connection.
    ///
    /// The lock serialises requests that change a user's balance.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The keys for signing and verifying bearer tokens.
    pub jwt_keys: JwtKeys,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Saving streaks count calendar days in this timezone.
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the timezone is not valid.
    pub fn new(db_connection: Connection, jwt_secret: &str, local_timezone: &str) -> Result<Self, Error> {
        get_local_offset(local_timezone, OffsetDateTime::now_utc())?;
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            jwt_keys: JwtKeys::new(jwt_secret),
            local_timezone: local_timezone.to_owned(),
        })
    }
}
