//! Bearer token authentication.
//!
//! Users receive a signed token when they log in. Protected routes run
//! [auth_guard], which checks the token and hands the user's ID to the route
//! handler.

mod middleware;
mod token;

pub use middleware::auth_guard;
#[cfg(test)]
pub use middleware::AuthState;
pub use token::{DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};
