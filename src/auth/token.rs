//! Creating and checking the JSON Web Tokens that identify a user.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserID};

/// How long a token is valid for if the caller does not say otherwise.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(1);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The ID of the user the token was issued to.
    sub: String,
    /// When the token was issued, as a unix timestamp.
    iat: i64,
    /// When the token expires, as a unix timestamp.
    exp: i64,
}

/// The keys for signing and verifying tokens, derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    /// Signs new tokens.
    pub encoding_key: EncodingKey,
    /// Verifies tokens sent by clients.
    pub decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the key pair for `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Create a token for `user_id` issued at `issued_at` that is valid for `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user_id: UserID,
    encoding_key: &EncodingKey,
    issued_at: OffsetDateTime,
    duration: Duration,
) -> Result<String, Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at.unix_timestamp(),
        exp: (issued_at + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Check `token` and get the ID of the user it was issued to.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, has a bad
/// signature or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<UserID, Error> {
    let claims = decode::<Claims>(token, decoding_key, &Validation::default())
        .map_err(|error| {
            tracing::debug!("rejected token: {error}");
            Error::InvalidToken
        })?
        .claims;

    claims
        .sub
        .parse()
        .map(UserID::new)
        .map_err(|_| Error::InvalidToken)
}
