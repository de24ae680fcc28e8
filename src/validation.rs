//! Request body validation.
//!
//! Handlers receive their request bodies through [Validated], which parses
//! the JSON body and checks it against the body type's [Validate] rules. Any
//! failure, whether malformed JSON or a field breaking a rule, is reported as
//! [Error::Validation] before the handler runs.

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// A problem with a single field of a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The name of the field as it appears in the request JSON.
    pub field: String,
    /// A description of what is wrong with the field.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// A request body that can be checked and converted into its validated form.
pub trait Validate {
    /// The type produced when all the fields are valid.
    type Output;

    /// Check the fields of the request body.
    ///
    /// # Errors
    /// Returns every field that broke a rule.
    fn validate(self) -> Result<Self::Output, Vec<FieldError>>;
}

/// An extractor for a JSON request body that has passed validation.
pub struct Validated<T: Validate>(pub T::Output);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: Validate + DeserializeOwned + Send,
    T::Output: Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| {
                Error::Validation(vec![FieldError::new("body", &rejection.body_text())])
            })?;

        body.validate().map(Validated).map_err(Error::Validation)
    }
}

/// Collects the field errors for a request body as each field is checked.
#[derive(Debug, Default)]
pub struct FieldRules {
    errors: Vec<FieldError>,
}

impl FieldRules {
    /// Check that `value` is present and not blank, returning it trimmed.
    pub fn non_empty(&mut self, field: &str, value: Option<String>, message: &str) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_owned()),
            _ => self.reject(field, message),
        }
    }

    /// Check that `value` is present and at least `min`.
    pub fn at_least(&mut self, field: &str, value: Option<f64>, min: f64, message: &str) -> Option<f64> {
        match value {
            Some(number) if number.is_finite() && number >= min => Some(number),
            _ => self.reject(field, message),
        }
    }

    /// Check that `value` names a member of the category set `C`.
    pub fn category<C: FromStr>(&mut self, field: &str, value: Option<String>) -> Option<C> {
        match value.as_deref().map(str::trim) {
            None | Some("") => self.reject(field, "Category is required"),
            Some(text) => match text.parse() {
                Ok(category) => Some(category),
                Err(_) => self.reject(field, &format!("\"{text}\" is not a valid category")),
            },
        }
    }

    /// The errors found so far.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn reject<T>(&mut self, field: &str, message: &str) -> Option<T> {
        self.errors.push(FieldError::new(field, message));
        None
    }
}

/// Trim an optional free-text field, treating blank text as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
