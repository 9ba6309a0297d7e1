//! Error taxonomy for calls against the inventory API
//!
//! Every remote failure is classified into exactly one of three kinds:
//! the resource is gone ([`ApiError::NotFound`]), the server rejected the
//! submitted fields ([`ApiError::ValidationFailed`]), or anything else
//! ([`ApiError::ServerError`]), including transport failures.

use miette::Diagnostic;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Field name to ordered list of messages, in the order the server sent them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, messages)| messages.is_empty())
    }

    pub fn messages_for(&self, field: &str) -> &[String] {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }

    /// All messages flattened into one display string
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// Servers occasionally send a bare string instead of a list
#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorsVisitor;

        impl<'de> Visitor<'de> for FieldErrorsVisitor {
            type Value = FieldErrors;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of field names to message lists")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldErrors::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut errors = Vec::new();
                while let Some((field, messages)) = access.next_entry::<String, Messages>()? {
                    let messages = match messages {
                        Messages::One(message) => vec![message],
                        Messages::Many(messages) => messages,
                    };
                    errors.push((field, messages));
                }
                Ok(FieldErrors(errors))
            }
        }

        deserializer.deserialize_any(FieldErrorsVisitor)
    }
}

/// A classified failure from the inventory API
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum ApiError {
    #[error("not found{}", suffix(.message))]
    #[diagnostic(
        code(stockpile::api::not_found),
        help("the item may have been deleted; run `stockpile list` to see what exists")
    )]
    NotFound { message: Option<String> },

    #[error("validation failed: {}", validation_summary(.message, .errors))]
    #[diagnostic(code(stockpile::api::validation_failed))]
    ValidationFailed {
        message: Option<String>,
        errors: FieldErrors,
    },

    #[error("server error{}{}", status_suffix(.status), suffix(.message))]
    #[diagnostic(
        code(stockpile::api::server_error),
        help("check that the API is reachable and retry")
    )]
    ServerError {
        /// `None` when no response arrived at all
        status: Option<u16>,
        message: Option<String>,
    },
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

fn validation_summary(message: &Option<String>, errors: &FieldErrors) -> String {
    if errors.is_empty() {
        message.clone().unwrap_or_else(|| "rejected by server".to_string())
    } else {
        errors.joined()
    }
}

impl ApiError {
    pub fn server(status: Option<u16>, message: Option<String>) -> Self {
        ApiError::ServerError { status, message }
    }

    /// The server-supplied `message`, if the response carried one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message }
            | ApiError::ValidationFailed { message, .. }
            | ApiError::ServerError { message, .. } => message.as_deref(),
        }
    }

    /// Readable message for the operator: the server's own message when it
    /// sent one, otherwise `default`
    pub fn user_message(&self, default: &str) -> String {
        match self {
            ApiError::ValidationFailed { errors, .. } if !errors.is_empty() => errors.joined(),
            _ => self
                .server_message()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(default)
                .to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Only unknown/transient failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ServerError {
            status: err.status().map(|s| s.as_u16()),
            message: None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
