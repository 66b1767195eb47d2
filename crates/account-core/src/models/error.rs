use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "actix")]
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Error shape shared by every layer of the Account App.
///
/// It follows the OAuth error object (`error` + optional `error_description`) so
/// JSON error bodies look the same as the rest of the OAuth surface.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountError {
    pub error: String,
    pub error_description: Option<String>,
}

impl AccountError {
    pub fn new(error: &str, description: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description.map(|s| s.to_string()),
        }
    }

    pub fn invalid_request(description: &str) -> Self {
        Self::new("invalid_request", Some(description))
    }

    pub fn unauthorized(description: &str) -> Self {
        Self::new("unauthorized", Some(description))
    }

    pub fn not_found(description: &str) -> Self {
        Self::new("not_found", Some(description))
    }

    pub fn server_error(description: &str) -> Self {
        Self::new("server_error", Some(description))
    }

    pub fn unavailable(description: &str) -> Self {
        Self::new("temporarily_unavailable", Some(description))
    }
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for AccountError {}

#[cfg(feature = "actix")]
impl ResponseError for AccountError {
    fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "not_found" => StatusCode::NOT_FOUND,
            "server_error" => StatusCode::INTERNAL_SERVER_ERROR,
            "temporarily_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        // Provide a stable, non-leaky mapping for common constraint violations.
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code().unwrap_or_default();
            let msg = db_err.message();

            // Postgres unique violation: 23505
            // SQLite reports extended codes 2067/1555; also match by message.
            let is_unique = code == "23505"
                || code == "2067"
                || code == "1555"
                || msg.contains("UNIQUE constraint failed")
                || msg.contains("duplicate key");

            if is_unique {
                return Self::invalid_request("duplicate key");
            }
        }

        Self::server_error(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_description_when_present() {
        let err = AccountError::invalid_request("missing username");
        assert_eq!(err.to_string(), "invalid_request: missing username");

        let bare = AccountError::new("server_error", None);
        assert_eq!(bare.to_string(), "server_error");
    }

    #[cfg(feature = "actix")]
    #[test]
    fn maps_error_kinds_to_http_status() {
        assert_eq!(
            AccountError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::server_error("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AccountError::unavailable("x").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AccountError::invalid_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
