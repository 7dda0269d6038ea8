use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[cfg(feature = "actix")]
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};

pub const INVALID_REQUEST: &str = "invalid_request";
pub const INVALID_CLIENT: &str = "invalid_client";
pub const INVALID_GRANT: &str = "invalid_grant";
pub const INVALID_TOKEN: &str = "invalid_token";
pub const UNSUPPORTED_GRANT_TYPE: &str = "unsupported_grant_type";
pub const UNSUPPORTED_RESPONSE_TYPE: &str = "unsupported_response_type";
pub const SERVER_ERROR: &str = "server_error";

const DUPLICATE_KEY: &str = "duplicate key";

/// Wire-level error returned by every declined operation.
///
/// Serialises as the RFC 6749 error object; unset optional members are omitted so a
/// bare failure renders as `{"error":"invalid_client"}` plus a description.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OAuth2Error {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

impl OAuth2Error {
    pub fn new(error: &str, description: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description.map(|s| s.to_string()),
            error_uri: None,
        }
    }

    pub fn invalid_request(description: &str) -> Self {
        Self::new(INVALID_REQUEST, Some(description))
    }

    /// Unrecognized client identifier at authorization time.
    pub fn invalid_client(description: &str) -> Self {
        Self::new(INVALID_CLIENT, Some(description))
    }

    /// Unknown code, or a code bound to another client, at exchange time.
    pub fn invalid_grant(description: &str) -> Self {
        Self::new(INVALID_GRANT, Some(description))
    }

    /// Unrecognized bearer credential at resource-access time.
    pub fn invalid_token(description: &str) -> Self {
        Self::new(INVALID_TOKEN, Some(description))
    }

    pub fn unsupported_grant_type(description: &str) -> Self {
        Self::new(UNSUPPORTED_GRANT_TYPE, Some(description))
    }

    pub fn unsupported_response_type(description: &str) -> Self {
        Self::new(UNSUPPORTED_RESPONSE_TYPE, Some(description))
    }

    pub fn server_error(description: &str) -> Self {
        Self::new(SERVER_ERROR, Some(description))
    }

    /// Raised by registries refusing to overwrite an existing key.
    pub fn duplicate_key() -> Self {
        Self::invalid_request(DUPLICATE_KEY)
    }

    pub fn is_duplicate_key(&self) -> bool {
        self.error == INVALID_REQUEST && self.error_description.as_deref() == Some(DUPLICATE_KEY)
    }
}

impl fmt::Display for OAuth2Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuth2Error {}

#[cfg(feature = "actix")]
impl ResponseError for OAuth2Error {
    fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            INVALID_TOKEN => StatusCode::UNAUTHORIZED,
            SERVER_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if self.error == INVALID_TOKEN {
            builder.insert_header((
                header::WWW_AUTHENTICATE,
                format!("Bearer error=\"{}\"", INVALID_TOKEN),
            ));
        }
        builder.json(self)
    }
}
