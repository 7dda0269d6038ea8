use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::AccessToken;

pub const SECURE_DATA: &str = "secure data";

/// Successful token endpoint body.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
        }
    }
}

/// Fixed payload of the protected resource.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceResponse {
    pub data: String,
}

impl ResourceResponse {
    pub fn secure_data() -> Self {
        Self {
            data: SECURE_DATA.to_string(),
        }
    }
}

/// Echo returned by the diagnostic callback endpoint.
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackResponse {
    pub code: String,
}
