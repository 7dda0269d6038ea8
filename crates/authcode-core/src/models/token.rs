use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// An opaque bearer credential issued to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(access_token: String, client_id: String) -> Self {
        Self {
            access_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            client_id,
            issued_at: Utc::now(),
        }
    }
}
