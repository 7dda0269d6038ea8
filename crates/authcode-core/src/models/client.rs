use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered application allowed to request grants.
///
/// Clients are created once at bootstrap. The secret is stored but not checked during
/// the code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub client_secret: String,
    /// Optional allow-list. Empty means any `redirect_uri` is accepted.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(client_id: String, client_secret: String, redirect_uris: Vec<String>) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uris,
            created_at: Utc::now(),
        }
    }

    pub fn validate_redirect_uri(&self, uri: &str) -> bool {
        self.redirect_uris.is_empty() || self.redirect_uris.iter().any(|u| u == uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_accepts_any_redirect() {
        let client = Client::new("c".into(), "s".into(), vec![]);
        assert!(client.validate_redirect_uri("https://anything.example/cb"));
        assert!(client.validate_redirect_uri(""));
    }

    #[test]
    fn allow_list_requires_exact_match() {
        let client = Client::new(
            "c".into(),
            "s".into(),
            vec!["https://good.example/cb".into()],
        );
        assert!(client.validate_redirect_uri("https://good.example/cb"));
        assert!(!client.validate_redirect_uri("https://good.example/cb/"));
        assert!(!client.validate_redirect_uri("https://evil.example/cb"));
    }
}
