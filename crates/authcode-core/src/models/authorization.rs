use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof that a specific client completed the authorization step.
///
/// No expiry is tracked; `issued_at` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub issued_at: DateTime<Utc>,
}

impl AuthorizationCode {
    pub fn new(code: String, client_id: String, redirect_uri: String) -> Self {
        Self {
            code,
            client_id,
            redirect_uri,
            issued_at: Utc::now(),
        }
    }

    pub fn is_bound_to(&self, client_id: &str) -> bool {
        self.client_id == client_id
    }

    /// Location the user agent is sent to after a successful authorization.
    pub fn redirect_target(&self) -> String {
        append_code_to_redirect(&self.redirect_uri, &self.code)
    }
}

/// Whether a redeemed code stays in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeRedemption {
    /// The code is removed in the same critical section that validates it and stores the token.
    #[default]
    SingleUse,
    /// The code stays redeemable indefinitely. Not compliant with RFC 6749 §4.1.2.
    Reusable,
}

/// Append `code=<code>` to the query of `redirect_uri`, keeping the URI otherwise verbatim.
///
/// The parameter goes before any `#fragment`.
pub fn append_code_to_redirect(redirect_uri: &str, code: &str) -> String {
    let (base, fragment) = match redirect_uri.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (redirect_uri, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{base}{separator}code={code}#{fragment}"),
        None => format!("{base}{separator}code={code}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_appends_code_as_first_query_parameter() {
        assert_eq!(
            append_code_to_redirect("https://app.example/cb", "abcDEF0123"),
            "https://app.example/cb?code=abcDEF0123"
        );
    }

    #[test]
    fn redirect_preserves_existing_query() {
        assert_eq!(
            append_code_to_redirect("https://app.example/cb?tenant=7", "X"),
            "https://app.example/cb?tenant=7&code=X"
        );
    }

    #[test]
    fn redirect_keeps_code_out_of_fragment() {
        assert_eq!(
            append_code_to_redirect("https://x/cb#f", "X"),
            "https://x/cb?code=X#f"
        );
        assert_eq!(
            append_code_to_redirect("https://x/cb?a=1#f?b=2", "X"),
            "https://x/cb?a=1&code=X#f?b=2"
        );
    }

    #[test]
    fn redirect_target_uses_stored_uri_and_code() {
        let code = AuthorizationCode::new(
            "abc".into(),
            "my_client_id".into(),
            "https://x".into(),
        );
        assert_eq!(code.redirect_target(), "https://x?code=abc");
        assert!(code.is_bound_to("my_client_id"));
        assert!(!code.is_bound_to("other"));
    }

    #[test]
    fn single_use_is_the_default_policy() {
        assert_eq!(CodeRedemption::default(), CodeRedemption::SingleUse);
    }
}
