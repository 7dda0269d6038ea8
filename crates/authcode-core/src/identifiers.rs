//! Opaque identifier generation for authorization codes and access tokens.
//!
//! Identifiers are drawn uniformly, with replacement, from the 62-character
//! alphanumeric alphabet using the thread-local CSPRNG from `rand`.

use rand::Rng;

/// `a-z`, `A-Z`, `0-9`.
pub const IDENTIFIER_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const AUTHORIZATION_CODE_LENGTH: usize = 10;
pub const ACCESS_TOKEN_LENGTH: usize = 20;

/// Generate a random alphanumeric identifier of exactly `len` characters.
pub fn generate_identifier(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..IDENTIFIER_ALPHABET.len());
            IDENTIFIER_ALPHABET[idx] as char
        })
        .collect()
}

pub fn generate_authorization_code() -> String {
    generate_identifier(AUTHORIZATION_CODE_LENGTH)
}

pub fn generate_access_token() -> String {
    generate_identifier(ACCESS_TOKEN_LENGTH)
}

/// True when `value` has exactly `len` characters, all from the identifier alphabet.
pub fn is_well_formed_identifier(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn authorization_codes_have_fixed_length_and_alphabet() {
        for _ in 0..200 {
            let code = generate_authorization_code();
            assert_eq!(code.len(), AUTHORIZATION_CODE_LENGTH);
            assert!(is_well_formed_identifier(&code, AUTHORIZATION_CODE_LENGTH));
        }
    }

    #[test]
    fn access_tokens_have_fixed_length_and_alphabet() {
        for _ in 0..200 {
            let token = generate_access_token();
            assert_eq!(token.len(), ACCESS_TOKEN_LENGTH);
            assert!(token.bytes().all(|b| IDENTIFIER_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_identifiers_do_not_repeat_at_small_scale() {
        let tokens: HashSet<String> = (0..1_000).map(|_| generate_access_token()).collect();
        assert_eq!(tokens.len(), 1_000);
    }

    #[test]
    fn alphabet_covers_all_three_character_classes() {
        let seen: HashSet<u8> = (0..50)
            .flat_map(|_| generate_identifier(64).into_bytes())
            .collect();
        assert!(seen.iter().any(u8::is_ascii_lowercase));
        assert!(seen.iter().any(u8::is_ascii_uppercase));
        assert!(seen.iter().any(u8::is_ascii_digit));
    }

    #[test]
    fn well_formed_check_rejects_foreign_characters() {
        assert!(!is_well_formed_identifier("garbage-token", 13));
        assert!(!is_well_formed_identifier("abc", 10));
        assert!(is_well_formed_identifier("abcDEF0123", 10));
    }

    #[test]
    fn zero_length_identifier_is_empty() {
        assert!(generate_identifier(0).is_empty());
    }
}
