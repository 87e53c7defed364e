// Cryptographic utilities for generating anti-forgery tokens

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Bytes of entropy in an OAuth `state` value
pub const CSRF_TOKEN_BYTES: usize = 24;

/// Generate a cryptographically secure CSRF token
///
/// 24 bytes (192 bits) of entropy, `Base64URL` encoded without padding,
/// which keeps the value at 32 URL-safe characters.
#[must_use]
pub fn generate_csrf_token() -> String {
    let mut nonce = [0u8; CSRF_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut nonce);
    general_purpose::URL_SAFE_NO_PAD.encode(nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_csrf_token_shape() {
        let token = generate_csrf_token();
        assert_eq!(token.len(), 32);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(
            general_purpose::URL_SAFE_NO_PAD.decode(&token).unwrap().len(),
            CSRF_TOKEN_BYTES
        );
    }

    #[test]
    fn test_csrf_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_csrf_token()).collect();
        assert_eq!(tokens.len(), 100);
    }
}
