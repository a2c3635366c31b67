use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;

/// The size of the refresh token secret in bytes.
const REFRESH_TOKEN_SIZE: usize = 64;

/// Generates a new opaque refresh token.
///
/// # Returns
///
/// A URL-safe base64-encoded token carrying 64 bytes of OS entropy. The
/// token has no internal structure and is never decoded.
pub fn generate() -> String {
    let mut token = [0u8; REFRESH_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_86_chars() {
        // 64 bytes -> ceil(64 * 4 / 3) unpadded base64 chars.
        assert_eq!(generate().len(), 86);
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = generate();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }
}
