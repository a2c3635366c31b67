use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes a password for storage.
///
/// # Arguments
///
/// * `plaintext` - The password as entered by the user.
///
/// # Returns
///
/// The lowercase hex SHA-256 digest of the password. The digest is
/// deterministic: the same input always produces the same output, which is
/// what lets credential lookup compare digests directly.
pub fn digest(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    hex::encode(digest)
}

/// Compares two stored digests in constant time.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
