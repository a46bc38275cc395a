//! Dashboard password handling.
//!
//! Passwords are stored as bcrypt hashes and checked with bcrypt's own
//! constant-time verification. Generated passwords follow the memorable
//! `{project-slug}-{4 digits}` shape so an operator can read one over the
//! phone.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::Rng;

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Checks a supplied password against a stored hash. Hash-parse failures
/// count as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

/// Generates a dashboard password like "acme-site-7421".
pub fn generate_dashboard_password(project_slug: &str) -> String {
    let digits: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}-{:04}", project_slug, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("maple-7421").unwrap();
        assert!(verify_password("maple-7421", &hashed));
        assert!(!verify_password("maple-0000", &hashed));
    }

    #[test]
    fn stored_value_is_not_plaintext() {
        let hashed = hash_password("maple-7421").unwrap();
        assert_ne!(hashed, "maple-7421");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn generated_password_shape() {
        let pw = generate_dashboard_password("acme-site");
        let suffix = pw.strip_prefix("acme-site-").unwrap();
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
