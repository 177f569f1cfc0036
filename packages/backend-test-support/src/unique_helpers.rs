//! Test helpers for generating unique test data
//!
//! Uses ULIDs so tests sharing a store never collide on provider subjects or
//! email addresses.

use ulid::Ulid;

/// Generate a unique provider subject id.
///
/// The result only contains characters accepted by the canonical user id
/// grammar (`[A-Za-z0-9_-]`).
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_subject;
///
/// let a = unique_subject("sub");
/// let b = unique_subject("sub");
/// assert_ne!(a, b);
/// assert!(a.starts_with("sub-"));
/// ```
pub fn unique_subject(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique, lower-case email address with the given prefix.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("test");
/// assert!(email.ends_with("@example.test"));
/// assert_eq!(email, email.to_lowercase());
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
