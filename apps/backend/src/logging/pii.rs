//! Redaction of personal data and credentials in log output.

use std::fmt;

use lazy_regex::{regex, Captures};

/// Mask emails and opaque credentials in free text.
///
/// - emails keep the first character of the local part and the full domain
/// - compact JWTs become `[REDACTED_JWT]`
/// - other base64/base64url/hex runs of 16+ characters become `[REDACTED_TOKEN]`
pub fn redact(input: &str) -> String {
    let emails = regex!(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").replace_all(
        input,
        |caps: &Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) if !local.is_empty() => {
                    format!("{}***@{domain}", &local[..1])
                }
                _ => full.to_string(),
            }
        },
    );

    let jwts = regex!(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]+")
        .replace_all(&emails, "[REDACTED_JWT]");

    regex!(r"\b[A-Za-z0-9+/_-]{16,}={0,2}")
        .replace_all(&jwts, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that redacts on formatting.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
