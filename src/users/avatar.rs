use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";
const SIZE: &str = "200";
const RATING: &str = "pg";
const DEFAULT_IMAGE: &str = "mm";

/// Gravatar URL for an email: 200px, PG rating, "mystery man" fallback.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!(
        "{GRAVATAR_BASE}/{}?s={SIZE}&r={RATING}&d={DEFAULT_IMAGE}",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_email_same_url() {
        assert_eq!(gravatar_url("a@x.com"), gravatar_url("a@x.com"));
        assert_eq!(gravatar_url("  A@X.com "), gravatar_url("a@x.com"));
    }

    #[test]
    fn different_emails_different_urls() {
        assert_ne!(gravatar_url("a@x.com"), gravatar_url("b@x.com"));
    }

    #[test]
    fn carries_fixed_parameters() {
        let url = gravatar_url("a@x.com");
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
        let hash = url
            .trim_start_matches("https://www.gravatar.com/avatar/")
            .split('?')
            .next()
            .unwrap();
        assert_eq!(hash.len(), 64);
    }
}
