use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 12;

/// Stable short identifier for a bearer token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = token_fingerprint("secret-token");
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert_eq!(a, token_fingerprint("secret-token"));
        assert_ne!(a, token_fingerprint("secret-token2"));
        assert!(!a.contains("secret"));
    }
}
