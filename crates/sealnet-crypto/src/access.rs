//! Access-key allow-list.
//!
//! A stub gate for sensitive operations: exact, case-sensitive membership of
//! an opaque credential. No normalization, rate limiting or expiry.

use std::collections::HashSet;

use crate::cipher::generate_random;
use crate::format::base64_encode;

/// Length of generated access keys in characters.
pub const ACCESS_KEY_LEN: usize = 32;

/// Exact-match membership test.
pub fn is_authorized(credential: &str, allowed: &HashSet<String>) -> bool {
    allowed.contains(credential)
}

/// Configured set of accepted credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    allowed: HashSet<String>,
}

impl AccessPolicy {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_authorized(&self, credential: &str) -> bool {
        is_authorized(credential, &self.allowed)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Generate a new random access key (base64 text, 32 characters).
pub fn generate_access_key() -> String {
    let mut key = base64_encode(&generate_random::<32>());
    key.truncate(ACCESS_KEY_LEN);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> HashSet<String> {
        ["SECRETKEY123", "X"].into_iter().map(String::from).collect()
    }

    #[test]
    fn test_member_is_authorized() {
        assert!(is_authorized("SECRETKEY123", &allowed()));
        assert!(is_authorized("X", &allowed()));
    }

    #[test]
    fn test_non_member_is_rejected() {
        assert!(!is_authorized("other", &allowed()));
        assert!(!is_authorized("", &allowed()));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_authorized("secretkey123", &allowed()));
        assert!(!is_authorized("x", &allowed()));
    }

    #[test]
    fn test_no_substring_or_whitespace_match() {
        assert!(!is_authorized("SECRETKEY", &allowed()));
        assert!(!is_authorized("SECRETKEY1234", &allowed()));
        assert!(!is_authorized(" SECRETKEY123", &allowed()));
        assert!(!is_authorized("SECRETKEY123\n", &allowed()));
    }

    #[test]
    fn test_policy_wraps_allow_list() {
        let policy = AccessPolicy::new(["DOC001", "SECRETKEY123", "SUMMARY_ACCESS_777"]);
        assert_eq!(policy.len(), 3);
        assert!(policy.is_authorized("SUMMARY_ACCESS_777"));
        assert!(!policy.is_authorized("SUMMARY_ACCESS"));
    }

    #[test]
    fn test_empty_policy_rejects_everything() {
        let policy = AccessPolicy::default();
        assert!(policy.is_empty());
        assert!(!policy.is_authorized(""));
    }

    #[test]
    fn test_generate_access_key() {
        let k1 = generate_access_key();
        let k2 = generate_access_key();
        assert_eq!(k1.len(), ACCESS_KEY_LEN);
        assert_ne!(k1, k2);

        let policy = AccessPolicy::new([k1.clone()]);
        assert!(policy.is_authorized(&k1));
        assert!(!policy.is_authorized(&k2));
    }
}
