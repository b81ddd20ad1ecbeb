//! Detection of provider usage-limit messages
//!
//! Providers report exhausted quotas as ordinary errors whose text reads like
//! "you have reached the limit of N requests ... please wait until ...". Those
//! are shown as a dedicated prompt rather than a generic failure.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RATE_LIMIT_RE: Regex =
        Regex::new(r"(?is)limit\s+of.*wait\s+until").expect("valid regex");
}

/// Whether `text` is a usage-limit message
pub fn is_rate_limit_message(text: &str) -> bool {
    RATE_LIMIT_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_case_insensitively() {
        assert!(is_rate_limit_message(
            "You have reached the LIMIT OF 5 messages. Please Wait Until 10:00."
        ));
    }

    #[test]
    fn test_requires_both_phrases_in_order() {
        assert!(!is_rate_limit_message("limit of 5 messages"));
        assert!(!is_rate_limit_message("wait until tomorrow"));
        assert!(!is_rate_limit_message("wait until the limit of 5 resets"));
    }

    #[test]
    fn test_spans_lines() {
        assert!(is_rate_limit_message("limit of 3\nrequests reached, wait until noon"));
    }
}
