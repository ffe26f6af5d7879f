//! Blocklist matching for handles
//!
//! This module tests the normalized variants of a handle against two term
//! lists supplied by the caller:
//!
//! - **Exact terms** must equal a whole variant. Short words that appear
//!   inside ordinary words (`ass` in `classes`) belong here.
//! - **Substring terms** may appear anywhere inside a variant.
//!
//! Matching runs three passes in priority order and stops at the first hit:
//! exact, substring, then substring again on variants with repeated
//! characters collapsed (`fuuuck` → `fuck`).
//!
//! Substring matching over-blocks on purpose. `hancock` and `scunthorpe`
//! are rejected, and that is accepted policy rather than a bug.

use crate::leet::LeetTable;
use crate::normalize::VariantSet;
use serde::{Deserialize, Serialize};

/// Reason reported for every blocklist hit
pub const REASON_INAPPROPRIATE: &str = "inappropriate language";

/// Terms that only match a whole variant
const DEFAULT_EXACT_TERMS: &[&str] = &[
    "ass", "arse", "anal", "cum", "fag", "hoe", "piss", "porn", "sex", "tit", "tits",
];

/// Terms that match anywhere inside a variant
const DEFAULT_SUBSTRING_TERMS: &[&str] = &[
    "fuck", "shit", "cunt", "cock", "dick", "bitch", "pussy", "whore", "slut", "twat", "wank",
    "bastard", "faggot", "nigger", "nigga", "retard", "dildo", "jizz", "penis", "vagina",
];

/// Outcome of checking one handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    /// Whether the handle passed every pass
    pub is_clean: bool,
    /// Why the handle was rejected
    pub reason: Option<String>,
    /// Blocklist entry that matched
    pub matched_word: Option<String>,
}

impl ModerationVerdict {
    /// A verdict for a handle with no matches
    pub fn clean() -> Self {
        Self {
            is_clean: true,
            reason: None,
            matched_word: None,
        }
    }

    /// A verdict for a handle that matched `term`
    pub fn blocked(term: impl Into<String>) -> Self {
        Self {
            is_clean: false,
            reason: Some(REASON_INAPPROPRIATE.to_string()),
            matched_word: Some(term.into()),
        }
    }
}

/// Exact and substring term lists
///
/// Terms are expected in lowercase; the lists should not share entries.
/// [`crate::ModerationPolicy::from_json`] enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blocklist {
    /// Terms that must equal a variant
    #[serde(default)]
    pub exact: Vec<String>,
    /// Terms that may appear anywhere in a variant
    #[serde(default)]
    pub substring: Vec<String>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self {
            exact: DEFAULT_EXACT_TERMS.iter().map(|t| t.to_string()).collect(),
            substring: DEFAULT_SUBSTRING_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Blocklist {
    /// Create a blocklist from explicit term lists
    pub fn new<E, S>(exact: E, substring: S) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            substring: substring.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a blocklist with no terms
    pub fn empty() -> Self {
        Self {
            exact: Vec::new(),
            substring: Vec::new(),
        }
    }

    /// Check a handle against this blocklist
    pub fn check(&self, handle: &str, leet: &LeetTable) -> ModerationVerdict {
        let variants = VariantSet::new(handle, leet);

        let verdict = self
            .exact_match(&variants)
            .or_else(|| self.substring_match(variants.iter()))
            .or_else(|| {
                let collapsed: Vec<String> = variants.iter().map(collapse_repeats).collect();
                self.substring_match(collapsed.iter().map(String::as_str))
            })
            .map(ModerationVerdict::blocked)
            .unwrap_or_else(ModerationVerdict::clean);

        match &verdict.matched_word {
            Some(term) => tracing::debug!(handle, term = term.as_str(), "handle matched blocklist"),
            None => tracing::debug!(handle, "handle passed blocklist"),
        }

        verdict
    }

    fn exact_match(&self, variants: &VariantSet) -> Option<&str> {
        variants
            .iter()
            .filter(|variant| !variant.is_empty())
            .find_map(|variant| {
                self.exact
                    .iter()
                    .find(|term| !term.is_empty() && term.as_str() == variant)
            })
            .map(String::as_str)
    }

    fn substring_match<'a>(&self, variants: impl Iterator<Item = &'a str>) -> Option<&str> {
        let mut variants = variants.filter(|variant| !variant.is_empty());
        variants
            .find_map(|variant| {
                self.substring
                    .iter()
                    .find(|term| !term.is_empty() && variant.contains(term.as_str()))
            })
            .map(String::as_str)
    }
}

/// Reduce every run of identical consecutive characters to one
pub fn collapse_repeats(input: &str) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    chars.dedup();
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(handle: &str) -> ModerationVerdict {
        Blocklist::default().check(handle, &LeetTable::default())
    }

    #[test]
    fn test_collapse_repeats() {
        assert_eq!(collapse_repeats("fuuuck"), "fuck");
        assert_eq!(collapse_repeats("sshiiit"), "shit");
        assert_eq!(collapse_repeats("aabbaa"), "aba");
        assert_eq!(collapse_repeats(""), "");
        assert_eq!(collapse_repeats("abc"), "abc");
    }

    #[test]
    fn test_plain_profanity_blocked() {
        let verdict = check("@fuck");
        assert!(!verdict.is_clean);
        assert_eq!(verdict.reason.as_deref(), Some(REASON_INAPPROPRIATE));
        assert_eq!(verdict.matched_word.as_deref(), Some("fuck"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(!check("@FUCK").is_clean);
        assert!(!check("@ShIt").is_clean);
    }

    #[test]
    fn test_leet_evasion_blocked() {
        assert!(!check("@sh1t").is_clean);
        assert!(!check("@$h!t").is_clean);
        assert!(!check("@d1ck").is_clean);
    }

    #[test]
    fn test_separator_evasion_blocked() {
        assert!(!check("@f_u_c_k").is_clean);
        assert!(!check("@s.h-i_t").is_clean);
        assert!(!check("@d-1-c-k").is_clean);
    }

    #[test]
    fn test_digit_padding_blocked() {
        assert!(!check("@a2s3s").is_clean);
    }

    #[test]
    fn test_repeated_character_evasion_blocked() {
        let verdict = check("@fuuuuck");
        assert!(!verdict.is_clean);
        assert_eq!(verdict.matched_word.as_deref(), Some("fuck"));
        assert!(!check("@sshiiit").is_clean);
    }

    #[test]
    fn test_accepted_false_positives() {
        assert_eq!(check("@hancock").matched_word.as_deref(), Some("cock"));
        assert_eq!(check("@scunthorpe").matched_word.as_deref(), Some("cunt"));
    }

    #[test]
    fn test_exact_only_terms_do_not_match_inside_words() {
        assert!(check("@classes").is_clean);
        assert!(check("@thebassplayer").is_clean);
        assert!(!check("@ass").is_clean);
        assert!(!check("@A55").is_clean);
    }

    #[test]
    fn test_clean_handles() {
        for handle in ["@alice", "@coolhandle", "@sunny_day", "@j.smith", "@gamer2024", "bob"] {
            let verdict = check(handle);
            assert_eq!(verdict, ModerationVerdict::clean(), "{handle} should be clean");
        }
    }

    #[test]
    fn test_empty_input_is_clean() {
        assert!(check("").is_clean);
        assert!(check("@").is_clean);
    }

    #[test]
    fn test_exact_pass_wins_over_substring_pass() {
        let blocklist = Blocklist::new(["badword"], ["bad"]);
        let verdict = blocklist.check("@badword", &LeetTable::empty());
        assert_eq!(verdict.matched_word.as_deref(), Some("badword"));
    }

    #[test]
    fn test_empty_terms_never_match() {
        let blocklist = Blocklist::new([""], [""]);
        assert!(blocklist.check("@anything", &LeetTable::default()).is_clean);
    }

    #[test]
    fn test_empty_blocklist_allows_everything() {
        assert!(Blocklist::empty().check("@fuck", &LeetTable::default()).is_clean);
    }

    #[test]
    fn test_custom_leet_table_is_used() {
        let blocklist = Blocklist::new(Vec::<String>::new(), ["word"]);
        assert!(blocklist.check("@w0rd", &LeetTable::empty()).is_clean);
        assert!(!blocklist.check("@w0rd", &LeetTable::default()).is_clean);
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(check("@$h!t"), check("@$h!t"));
        assert_eq!(check("@alice"), check("@alice"));
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&ModerationVerdict::blocked("fuck")).unwrap();
        assert_eq!(
            json,
            r#"{"isClean":false,"reason":"inappropriate language","matchedWord":"fuck"}"#
        );

        let json = serde_json::to_string(&ModerationVerdict::clean()).unwrap();
        assert_eq!(json, r#"{"isClean":true,"reason":null,"matchedWord":null}"#);
    }
}
