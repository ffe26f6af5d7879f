//! Handle normalization
//!
//! A handle is rendered five ways before matching, each one undoing a
//! different evasion trick: casing, separators, padding digits and leet-speak.

use crate::leet::LeetTable;

/// Characters treated as word separators inside a handle
const SEPARATORS: &[char] = &['_', '-', '.'];

/// Number of variants produced for every handle
pub const VARIANT_COUNT: usize = 5;

/// The fixed set of renderings derived from one handle
///
/// Order is stable: `clean`, `no_separators`, `no_digits`, `leet_decoded`,
/// `leet_no_separators`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    variants: [String; VARIANT_COUNT],
}

impl VariantSet {
    /// Derive the variants of `handle` using `leet` for decoding
    pub fn new(handle: &str, leet: &LeetTable) -> Self {
        let clean = strip_handle(handle);
        let no_separators: String = clean.chars().filter(|c| !SEPARATORS.contains(c)).collect();
        let no_digits: String = clean.chars().filter(|c| !c.is_ascii_digit()).collect();
        let leet_decoded = leet.decode(&clean);
        let leet_no_separators = leet.decode(&no_separators);

        Self {
            variants: [clean, no_separators, no_digits, leet_decoded, leet_no_separators],
        }
    }

    /// The handle without its `@` prefix, lowercased
    pub fn clean(&self) -> &str {
        &self.variants[0]
    }

    /// `clean` with `_`, `-` and `.` removed
    pub fn no_separators(&self) -> &str {
        &self.variants[1]
    }

    /// `clean` with ASCII digits removed
    pub fn no_digits(&self) -> &str {
        &self.variants[2]
    }

    /// `clean` after leet decoding
    pub fn leet_decoded(&self) -> &str {
        &self.variants[3]
    }

    /// `no_separators` after leet decoding
    pub fn leet_no_separators(&self) -> &str {
        &self.variants[4]
    }

    /// Iterate over all variants in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    /// Consume the set, returning the variants in order
    pub fn into_array(self) -> [String; VARIANT_COUNT] {
        self.variants
    }
}

/// Normalize a handle into its variant strings
pub fn normalize(handle: &str, leet: &LeetTable) -> [String; VARIANT_COUNT] {
    VariantSet::new(handle, leet).into_array()
}

/// Remove one leading `@` and lowercase
fn strip_handle(handle: &str) -> String {
    handle.strip_prefix('@').unwrap_or(handle).to_lowercase()
}
