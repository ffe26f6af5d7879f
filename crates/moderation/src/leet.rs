//! Leet-speak decoding
//!
//! Maps digits and symbols that people use in place of letters back to the
//! letter they stand for, one character at a time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Substitutions shipped with the default policy
const DEFAULT_SUBSTITUTIONS: &[(char, char)] = &[
    ('0', 'o'),
    ('1', 'i'),
    ('!', 'i'),
    ('3', 'e'),
    ('4', 'a'),
    ('@', 'a'),
    ('5', 's'),
    ('$', 's'),
    ('7', 't'),
    ('8', 'b'),
    ('9', 'g'),
    ('|', 'l'),
    ('+', 't'),
];

/// Character substitution table for leet-speak decoding
///
/// Each entry maps exactly one character to exactly one character. Anything
/// not in the table decodes to itself, so [`LeetTable::decode`] is total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeetTable {
    substitutions: BTreeMap<char, char>,
}

impl Default for LeetTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_SUBSTITUTIONS.iter().copied())
    }
}

impl LeetTable {
    /// Create an empty table (decoding is the identity)
    pub fn empty() -> Self {
        Self {
            substitutions: BTreeMap::new(),
        }
    }

    /// Build a table from `(from, to)` pairs; later pairs win
    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            substitutions: pairs.into_iter().collect(),
        }
    }

    /// Add or replace a substitution
    pub fn insert(&mut self, from: char, to: char) {
        self.substitutions.insert(from, to);
    }

    /// Look up the replacement for a single character
    pub fn substitute(&self, c: char) -> char {
        self.substitutions.get(&c).copied().unwrap_or(c)
    }

    /// Decode a string character by character
    pub fn decode(&self, input: &str) -> String {
        input.chars().map(|c| self.substitute(c)).collect()
    }

    /// Number of substitutions in the table
    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    /// Check if the table has no substitutions
    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    /// Iterate over `(from, to)` pairs in character order
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.substitutions.iter().map(|(from, to)| (*from, *to))
    }
}
