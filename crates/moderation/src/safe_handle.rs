//! Fallback handle generation
//!
//! When an account keeps choosing blocked handles, it is given a neutral one
//! derived from its display name. The same name always yields the same
//! handle, so retries and support lookups are reproducible.

/// Suffix appended to every generated handle
const HANDLE_SUFFIX: &str = "123";

/// Name used when the display name has nothing usable
const FALLBACK_NAME: &str = "user";

/// Letters kept from the last name
const LAST_NAME_LETTERS: usize = 4;

/// Letters kept from the first name when there is no last name
const FIRST_NAME_LETTERS: usize = 5;

/// Derive a neutral replacement handle from a display name
///
/// `"John Smith"` becomes `@jsmit123`: the first initial followed by up to
/// four letters of the last name. A single name keeps up to five of its own
/// letters (`"Madonna"` → `@madon123`). Non-letters are ignored, and a name
/// with no letters at all falls back to `@user123`.
///
/// The initial is the first ASCII letter of the first name rather than its
/// first character, so `"42 Smith"` gives `@smit123`, not `@4smit123`.
///
/// # Example
///
/// ```
/// use moderation::generate_safe_handle;
///
/// assert_eq!(generate_safe_handle("Jane Doe"), "@jdoe123");
/// assert_eq!(generate_safe_handle("O'Brien Jones"), "@ojone123");
/// ```
pub fn generate_safe_handle(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let first_name = parts.first().copied().unwrap_or(FALLBACK_NAME);
    let last_name = if parts.len() > 1 { parts[parts.len() - 1] } else { "" };

    let last_part = ascii_letters(last_name, LAST_NAME_LETTERS);
    if !last_part.is_empty() {
        let initial = first_name
            .chars()
            .find(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_default();
        return format!("@{}{}{}", initial, last_part, HANDLE_SUFFIX);
    }

    let first_part = ascii_letters(first_name, FIRST_NAME_LETTERS);
    if first_part.is_empty() {
        format!("@{}{}", FALLBACK_NAME, HANDLE_SUFFIX)
    } else {
        format!("@{}{}", first_part, HANDLE_SUFFIX)
    }
}

/// First `limit` ASCII letters of `input`, lowercased
fn ascii_letters(input: &str, limit: usize) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(limit)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
