//! Map tags and their canonical equivalence.
//!
//! Tag comparisons throughout the system ignore case and surrounding
//! whitespace. Rather than scattering trimmed/lowercased compares across
//! components, [`Tag`] owns the canonical form once, and every layer goes
//! through [`Tag::canonical_eq`] (or compares canonical fragments), so the
//! equivalence cannot drift between components.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::GridError;

/// A caller-supplied map name with its canonical comparison form.
///
/// The raw string is preserved for display; equality and hashing use the
/// canonical form (trimmed, uppercased). Callers must pick tags that stay
/// distinct under that equivalence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    raw: String,
    canonical: String,
}

/// Canonical form shared by every tag comparison in the system.
pub(crate) fn canonical_form(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Tag {
    /// Build a tag, rejecting empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self, GridError> {
        let raw = raw.into();
        let canonical = canonical_form(&raw);
        if canonical.is_empty() {
            return Err(GridError::EmptyTag);
        }
        Ok(Tag { raw, canonical })
    }

    /// The tag exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Trimmed, uppercased comparison form.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether `other` names the same tag under the canonical equivalence.
    pub fn canonical_eq(&self, other: &str) -> bool {
        self.canonical == canonical_form(other)
    }

    /// Canonical characters from `start` to the end of the tag.
    ///
    /// `None` when `start` lies past the end. Indexing is by character, not
    /// byte, so multi-byte tags slice safely.
    pub fn slice_from(&self, start: usize) -> Option<String> {
        let chars: Vec<char> = self.canonical.chars().collect();
        if start > chars.len() {
            return None;
        }
        Some(chars[start..].iter().collect())
    }

    /// Canonical characters `[start, start + len)`.
    ///
    /// `None` when the requested window does not fit inside the tag.
    pub fn fragment(&self, start: usize, len: usize) -> Option<String> {
        let chars: Vec<char> = self.canonical.chars().collect();
        let end = start.checked_add(len)?;
        if end > chars.len() {
            return None;
        }
        Some(chars[start..end].iter().collect())
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Tag {}

impl std::hash::Hash for Tag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tags_rejected() {
        assert_eq!(Tag::new(""), Err(GridError::EmptyTag));
        assert_eq!(Tag::new("   \t "), Err(GridError::EmptyTag));
    }

    #[test]
    fn canonical_eq_ignores_case_and_padding() {
        let tag = Tag::new("  CrossRoad ").expect("valid tag");
        assert!(tag.canonical_eq("crossroad"));
        assert!(tag.canonical_eq(" CROSSROAD  "));
        assert!(!tag.canonical_eq("crossroads"));
        assert_eq!(tag.as_str(), "  CrossRoad ");
        assert_eq!(tag.canonical(), "CROSSROAD");
    }

    #[test]
    fn equality_uses_canonical_form() {
        let a = Tag::new("gate").expect("valid");
        let b = Tag::new(" GATE ").expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn fragment_slices_by_char() {
        let tag = Tag::new("tower01").expect("valid");
        assert_eq!(tag.fragment(0, 5).as_deref(), Some("TOWER"));
        assert_eq!(tag.fragment(5, 2).as_deref(), Some("01"));
        assert_eq!(tag.fragment(6, 2), None);
        assert_eq!(tag.slice_from(5).as_deref(), Some("01"));
        assert_eq!(tag.slice_from(8), None);
    }
}
