//! Anagram-window search over letter-frequency fingerprints.
//!
//! A [`TagSearcher`] captures the frequency multiset of one source string at
//! construction time. [`TagSearcher::find_occurrences`] then slides an
//! equal-length window over a target word, maintaining the window's
//! frequency table incrementally, and yields a [`FindString`] wherever the
//! two multisets are identical. Comparison is case-insensitive throughout;
//! both sides are uppercased before counting.

use std::collections::HashMap;

use crate::WordError;

/// Per-character frequency multiset of an uppercased string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LetterCounts {
    counts: HashMap<char, u32>,
}

impl LetterCounts {
    /// Count the characters of `text` after uppercasing.
    pub(crate) fn of(text: &str) -> Self {
        let mut counts = LetterCounts::default();
        for c in text.to_uppercase().chars() {
            counts.add(c);
        }
        counts
    }

    /// Count already-uppercased characters.
    pub(crate) fn of_chars(chars: &[char]) -> Self {
        let mut counts = LetterCounts::default();
        for &c in chars {
            counts.add(c);
        }
        counts
    }

    pub(crate) fn add(&mut self, c: char) {
        *self.counts.entry(c).or_insert(0) += 1;
    }

    /// Remove one occurrence of `c`; the entry disappears at zero so that
    /// equality stays a plain map compare.
    pub(crate) fn remove(&mut self, c: char) {
        if let Some(n) = self.counts.get_mut(&c) {
            *n -= 1;
            if *n == 0 {
                self.counts.remove(&c);
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Whether every count in `other` fits inside `self`.
    pub(crate) fn covers(&self, other: &LetterCounts) -> bool {
        other
            .counts
            .iter()
            .all(|(c, n)| self.counts.get(c).is_some_and(|have| have >= n))
    }

    /// Subtract `other` from `self`. Caller must have checked `covers` first.
    pub(crate) fn subtract(&mut self, other: &LetterCounts) {
        for (&c, &n) in &other.counts {
            for _ in 0..n {
                self.remove(c);
            }
        }
    }
}

/// Letter-frequency fingerprint of one source string.
///
/// Ephemeral: built per query, holds no references into the grid layers.
#[derive(Debug, Clone)]
pub struct TagSearcher {
    source: String,
    fingerprint: LetterCounts,
}

impl TagSearcher {
    /// Fingerprint `source`, rejecting blank input.
    pub fn new(source: &str) -> Result<Self, WordError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(WordError::EmptySource);
        }
        let upper = trimmed.to_uppercase();
        let fingerprint = LetterCounts::of(&upper);
        Ok(TagSearcher {
            source: upper,
            fingerprint,
        })
    }

    /// Uppercased source string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `other` is an anagram of the source (length and frequency
    /// equal, case-insensitive).
    pub fn is_anagram(&self, other: &str) -> bool {
        let other: Vec<char> = other.to_uppercase().chars().collect();
        other.len() == self.source.chars().count()
            && LetterCounts::of_chars(&other) == self.fingerprint
    }

    /// All anagram-equal windows of `word`, in ascending position order.
    ///
    /// Positions index characters of the uppercased word. The returned
    /// iterator is finite and can be re-created by calling this method
    /// again; cloning it restarts from the current state.
    pub fn find_occurrences<'a>(&'a self, word: &str) -> FindOccurrences<'a> {
        let chars: Vec<char> = word.to_uppercase().chars().collect();
        let window_len = self.source.chars().count();
        let window_counts = if chars.len() >= window_len && window_len > 0 {
            LetterCounts::of_chars(&chars[..window_len])
        } else {
            LetterCounts::default()
        };
        FindOccurrences {
            target: &self.fingerprint,
            chars,
            window_len,
            window_counts,
            pos: 0,
        }
    }
}

/// One anagram-equal window found inside a longer string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindString {
    /// Character offset of the window inside the (uppercased) word.
    pub position: usize,
    window: String,
}

impl FindString {
    /// The captured window, uppercased.
    pub fn window(&self) -> &str {
        &self.window
    }

    /// Case-insensitive, length-equal, frequency-equal comparison against
    /// the captured window.
    pub fn equals_anagram(&self, other: &str) -> bool {
        let other: Vec<char> = other.to_uppercase().chars().collect();
        other.len() == self.window.chars().count()
            && LetterCounts::of_chars(&other) == LetterCounts::of(&self.window)
    }
}

/// Iterator over anagram-equal windows; see [`TagSearcher::find_occurrences`].
#[derive(Debug, Clone)]
pub struct FindOccurrences<'a> {
    target: &'a LetterCounts,
    chars: Vec<char>,
    window_len: usize,
    window_counts: LetterCounts,
    pos: usize,
}

impl Iterator for FindOccurrences<'_> {
    type Item = FindString;

    fn next(&mut self) -> Option<FindString> {
        if self.window_len == 0 {
            return None;
        }
        while self.pos + self.window_len <= self.chars.len() {
            let pos = self.pos;
            let hit = self.window_counts == *self.target;
            // Slide before yielding so the next call resumes past this window.
            self.pos += 1;
            if self.pos + self.window_len <= self.chars.len() {
                self.window_counts.remove(self.chars[pos]);
                self.window_counts.add(self.chars[pos + self.window_len]);
            }
            if hit {
                let window: String = self.chars[pos..pos + self.window_len].iter().collect();
                return Some(FindString { position: pos, window });
            }
        }
        None
    }
}
