//! Combinatorial word assembly from candidate fragments.
//!
//! A [`WordSearcher`] holds groups of interchangeable candidate fragments
//! and answers one question: can some combination of those fragments spell a
//! target word? "Spell" is anagram spelling — the concatenation of the
//! chosen fragments must carry the same letter-frequency multiset as the
//! word, matching how [`TagSearcher`](crate::TagSearcher) compares strings.
//!
//! Fragment multiplicity is deliberately not enforced: fragments may be
//! drawn repeatedly, so a single flat pool of one-character fragments can
//! spell any word over the pool's alphabet. The search is a depth-first
//! walk over the (deduplicated) pool with a non-decreasing index cursor,
//! pruned by the remaining letter budget and short-circuiting on the first
//! success; worst case is exponential in the pool size, so callers bound
//! group sizes.

use crate::anagram::LetterCounts;
use crate::WordError;

/// Combinatorial assembler over candidate fragment groups.
#[derive(Debug, Clone)]
pub struct WordSearcher {
    groups: Vec<Vec<String>>,
    /// Deduplicated uppercased fragments with their fingerprints and
    /// character lengths, flattened across all groups.
    pool: Vec<Fragment>,
}

#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    counts: LetterCounts,
    len: usize,
}

impl WordSearcher {
    /// Build a searcher from fragment groups.
    ///
    /// Blank entries are discarded, then empty groups; construction fails
    /// if nothing survives. Fragments are stored uppercased.
    pub fn new<G, I, S>(groups: G) -> Result<Self, WordError>
    where
        G: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<Vec<String>> = Vec::new();
        for group in groups {
            let entries: Vec<String> = group
                .into_iter()
                .filter(|s| !s.as_ref().trim().is_empty())
                .map(|s| s.as_ref().trim().to_uppercase())
                .collect();
            if !entries.is_empty() {
                kept.push(entries);
            }
        }
        if kept.is_empty() {
            return Err(WordError::EmptyGroups);
        }

        let mut pool: Vec<Fragment> = Vec::new();
        for entry in kept.iter().flatten() {
            if pool.iter().any(|f| f.text == *entry) {
                continue;
            }
            pool.push(Fragment {
                counts: LetterCounts::of(entry),
                len: entry.chars().count(),
                text: entry.clone(),
            });
        }

        Ok(WordSearcher { groups: kept, pool })
    }

    /// Surviving fragment groups, uppercased.
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Whether some combination of fragments spells `word`.
    ///
    /// Blank words never match; exhausting the combination space without a
    /// hit is an ordinary `false`, not an error.
    pub fn is_equal(&self, word: &str) -> bool {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return false;
        }
        let upper = trimmed.to_uppercase();
        let mut remaining = LetterCounts::of(&upper);
        let remaining_len = upper.chars().count();
        self.assemble(&mut remaining, remaining_len, 0)
    }

    /// Depth-first assembly: consume fragments out of `remaining` until it
    /// is empty. The cursor never moves backwards, which rules out
    /// permutation-duplicate work; anagram equality makes order irrelevant.
    fn assemble(&self, remaining: &mut LetterCounts, remaining_len: usize, cursor: usize) -> bool {
        if remaining.is_empty() {
            return true;
        }
        for i in cursor..self.pool.len() {
            let fragment = &self.pool[i];
            if fragment.len > remaining_len || !remaining.covers(&fragment.counts) {
                continue;
            }
            remaining.subtract(&fragment.counts);
            // Same index again: fragments may repeat.
            if self.assemble(remaining, remaining_len - fragment.len, i) {
                return true;
            }
            for c in fragment.text.chars() {
                remaining.add(c);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searcher(groups: Vec<Vec<&str>>) -> WordSearcher {
        WordSearcher::new(groups).expect("valid groups")
    }

    #[test]
    fn construction_discards_blanks_and_empty_groups() {
        let ws = searcher(vec![vec!["ab", "  ", "cd"], vec![], vec!["", " "]]);
        assert_eq!(ws.groups(), &[vec!["AB".to_string(), "CD".to_string()]]);
    }

    #[test]
    fn construction_fails_when_nothing_survives() {
        let err = WordSearcher::new(vec![vec![" ", ""], vec![]]);
        assert!(matches!(err, Err(WordError::EmptyGroups)));
    }

    #[test]
    fn single_pool_contract() {
        // The flat-pool contract: counts are not enforced, absent symbols
        // still fail, and the empty word never matches.
        let ws = searcher(vec![vec!["0", "0", "1", "0", "1", "2"]]);
        assert!(ws.is_equal("000"));
        assert!(!ws.is_equal("030"));
        assert!(!ws.is_equal(""));
        assert!(ws.is_equal("0212"));
    }

    #[test]
    fn multi_fragment_assembly() {
        let ws = searcher(vec![vec!["to", "ta"], vec!["wer", "ble"]]);
        assert!(ws.is_equal("tower"));
        assert!(ws.is_equal("table"));
        // Anagram spelling: order inside the concatenation is irrelevant.
        assert!(ws.is_equal("rewot"));
        assert!(!ws.is_equal("towel"));
        // Length mismatches can never be covered.
        assert!(!ws.is_equal("towers"));
    }

    #[test]
    fn assembly_is_case_insensitive() {
        let ws = searcher(vec![vec!["AbC"]]);
        assert!(ws.is_equal("cab"));
        assert!(ws.is_equal("CAB"));
    }
}
