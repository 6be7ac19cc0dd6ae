//! Keyword matching over the FAQ collection.
//!
//! Scoring is plain substring containment: every listed keyword found in the
//! lower-cased query adds [`KEYWORD_WEIGHT`]. Overlapping keywords ("fabric"
//! and "microsoft fabric") both count, and a keyword counts once no matter how
//! often it occurs in the query.

use crate::error::FaqError;
use crate::models::{read_json, Category, FaqEntry};
use std::collections::BTreeMap;
use std::path::Path;

/// Score contributed by each matching keyword.
pub const KEYWORD_WEIGHT: u32 = 10;

/// Minimum [`answer_score`] for [`FaqIndex::lookup`] to answer a
/// single-item question from the FAQ.
pub const ANSWER_THRESHOLD: u32 = 15;

/// Bonus when the query contains the start of an entry's question.
pub const QUESTION_PREFIX_BONUS: u32 = 20;

/// Characters of the question compared for [`QUESTION_PREFIX_BONUS`].
const QUESTION_PREFIX_CHARS: usize = 20;

/// Maximum number of answers merged for a multi-item question.
const COMBINE_LIMIT: usize = 10;

/// Query fragments that ask for several items at once ("all sessions", "alle").
/// Matched as substrings, like keywords.
const MULTI_REQUEST_MARKERS: [&str; 5] = ["all", "every", "each", "všech", "alle"];

/// A scored hit against one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaqMatch<'a> {
    pub entry: &'a FaqEntry,
    pub score: u32,
}

/// Read-only FAQ collection, kept in generation order.
#[derive(Debug, Clone, Default)]
pub struct FaqIndex {
    entries: Vec<FaqEntry>,
}

impl FaqIndex {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Load a `faq.json` array.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FaqError> {
        let entries: Vec<FaqEntry> = read_json(path.as_ref())?;
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.category).or_insert(0) += 1;
        }
        counts
    }

    /// Highest-scoring entry for `query`. Ties go to the entry listed first.
    pub fn best_match(&self, query: &str) -> Option<FaqMatch<'_>> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return None;
        }

        let mut best: Option<FaqMatch<'_>> = None;
        for entry in &self.entries {
            let score = score_entry(entry, &query);
            if score == 0 {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(FaqMatch { entry, score });
            }
        }
        best
    }

    /// Every matching entry, highest score first, collection order among equals.
    pub fn rank(&self, query: &str) -> Vec<FaqMatch<'_>> {
        self.rank_with(query, score_entry)
    }

    fn rank_with(&self, query: &str, score: fn(&FaqEntry, &str) -> u32) -> Vec<FaqMatch<'_>> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<FaqMatch<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = score(entry, &query);
                (score > 0).then_some(FaqMatch { entry, score })
            })
            .collect();
        // stable sort keeps collection order for equal scores
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    /// Answer text for `query`, or `None` when the question should go to the
    /// language model instead.
    ///
    /// Entries are ranked by [`answer_score`]. Questions asking for several
    /// items merge the answers of the top ranked entries; anything else returns
    /// the best answer only if it reaches [`ANSWER_THRESHOLD`].
    pub fn lookup(&self, query: &str) -> Option<String> {
        let ranked = self.rank_with(query, answer_score);
        let first = ranked.first()?;

        if ranked.len() > 1 && is_multi_request(query) {
            let combined = ranked
                .iter()
                .take(COMBINE_LIMIT)
                .map(|m| m.entry.answer.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            tracing::debug!(
                combined = ranked.len().min(COMBINE_LIMIT),
                "Combining FAQ answers"
            );
            return Some(combined);
        }

        if first.score < ANSWER_THRESHOLD {
            tracing::debug!(score = first.score, "FAQ match too weak for a direct answer");
            return None;
        }

        Some(first.entry.answer.clone())
    }
}

/// Sum of [`KEYWORD_WEIGHT`] over keywords contained in `query_lower`.
/// Empty keywords never match.
pub fn score_entry(entry: &FaqEntry, query_lower: &str) -> u32 {
    entry
        .keywords
        .iter()
        .filter(|k| !k.is_empty() && query_lower.contains(k.to_lowercase().as_str()))
        .count() as u32
        * KEYWORD_WEIGHT
}

/// [`score_entry`] plus [`QUESTION_PREFIX_BONUS`] when `query_lower` contains
/// the first characters of the entry's question.
pub fn answer_score(entry: &FaqEntry, query_lower: &str) -> u32 {
    let prefix: String = entry
        .question
        .to_lowercase()
        .chars()
        .take(QUESTION_PREFIX_CHARS)
        .collect();
    let bonus = if !prefix.is_empty() && query_lower.contains(prefix.as_str()) {
        QUESTION_PREFIX_BONUS
    } else {
        0
    };
    score_entry(entry, query_lower) + bonus
}

fn is_multi_request(query: &str) -> bool {
    let query = query.to_lowercase();
    MULTI_REQUEST_MARKERS.iter().any(|m| query.contains(m))
}
