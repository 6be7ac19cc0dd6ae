//! FAQ records produced by the generator and consumed by the matcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A precomputed question/answer pair with the keywords used to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    /// Matching phrases in generation order. Duplicates are allowed and each
    /// listed copy scores on its own.
    pub keywords: Vec<String>,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Session,
    Speaker,
    Time,
    Room,
    Block,
    Summary,
    Recommendation,
    Comparison,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::General,
        Category::Session,
        Category::Speaker,
        Category::Time,
        Category::Room,
        Category::Block,
        Category::Summary,
        Category::Recommendation,
        Category::Comparison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Session => "session",
            Category::Speaker => "speaker",
            Category::Time => "time",
            Category::Room => "room",
            Category::Block => "block",
            Category::Summary => "summary",
            Category::Recommendation => "recommendation",
            Category::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FaqEntry {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        keywords: Vec<String>,
        category: Category,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords,
            category,
        }
    }
}
