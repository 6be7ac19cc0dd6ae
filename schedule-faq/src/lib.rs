//! Conference schedule data, FAQ generation and FAQ keyword matching.
//!
//! The generator runs offline (see the `generate-faq` binary) and produces a
//! flat list of [`FaqEntry`] records. The [`FaqIndex`] answers free-text
//! questions from that list without calling any external service.

pub mod error;
pub mod generator;
pub mod matcher;
pub mod models;

pub use error::FaqError;
pub use generator::generate_faq;
pub use matcher::{
    answer_score, FaqIndex, FaqMatch, ANSWER_THRESHOLD, KEYWORD_WEIGHT, QUESTION_PREFIX_BONUS,
};
pub use models::{Category, Conference, Event, FaqEntry, Room, Session, Speaker};
