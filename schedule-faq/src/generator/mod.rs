//! Offline FAQ generation from conference data.
//!
//! Output order is fixed: general facts, per-session entries, speakers, time
//! slots, rooms, named blocks, topic recommendations, speaker expertise, and
//! parallel-session comparisons. The same input always yields the same list.

pub mod topics;

use crate::error::FaqError;
use crate::models::{Category, Conference, FaqEntry, Session};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use topics::{Topic, TOPICS};

const SUMMARY_CHARS: usize = 200;
const COMPARISON_CHARS: usize = 150;

/// Number of leading time slots in the "first" block.
const FIRST_BLOCK_SLOTS: usize = 4;
/// Number of trailing time slots in the "last" block.
const LAST_BLOCK_SLOTS: usize = 3;

const MORNING_HOURS: [&str; 3] = ["09:", "10:", "11:"];
const AFTERNOON_HOURS: [&str; 3] = ["13:", "14:", "15:"];

/// A real session with its parsed start and pre-rendered fields.
struct Slot<'a> {
    session: &'a Session,
    start: DateTime<FixedOffset>,
    /// `HH:MM` wall-clock time as written in the start string.
    clock: String,
    /// Lower-cased `"{title} {description}"` for topic matching.
    topic_text: String,
}

/// Real sessions plus their grouping by start instant.
struct Schedule<'a> {
    slots: Vec<Slot<'a>>,
    /// Time key -> indices into `slots`; keys iterate in sorted order.
    by_time: BTreeMap<String, Vec<usize>>,
}

impl<'a> Schedule<'a> {
    fn build(conference: &'a Conference) -> Result<Self, FaqError> {
        let mut slots = Vec::new();
        let mut by_time: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for session in conference.real_sessions() {
            let start = session.start_time()?;
            by_time.entry(session.time_key()).or_default().push(slots.len());
            slots.push(Slot {
                session,
                start,
                clock: start.format("%H:%M").to_string(),
                topic_text: format!("{} {}", session.title, session.description).to_lowercase(),
            });
        }

        Ok(Self { slots, by_time })
    }

    fn slots_at<'s>(&'s self, indices: &'s [usize]) -> impl Iterator<Item = &'s Slot<'a>> + 's {
        indices.iter().map(move |&i| &self.slots[i])
    }

    fn time_keys(&self) -> Vec<&str> {
        self.by_time.keys().map(String::as_str).collect()
    }

    /// Speakers in order of first appearance with their sessions.
    fn sessions_by_speaker(&self) -> Vec<(&'a str, Vec<&Slot<'a>>)> {
        let mut grouped: Vec<(&'a str, Vec<&Slot<'a>>)> = Vec::new();
        for slot in &self.slots {
            for name in &slot.session.speakers {
                match grouped.iter_mut().find(|(n, _)| *n == name.as_str()) {
                    Some((_, sessions)) => sessions.push(slot),
                    None => grouped.push((name.as_str(), vec![slot])),
                }
            }
        }
        grouped
    }
}

/// Derive every FAQ entry for `conference`.
pub fn generate_faq(conference: &Conference) -> Result<Vec<FaqEntry>, FaqError> {
    let schedule = Schedule::build(conference)?;
    let mut faq = Vec::new();

    tracing::info!(
        sessions = schedule.slots.len(),
        time_blocks = schedule.by_time.len(),
        "Generating FAQ"
    );

    push_general(conference, &schedule, &mut faq);
    push_sessions(&schedule, &mut faq);
    push_speakers(conference, &schedule, &mut faq);
    push_time_slots(&schedule, &mut faq);
    push_rooms(conference, &schedule, &mut faq);
    push_blocks(&schedule, &mut faq);
    push_topic_recommendations(&schedule, &mut faq);
    push_speaker_expertise(&schedule, &mut faq);
    push_comparisons(&schedule, &mut faq);

    Ok(faq)
}

fn push_general(conference: &Conference, schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    let event = &conference.event;

    faq.push(FaqEntry::new(
        "When is the conference?",
        format!(
            "The {} takes place on {} at {}.",
            event.name,
            event.date.format("%B %-d, %Y"),
            event.location
        ),
        keywords(&["when", "date", "day", "time", "kdy", "datum", "wann", "datum"]),
        Category::General,
    ));

    let where_answer = match event.address.as_deref().filter(|a| !a.is_empty()) {
        Some(address) => format!("The conference is held at {} ({}).", event.location, address),
        None => format!("The conference is held at {}.", event.location),
    };
    faq.push(FaqEntry::new(
        "Where is the conference?",
        where_answer,
        keywords(&["where", "location", "venue", "place", "kde", "místo", "wo", "ort"]),
        Category::General,
    ));

    faq.push(FaqEntry::new(
        "How many sessions are there?",
        format!(
            "There are {} sessions (excluding breaks and registration).",
            schedule.slots.len()
        ),
        keywords(&[
            "how many sessions",
            "number of sessions",
            "kolik sessions",
            "wie viele sessions",
        ]),
        Category::General,
    ));

    faq.push(FaqEntry::new(
        "How many speakers?",
        format!(
            "There are {} speakers at the conference.",
            conference.speakers.len()
        ),
        keywords(&[
            "how many speakers",
            "number of speakers",
            "kolik speakerů",
            "wie viele speaker",
        ]),
        Category::General,
    ));

    let room_names: Vec<&str> = conference.rooms.iter().map(|r| r.name.as_str()).collect();
    faq.push(FaqEntry::new(
        "What rooms are available?",
        format!(
            "The conference uses {} rooms: {}.",
            room_names.len(),
            room_names.join(", ")
        ),
        keywords(&["rooms", "místnosti", "räume", "which rooms"]),
        Category::General,
    ));
}

fn push_sessions(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for slot in &schedule.slots {
        let session = slot.session;
        let title_lower = session.title.to_lowercase();

        let mut session_keywords = vec![title_lower.clone(), session.id.clone()];
        session_keywords.extend(session.speakers.iter().map(|s| s.to_lowercase()));

        faq.push(FaqEntry::new(
            format!("Tell me about {}", session.title),
            format!(
                "{} is at {} in {} by {}. {}",
                session.title,
                slot.clock,
                session.room,
                session.speaker_list(),
                session.description
            ),
            session_keywords,
            Category::Session,
        ));

        let (summary, truncated) = truncate_chars(&session.description, SUMMARY_CHARS);
        faq.push(FaqEntry::new(
            format!("Summarize {}", session.title),
            if truncated {
                format!("{}...", summary)
            } else {
                summary.to_string()
            },
            vec![
                format!("summarize {}", title_lower),
                format!("summary {}", title_lower),
            ],
            Category::Summary,
        ));
    }
}

fn push_speakers(conference: &Conference, schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for speaker in &conference.speakers {
        let speaking: Vec<&Slot<'_>> = schedule
            .slots
            .iter()
            .filter(|slot| slot.session.speakers.contains(&speaker.name))
            .collect();
        if speaking.is_empty() {
            continue;
        }

        let sessions_list = speaking
            .iter()
            .map(|slot| format!("\"{}\" at {}", slot.session.title, slot.clock))
            .collect::<Vec<_>>()
            .join(", ");

        let mut info = speaker.name.clone();
        if let Some(title) = speaker.title.as_deref().filter(|t| !t.is_empty()) {
            info.push_str(" - ");
            info.push_str(title);
        }

        let answer = match speaker.bio.as_deref().filter(|b| !b.is_empty()) {
            Some(bio) => format!("{}\n\n{}\n\nSpeaking at: {}.", info, bio, sessions_list),
            None => format!("{}\n\nSpeaking at: {}.", info, sessions_list),
        };

        let name = speaker.name.to_lowercase();
        faq.push(FaqEntry::new(
            format!("Who is {}?", speaker.name),
            answer,
            vec![
                name.clone(),
                format!("who is {}", name),
                format!("about {}", name),
                format!("tell me about {}", name),
                format!("more about {}", name),
                format!("information about {}", name),
            ],
            Category::Speaker,
        ));
    }
}

fn push_time_slots(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for indices in schedule.by_time.values() {
        let clock = &schedule.slots[indices[0]].clock;
        let sessions_list = schedule
            .slots_at(indices)
            .map(|slot| format!("{} ({})", slot.session.title, slot.session.room))
            .collect::<Vec<_>>()
            .join(" | ");

        faq.push(FaqEntry::new(
            format!("Which sessions start at {}?", clock),
            format!("Sessions starting at {}: {}", clock, sessions_list),
            vec![
                format!("sessions at {}", clock),
                clock.clone(),
                format!("start {}", clock),
                format!("začínají {}", clock),
            ],
            Category::Time,
        ));
    }
}

fn push_rooms(conference: &Conference, schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for room in &conference.rooms {
        let mut in_room: Vec<&Slot<'_>> = schedule
            .slots
            .iter()
            .filter(|slot| slot.session.room_id == room.id)
            .collect();
        if in_room.is_empty() {
            continue;
        }
        in_room.sort_by_key(|slot| slot.start);

        let sessions_list = in_room
            .iter()
            .map(|slot| format!("• {} - {}", slot.clock, slot.session.title))
            .collect::<Vec<_>>()
            .join("\n");

        let name = room.name.to_lowercase();
        faq.push(FaqEntry::new(
            format!("What sessions are in {}?", room.name),
            format!("Sessions in {}:\n{}", room.name, sessions_list),
            vec![
                name.clone(),
                format!("sessions in {}", name),
                format!("room {}", name),
            ],
            Category::Room,
        ));
    }
}

fn push_blocks(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    let keys = schedule.time_keys();
    let within = |hours: &[&str]| -> Vec<&str> {
        keys.iter()
            .copied()
            .filter(|k| hours.iter().any(|h| k.contains(h)))
            .collect()
    };

    let blocks: [(&str, Vec<&str>); 4] = [
        ("first", keys.iter().copied().take(FIRST_BLOCK_SLOTS).collect()),
        ("morning", within(&MORNING_HOURS)),
        ("afternoon", within(&AFTERNOON_HOURS)),
        (
            "last",
            keys[keys.len().saturating_sub(LAST_BLOCK_SLOTS)..].to_vec(),
        ),
    ];

    for (block_name, block_keys) in blocks {
        let block_slots: Vec<&Slot<'_>> = block_keys
            .iter()
            .filter_map(|k| schedule.by_time.get(*k))
            .flat_map(|indices| schedule.slots_at(indices))
            .collect();
        if block_slots.is_empty() {
            continue;
        }

        let sessions_list = block_slots
            .iter()
            .map(|slot| {
                format!(
                    "• {} - {} by {}",
                    slot.clock,
                    slot.session.title,
                    slot.session.speaker_list()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut block_keywords = vec![
            format!("{} block", block_name),
            format!("{} sessions", block_name),
        ];
        if block_name == "first" {
            block_keywords.push("první blok".to_string());
        }

        faq.push(FaqEntry::new(
            format!("Which sessions are in the {} block?", block_name),
            format!("Sessions in the {} block:\n{}", block_name, sessions_list),
            block_keywords,
            Category::Block,
        ));
    }
}

fn push_topic_recommendations(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for topic in TOPICS {
        let matching: Vec<&Slot<'_>> = schedule
            .slots
            .iter()
            .filter(|slot| topic.matches(&slot.topic_text))
            .collect();
        if matching.is_empty() {
            continue;
        }

        let sessions_list = matching
            .iter()
            .map(|slot| {
                format!(
                    "• {} - {} ({}) by {}",
                    slot.clock,
                    slot.session.title,
                    slot.session.room,
                    slot.session.speaker_list()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let name = topic.name;
        faq.push(FaqEntry::new(
            format!(
                "What sessions should I attend if I'm interested in {}?",
                name
            ),
            format!("Sessions about {}:\n{}", name, sessions_list),
            vec![
                format!("I'm interested in {}", name),
                format!("interested in {}", name),
                format!("sessions about {}", name),
                format!("recommend {}", name),
                format!("schedule for {}", name),
                name.to_lowercase(),
            ],
            Category::Recommendation,
        ));
    }
}

fn push_speaker_expertise(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    let by_speaker = schedule.sessions_by_speaker();

    for topic in TOPICS {
        let experts = experts_for(topic, &by_speaker);
        if experts.is_empty() {
            continue;
        }

        let speakers_list = experts
            .iter()
            .map(|(name, slot)| format!("• {} - {} at {}", name, slot.session.title, slot.clock))
            .collect::<Vec<_>>()
            .join("\n");

        let name = topic.name.to_lowercase();
        faq.push(FaqEntry::new(
            format!("Which speakers talk about {}?", topic.name),
            format!("Speakers covering {}:\n{}", topic.name, speakers_list),
            vec![
                format!("speakers {}", name),
                format!("who talks about {}", name),
                format!("{} experts", name),
            ],
            Category::Recommendation,
        ));
    }
}

/// Each speaker once, citing their first session on `topic`.
fn experts_for<'s, 'a>(
    topic: &Topic,
    by_speaker: &[(&'a str, Vec<&'s Slot<'a>>)],
) -> Vec<(&'a str, &'s Slot<'a>)> {
    by_speaker
        .iter()
        .filter_map(|(name, sessions)| {
            sessions
                .iter()
                .find(|slot| topic.matches(&slot.topic_text))
                .map(|slot| (*name, *slot))
        })
        .collect()
}

fn push_comparisons(schedule: &Schedule<'_>, faq: &mut Vec<FaqEntry>) {
    for indices in schedule.by_time.values().filter(|i| i.len() > 1) {
        let clock = &schedule.slots[indices[0]].clock;
        let comparison = schedule
            .slots_at(indices)
            .map(|slot| {
                let (excerpt, _) = truncate_chars(&slot.session.description, COMPARISON_CHARS);
                format!(
                    "• {}: {} by {}\n  {}...",
                    slot.session.room,
                    slot.session.title,
                    slot.session.speaker_list(),
                    excerpt
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        faq.push(FaqEntry::new(
            format!("What are my options at {}?", clock),
            format!("At {}, you can choose from:\n{}", clock, comparison),
            vec![
                format!("options {}", clock),
                format!("choose {}", clock),
                format!("which session {}", clock),
                format!("conflict {}", clock),
            ],
            Category::Comparison,
        ));
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// First `max` characters of `text`, and whether anything was cut.
fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "ž".repeat(5);
        assert_eq!(truncate_chars(&text, 3), ("žžž", true));
        assert_eq!(truncate_chars(&text, 5), (text.as_str(), false));
        assert_eq!(truncate_chars("", 200), ("", false));
    }
}
