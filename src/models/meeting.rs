use chrono::{DateTime, Duration, FixedOffset};
use serde::{Serialize, Serializer};

use crate::timing::Timestamp;

/// Name used for a meeting or topic that was never given one
pub const NOT_SPECIFIED: &str = "not specified";

/// A presence declaration. Attendance is a log, so repeats are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    pub name: String,
}

/// A note recorded under a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Speaker who recorded the note
    pub by: Option<String>,
    pub text: String,
}

/// Decisions carry the same fields as items
pub type Decision = Item;

/// An action item; fields are filled positionally and default to empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Action {
    pub who: String,
    pub due: String,
    pub text: String,
}

/// A timestamped line of speech kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    pub when: Timestamp,
    pub who: String,
    pub text: String,
}

/// An unrecognized command, filed globally on the meeting
pub type Unknown = Utterance;

/// Ordinary chatter, filed under the topic it was said in
pub type NonCommand = Utterance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub name: String,
    pub start: Timestamp,
    /// Set when the next topic begins or the meeting ends
    pub end: Option<Timestamp>,
    pub items: Vec<Item>,
    pub actions: Vec<Action>,
    pub decisions: Vec<Decision>,
    pub non_commands: Vec<NonCommand>,
}

impl Topic {
    pub fn new(name: impl Into<String>, start: Timestamp) -> Self {
        Self {
            name: name.into(),
            start,
            end: None,
            items: Vec::new(),
            actions: Vec::new(),
            decisions: Vec::new(),
            non_commands: Vec::new(),
        }
    }

    /// Time spent on this topic, once it has been closed
    pub fn elapsed(&self) -> Option<Duration> {
        self.end.map(|end| end.since(&self.start))
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// The accumulated meeting record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meeting {
    pub name: String,
    /// Declared absolute start, unset until a valid start command is seen
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Transcript offset of the meeting-start line
    #[serde(rename = "chat_offset_seconds", serialize_with = "serialize_seconds")]
    pub chat_offset: Duration,
    pub end_time: Option<Timestamp>,
    pub attendees: Vec<Attendee>,
    pub topics: Vec<Topic>,
    pub unknowns: Vec<Unknown>,
}

impl Default for Meeting {
    fn default() -> Self {
        Self::new(NOT_SPECIFIED)
    }
}

impl Meeting {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: None,
            chat_offset: Duration::zero(),
            end_time: None,
            attendees: Vec::new(),
            topics: Vec::new(),
            unknowns: Vec::new(),
        }
    }

    /// Actions across all topics, in order of encounter
    pub fn all_actions(&self) -> Vec<&Action> {
        self.topics.iter().flat_map(|t| t.actions.iter()).collect()
    }

    /// Decisions across all topics, in order of encounter
    pub fn all_decisions(&self) -> Vec<&Decision> {
        self.topics.iter().flat_map(|t| t.decisions.iter()).collect()
    }

    /// Non-command utterances across all topics, in order of encounter
    pub fn all_non_commands(&self) -> Vec<&NonCommand> {
        self.topics.iter().flat_map(|t| t.non_commands.iter()).collect()
    }

    /// Attendee names, sorted lexicographically when `sorted` is set
    pub fn attendee_names(&self, sorted: bool) -> Vec<&str> {
        let mut names: Vec<&str> = self.attendees.iter().map(|a| a.name.as_str()).collect();
        if sorted {
            names.sort();
        }
        names
    }
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::Anchored(DateTime::parse_from_rfc3339(rfc3339).unwrap())
    }

    #[test]
    fn test_topic_elapsed() {
        let mut topic = Topic::new("Planning", at("2024-01-01T09:00:05+00:00"));
        assert!(topic.is_open());
        assert_eq!(topic.elapsed(), None);

        topic.end = Some(at("2024-01-01T09:02:05+00:00"));
        assert_eq!(topic.elapsed(), Some(Duration::minutes(2)));
    }

    #[test]
    fn test_flattened_views_keep_encounter_order() {
        let mut meeting = Meeting::default();
        let mut first = Topic::new("First", at("2024-01-01T09:00:00+00:00"));
        first.actions.push(Action {
            who: "Alice".to_string(),
            ..Default::default()
        });
        first.decisions.push(Item {
            by: None,
            text: "Ship it".to_string(),
        });
        let mut second = Topic::new("Second", at("2024-01-01T09:10:00+00:00"));
        second.actions.push(Action {
            who: "Bob".to_string(),
            ..Default::default()
        });
        meeting.topics.push(first);
        meeting.topics.push(second);

        let who: Vec<&str> = meeting.all_actions().iter().map(|a| a.who.as_str()).collect();
        assert_eq!(who, vec!["Alice", "Bob"]);
        assert_eq!(meeting.all_decisions().len(), 1);
        assert!(meeting.all_non_commands().is_empty());
    }

    #[test]
    fn test_attendee_names() {
        let mut meeting = Meeting::default();
        for name in ["Carol", "Alice", "Carol"] {
            meeting.attendees.push(Attendee {
                name: name.to_string(),
            });
        }

        assert_eq!(meeting.attendee_names(false), vec!["Carol", "Alice", "Carol"]);
        assert_eq!(meeting.attendee_names(true), vec!["Alice", "Carol", "Carol"]);
    }

    #[test]
    fn test_default_meeting() {
        let meeting = Meeting::default();
        assert_eq!(meeting.name, NOT_SPECIFIED);
        assert!(meeting.start_time.is_none());
        assert!(meeting.end_time.is_none());
        assert_eq!(meeting.chat_offset, Duration::zero());
    }
}
