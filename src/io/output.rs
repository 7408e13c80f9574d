use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;

use crate::models::{Action, Meeting, Utterance};
use crate::stages::{BuildStats, RenderConfig};
use crate::timing::Timestamp;

/// Machine-readable output format
#[derive(Debug, Clone, Serialize)]
pub struct MachineMinutes<'a> {
    pub meeting: &'a Meeting,
    /// Per-topic elapsed seconds, `None` for topics never closed
    pub topic_seconds: Vec<Option<i64>>,
    pub stats: Option<&'a BuildStats>,
}

impl<'a> MachineMinutes<'a> {
    pub fn new(meeting: &'a Meeting, stats: Option<&'a BuildStats>) -> Self {
        Self {
            meeting,
            topic_seconds: meeting
                .topics
                .iter()
                .map(|t| t.elapsed().map(|d| d.num_seconds()))
                .collect(),
            stats,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Markdown meeting minutes
pub struct MinutesReport<'a> {
    meeting: &'a Meeting,
    config: &'a RenderConfig,
}

impl<'a> MinutesReport<'a> {
    pub fn new(meeting: &'a Meeting, config: &'a RenderConfig) -> Self {
        Self { meeting, config }
    }

    /// Format the minutes as markdown
    pub fn format(&self) -> String {
        let meeting = self.meeting;
        let mut out = String::new();

        let started = meeting
            .start_time
            .map(|at| format_datetime(&at))
            .unwrap_or_else(|| "an unknown date".to_string());
        let _ = writeln!(out, "# {} started on {}", meeting.name, started);

        let _ = writeln!(out, "\n## Attendance");
        for name in meeting.attendee_names(self.config.sort_attendees) {
            let _ = writeln!(out, "- {}", name);
        }

        for topic in &meeting.topics {
            let elapsed = topic
                .elapsed()
                .map(format_elapsed)
                .unwrap_or_else(|| "open".to_string());
            let _ = writeln!(out, "\n## Topic: {} ({})", topic.name, elapsed);
            for item in &topic.items {
                let _ = writeln!(out, "- {}", item.text);
            }
            if !topic.actions.is_empty() {
                let _ = writeln!(out, "\n### Actions");
                push_actions(&mut out, topic.actions.iter());
            }
            if !topic.decisions.is_empty() {
                let _ = writeln!(out, "\n### Decisions");
                for decision in &topic.decisions {
                    let _ = writeln!(out, "- {}", decision.text);
                }
            }
            if self.config.include_non_commands && !topic.non_commands.is_empty() {
                let _ = writeln!(out, "\n### Non Commands");
                push_utterances(&mut out, topic.non_commands.iter());
            }
        }

        let actions = meeting.all_actions();
        if !actions.is_empty() {
            let _ = writeln!(out, "\n# All Actions");
            push_actions(&mut out, actions.into_iter());
        }

        let decisions = meeting.all_decisions();
        if !decisions.is_empty() {
            let _ = writeln!(out, "\n# All Decisions");
            for decision in decisions {
                let _ = writeln!(out, "- {}", decision.text);
            }
        }

        if !meeting.unknowns.is_empty() {
            let _ = writeln!(out, "\n# Unknown Commands");
            push_utterances(&mut out, meeting.unknowns.iter());
        }

        let non_commands = meeting.all_non_commands();
        if self.config.include_non_commands && !non_commands.is_empty() {
            let _ = writeln!(out, "\n# All Non Commands");
            push_utterances(&mut out, non_commands.into_iter());
        }

        match &meeting.end_time {
            Some(end) => {
                let _ = writeln!(out, "\n# Meeting ended at {}", format_timestamp(end));
            }
            None => {
                let _ = writeln!(out, "\n# Meeting end was not recorded");
            }
        }

        out
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn push_actions<'b>(out: &mut String, actions: impl Iterator<Item = &'b Action>) {
    for action in actions {
        let _ = writeln!(out, "- {}({}): {}", action.who, action.due, action.text);
    }
}

fn push_utterances<'b>(out: &mut String, utterances: impl Iterator<Item = &'b Utterance>) {
    for u in utterances {
        let _ = writeln!(out, "- {}({}): {}", u.who, format_timestamp(&u.when), u.text);
    }
}

fn format_datetime(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Format a line timestamp, flagging approximate ones
pub fn format_timestamp(ts: &Timestamp) -> String {
    match ts {
        Timestamp::Anchored(at) => format_datetime(at),
        Timestamp::Approximate(at) => format!("~{}", format_datetime(at)),
    }
}

/// Format a duration as `1h2m3s`, `4m0s` or `5s`
pub fn format_elapsed(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attendee, Item, Topic};

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::Anchored(DateTime::parse_from_rfc3339(rfc3339).unwrap())
    }

    fn sample_meeting() -> Meeting {
        let mut meeting = Meeting::new("Standup");
        meeting.start_time = Some(DateTime::parse_from_rfc3339("2024-01-01T09:00:00+00:00").unwrap());
        for name in ["Bob", "Alice"] {
            meeting.attendees.push(Attendee {
                name: name.to_string(),
            });
        }

        let mut topic = Topic::new("Planning", at("2024-01-01T09:00:04+00:00"));
        topic.end = Some(at("2024-01-01T09:01:34+00:00"));
        topic.items.push(Item {
            by: Some("Bob".to_string()),
            text: "Discuss roadmap".to_string(),
        });
        topic.actions.push(Action {
            who: "Carol".to_string(),
            due: "2024-02-01".to_string(),
            text: "Ship the report".to_string(),
        });
        topic.non_commands.push(Utterance {
            when: at("2024-01-01T09:00:30+00:00"),
            who: "Dave".to_string(),
            text: "sounds good".to_string(),
        });
        meeting.topics.push(topic);
        meeting.end_time = Some(at("2024-01-01T09:01:34+00:00"));
        meeting
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::zero()), "0s");
        assert_eq!(format_elapsed(Duration::seconds(45)), "45s");
        assert_eq!(format_elapsed(Duration::seconds(240)), "4m0s");
        assert_eq!(format_elapsed(Duration::seconds(3723)), "1h2m3s");
        assert_eq!(format_elapsed(Duration::seconds(-90)), "-1m30s");
    }

    #[test]
    fn test_format_timestamp_flags_approximate() {
        let when = DateTime::parse_from_rfc3339("2024-01-01T09:00:00+00:00").unwrap();
        assert_eq!(format_timestamp(&Timestamp::Anchored(when)), "2024-01-01 09:00:00 +00:00");
        assert_eq!(format_timestamp(&Timestamp::Approximate(when)), "~2024-01-01 09:00:00 +00:00");
    }

    #[test]
    fn test_report_sections() {
        let meeting = sample_meeting();
        let config = RenderConfig::default();
        let report = MinutesReport::new(&meeting, &config).format();

        assert!(report.starts_with("# Standup started on 2024-01-01 09:00:00 +00:00\n"));
        assert!(report.contains("## Attendance\n- Alice\n- Bob\n"));
        assert!(report.contains("## Topic: Planning (1m30s)\n- Discuss roadmap\n"));
        assert!(report.contains("### Actions\n- Carol(2024-02-01): Ship the report\n"));
        assert!(report.contains("# All Actions\n- Carol(2024-02-01): Ship the report\n"));
        assert!(!report.contains("Non Commands"));
        assert!(!report.contains("# Unknown Commands"));
        assert!(report.ends_with("# Meeting ended at 2024-01-01 09:01:34 +00:00\n"));
    }

    #[test]
    fn test_report_non_commands_and_unsorted_attendance() {
        let meeting = sample_meeting();
        let config = RenderConfig {
            include_non_commands: true,
            sort_attendees: false,
        };
        let report = MinutesReport::new(&meeting, &config).format();

        assert!(report.contains("## Attendance\n- Bob\n- Alice\n"));
        assert!(report.contains("### Non Commands\n- Dave(2024-01-01 09:00:30 +00:00): sounds good\n"));
        assert!(report.contains("# All Non Commands\n"));
    }

    #[test]
    fn test_report_unstarted_meeting() {
        let meeting = Meeting::default();
        let config = RenderConfig::default();
        let report = MinutesReport::new(&meeting, &config).format();

        assert!(report.starts_with("# not specified started on an unknown date\n"));
        assert!(report.contains("# Meeting end was not recorded"));
    }

    #[test]
    fn test_machine_minutes() {
        let meeting = sample_meeting();
        let machine = MachineMinutes::new(&meeting, None);
        assert_eq!(machine.topic_seconds, vec![Some(90)]);

        let value = serde_json::to_value(&machine).unwrap();
        assert_eq!(value["meeting"]["name"], "Standup");
        assert_eq!(value["meeting"]["chat_offset_seconds"], 0);
        assert_eq!(value["meeting"]["topics"][0]["start"]["kind"], "anchored");
        assert_eq!(value["meeting"]["topics"][0]["actions"][0]["who"], "Carol");
    }
}
