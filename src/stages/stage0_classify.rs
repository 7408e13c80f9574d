use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ClassifiedLine, Command, LineKind};

/// Runs of tabs separate the offset, speaker and text fields
static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("field separator pattern is valid"));

/// How lines with an unrecognized keyword are filed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Unknown only when the text starts with the marker; otherwise chatter
    #[default]
    Marker,
    /// Every unrecognized keyword is unknown; no chatter is kept
    Keyword,
}

/// Configuration for Stage 0 classification
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub policy: UnknownPolicy,
    /// Character that addresses the minutes bot
    pub marker: char,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            policy: UnknownPolicy::Marker,
            marker: '@',
        }
    }
}

/// Split a raw line into (offset, speaker, text)
///
/// Returns `None` when the line has fewer than three tab-separated fields.
/// Tabs inside the text field are kept.
pub fn split_fields(raw: &str) -> Option<(&str, &str, &str)> {
    let mut parts = FIELD_SEPARATOR.splitn(raw.trim(), 3);
    let offset = parts.next()?;
    let speaker = parts.next()?;
    let text = parts.next()?;

    let speaker = speaker.strip_suffix(':').unwrap_or(speaker);
    Some((offset, speaker, text))
}

/// Execute Stage 0: classify one raw transcript line
///
/// Malformed lines are skipped (`None`), never an error.
pub fn classify_line(raw: &str, config: &ClassifierConfig) -> Option<ClassifiedLine> {
    let (offset, speaker, text) = split_fields(raw)?;

    let (head, argument) = match text.split_once(' ') {
        Some((head, rest)) => (head, Some(rest)),
        None => (text, None),
    };
    let keyword = head.trim();

    let kind = match Command::from_keyword(keyword) {
        Some(command) => LineKind::Command(command),
        None => match config.policy {
            UnknownPolicy::Marker if !text.starts_with(config.marker) => LineKind::NonCommand,
            _ => LineKind::Unknown,
        },
    };

    Some(ClassifiedLine {
        offset: offset.to_string(),
        speaker: speaker.to_string(),
        text: text.to_string(),
        keyword: keyword.to_string(),
        argument: argument.map(str::to_string),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(
            split_fields("0:00:01\tAlice:\t@item Discuss roadmap"),
            Some(("0:00:01", "Alice", "@item Discuss roadmap"))
        );
        assert_eq!(
            split_fields("  0:00:01\t\t\tBob\t\thello\tthere  "),
            Some(("0:00:01", "Bob", "hello\tthere"))
        );
    }

    #[test]
    fn test_split_fields_strips_one_colon() {
        assert_eq!(split_fields("1:2:3\tBob::\thi"), Some(("1:2:3", "Bob:", "hi")));
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let config = ClassifierConfig::default();
        assert_eq!(classify_line("", &config), None);
        assert_eq!(classify_line("0:00:01", &config), None);
        assert_eq!(classify_line("0:00:01\tAlice:", &config), None);
        assert_eq!(classify_line("0:00:01 Alice: @here", &config), None);
    }

    #[test]
    fn test_classify_command() {
        let config = ClassifierConfig::default();
        let line = classify_line("0:00:05\tBob:\t@topic Planning next sprint", &config).unwrap();

        assert_eq!(line.offset, "0:00:05");
        assert_eq!(line.speaker, "Bob");
        assert_eq!(line.keyword, "@topic");
        assert_eq!(line.argument.as_deref(), Some("Planning next sprint"));
        assert_eq!(line.command(), Some(Command::Topic));
    }

    #[test]
    fn test_classify_command_without_argument() {
        let config = ClassifierConfig::default();
        let line = classify_line("0:00:05\tBob:\t@here", &config).unwrap();

        assert_eq!(line.kind, LineKind::Command(Command::Here));
        assert_eq!(line.argument, None);
        assert_eq!(line.argument_or_empty(), "");
    }

    #[test]
    fn test_marker_policy() {
        let config = ClassifierConfig::default();

        let unknown = classify_line("0:00:05\tBob:\t@vote yes", &config).unwrap();
        assert_eq!(unknown.kind, LineKind::Unknown);

        let chatter = classify_line("0:00:06\tBob:\tsounds good to me", &config).unwrap();
        assert_eq!(chatter.kind, LineKind::NonCommand);
        assert_eq!(chatter.keyword, "sounds");
    }

    #[test]
    fn test_keyword_policy() {
        let config = ClassifierConfig {
            policy: UnknownPolicy::Keyword,
            ..Default::default()
        };

        let chatter = classify_line("0:00:06\tBob:\tsounds good to me", &config).unwrap();
        assert_eq!(chatter.kind, LineKind::Unknown);

        let command = classify_line("0:00:07\tBob:\t@item agreed", &config).unwrap();
        assert_eq!(command.kind, LineKind::Command(Command::Item));
    }

    #[test]
    fn test_custom_marker() {
        let config = ClassifierConfig {
            marker: '!',
            ..Default::default()
        };

        let unknown = classify_line("0:00:05\tBob:\t!vote yes", &config).unwrap();
        assert_eq!(unknown.kind, LineKind::Unknown);

        let chatter = classify_line("0:00:05\tBob:\t@vote yes", &config).unwrap();
        assert_eq!(chatter.kind, LineKind::NonCommand);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let config = ClassifierConfig::default();
        let raw = "0:00:10\tCarol:\t@action Carol 2024-02-01 Ship the report";

        assert_eq!(classify_line(raw, &config), classify_line(raw, &config));
    }
}
