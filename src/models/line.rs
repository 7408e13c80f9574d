use serde::Serialize;

/// A recognized command keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Declare presence (`@here`)
    Here,
    /// Start the meeting (`@startmeeting`)
    StartMeeting,
    /// End the meeting (`@endmeeting`)
    EndMeeting,
    /// Switch to a new topic (`@topic`)
    Topic,
    /// Note an item (`@item`)
    Item,
    /// Record a decision (`@decision`)
    Decision,
    /// Record an action (`@action`)
    Action,
}

impl Command {
    /// Look up a keyword; matching is exact and case-sensitive
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "@here" => Some(Command::Here),
            "@startmeeting" | "@start-meeting" => Some(Command::StartMeeting),
            "@endmeeting" | "@end-meeting" => Some(Command::EndMeeting),
            "@topic" => Some(Command::Topic),
            "@item" => Some(Command::Item),
            "@decision" => Some(Command::Decision),
            "@action" => Some(Command::Action),
            _ => None,
        }
    }

    /// Canonical keyword for this command
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Here => "@here",
            Command::StartMeeting => "@startmeeting",
            Command::EndMeeting => "@endmeeting",
            Command::Topic => "@topic",
            Command::Item => "@item",
            Command::Decision => "@decision",
            Command::Action => "@action",
        }
    }
}

/// How a transcript line will be filed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Command(Command),
    Unknown,
    NonCommand,
}

/// A well-formed transcript line split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    /// Raw `H:M:S` transcript offset
    pub offset: String,
    /// Speaker, without a trailing colon
    pub speaker: String,
    /// Full text after the speaker
    pub text: String,
    /// First space-delimited token of the text
    pub keyword: String,
    /// Text after the first space, if any
    pub argument: Option<String>,
    pub kind: LineKind,
}

impl ClassifiedLine {
    /// Argument text, or the empty string when the command had none
    pub fn argument_or_empty(&self) -> &str {
        self.argument.as_deref().unwrap_or("")
    }

    pub fn command(&self) -> Option<Command> {
        match self.kind {
            LineKind::Command(command) => Some(command),
            _ => None,
        }
    }
}
