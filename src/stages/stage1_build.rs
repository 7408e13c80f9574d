use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{
    Action, Attendee, ClassifiedLine, Command, Item, LineKind, Meeting, NOT_SPECIFIED, Topic,
    Utterance,
};
use crate::stages::{ClassifierConfig, classify_line};
use crate::timing::{Clock, SystemClock, Timestamp, parse_offset, parse_start_timestamp, resolve};

/// Configuration for Stage 1 meeting building
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Meeting name until a start command names it
    pub default_meeting_name: String,
    /// Name of the topic opened implicitly by content before any `@topic`
    pub default_topic_name: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_meeting_name: NOT_SPECIFIED.to_string(),
            default_topic_name: NOT_SPECIFIED.to_string(),
        }
    }
}

/// Where the builder is in the meeting lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingState {
    NotStarted,
    InMeeting,
    /// Terminal; later start, end and topic commands are filed as unknowns
    Ended,
}

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub commands: usize,
    pub unknowns: usize,
    pub non_commands: usize,
    pub approximate_timestamps: usize,
}

/// Result of Stage 1 building
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The finished meeting record
    pub meeting: Meeting,
    pub stats: BuildStats,
    pub final_state: MeetingState,
}

/// Stage 1: accumulates classified lines into a [`Meeting`]
///
/// Holds the current-topic cursor as an index into `meeting.topics`. The
/// cursor only moves forward: on `@topic`, and when content arrives before
/// any topic exists.
pub struct MeetingBuilder<C: Clock = SystemClock> {
    meeting: Meeting,
    current_topic: Option<usize>,
    state: MeetingState,
    config: BuilderConfig,
    clock: C,
    stats: BuildStats,
}

impl MeetingBuilder<SystemClock> {
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for MeetingBuilder<SystemClock> {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl<C: Clock> MeetingBuilder<C> {
    pub fn with_clock(config: BuilderConfig, clock: C) -> Self {
        Self {
            meeting: Meeting::new(config.default_meeting_name.clone()),
            current_topic: None,
            state: MeetingState::NotStarted,
            config,
            clock,
            stats: BuildStats::default(),
        }
    }

    pub fn meeting(&self) -> &Meeting {
        &self.meeting
    }

    pub fn state(&self) -> MeetingState {
        self.state
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.current_topic.and_then(|i| self.meeting.topics.get(i))
    }

    /// Classify and apply one raw transcript line
    pub fn push_line(&mut self, raw: &str, classifier: &ClassifierConfig) {
        self.stats.lines_read += 1;
        match classify_line(raw, classifier) {
            Some(line) => self.apply(&line),
            None => {
                self.stats.lines_skipped += 1;
                debug!("Skipping malformed line {}", self.stats.lines_read);
            }
        }
    }

    /// Apply one classified line to the meeting
    pub fn apply(&mut self, line: &ClassifiedLine) {
        if self.state == MeetingState::Ended && changes_timing(line) {
            debug!(
                "{} after meeting end from {}; filing as unknown",
                line.keyword, line.speaker
            );
            self.record_unknown(line);
            return;
        }

        match line.kind {
            LineKind::Command(command) => {
                self.stats.commands += 1;
                self.apply_command(command, line);
            }
            LineKind::Unknown => self.record_unknown(line),
            LineKind::NonCommand => {
                let when = self.resolve_offset(&line.offset);
                self.topic_for(&line.offset).non_commands.push(Utterance {
                    when,
                    who: line.speaker.clone(),
                    text: line.text.clone(),
                });
                self.stats.non_commands += 1;
            }
        }
    }

    /// Finish building and hand over the meeting
    pub fn finish(self) -> BuildResult {
        info!(
            "Built meeting {:?}: {} attendees, {} topics, {} unknowns",
            self.meeting.name,
            self.meeting.attendees.len(),
            self.meeting.topics.len(),
            self.meeting.unknowns.len()
        );
        if self.stats.approximate_timestamps > 0 {
            warn!(
                "{} timestamps are approximate (no meeting start or malformed offsets)",
                self.stats.approximate_timestamps
            );
        }

        BuildResult {
            meeting: self.meeting,
            stats: self.stats,
            final_state: self.state,
        }
    }

    fn apply_command(&mut self, command: Command, line: &ClassifiedLine) {
        match command {
            Command::Here => {
                let name = line
                    .argument
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .unwrap_or(&line.speaker);
                self.meeting.attendees.push(Attendee {
                    name: name.to_string(),
                });
            }
            Command::StartMeeting => self.start_meeting(line),
            Command::EndMeeting => {
                let when = self.resolve_offset(&line.offset);
                self.close_current_topic(when);
                self.meeting.end_time = Some(when);
                self.state = MeetingState::Ended;
                debug!("Meeting ended at {}", when.at());
            }
            Command::Topic => {
                let when = self.resolve_offset(&line.offset);
                self.close_current_topic(when);
                self.meeting
                    .topics
                    .push(Topic::new(line.argument_or_empty(), when));
                self.current_topic = Some(self.meeting.topics.len() - 1);
                debug!("Topic {:?} opened", line.argument_or_empty());
            }
            Command::Item => {
                let item = Item {
                    by: Some(line.speaker.clone()),
                    text: line.argument_or_empty().to_string(),
                };
                self.topic_for(&line.offset).items.push(item);
            }
            Command::Decision => {
                let decision = Item {
                    by: Some(line.speaker.clone()),
                    text: line.argument_or_empty().to_string(),
                };
                self.topic_for(&line.offset).decisions.push(decision);
            }
            Command::Action => {
                let action = split_action(line.argument_or_empty());
                self.topic_for(&line.offset).actions.push(action);
            }
        }
    }

    /// `@startmeeting <timestamp> <name>`
    fn start_meeting(&mut self, line: &ClassifiedLine) {
        match line.argument.as_deref() {
            Some(argument) => match argument.split_once(' ') {
                Some((stamp, name)) => match parse_start_timestamp(stamp) {
                    Ok(start) => {
                        self.meeting.start_time = Some(start);
                        self.meeting.name = name.to_string();
                    }
                    Err(err) => {
                        warn!("{}; using the whole argument as the meeting name", err);
                        self.meeting.start_time = None;
                        self.meeting.name = argument.to_string();
                    }
                },
                None => {
                    self.meeting.start_time = None;
                    self.meeting.name = argument.to_string();
                }
            },
            None => warn!("Meeting start from {} has no argument", line.speaker),
        }

        match parse_offset(&line.offset) {
            Ok(offset) => self.meeting.chat_offset = offset,
            Err(err) => debug!("{}; keeping previous chat offset", err),
        }

        self.state = MeetingState::InMeeting;
        info!(
            "Meeting {:?} started at {:?}",
            self.meeting.name, self.meeting.start_time
        );
    }

    fn resolve_offset(&mut self, raw_offset: &str) -> Timestamp {
        let when = resolve(
            self.meeting.start_time,
            self.meeting.chat_offset,
            raw_offset,
            &self.clock,
        );
        if when.is_approximate() {
            self.stats.approximate_timestamps += 1;
        }
        when
    }

    fn close_current_topic(&mut self, when: Timestamp) {
        if let Some(topic) = self
            .current_topic
            .and_then(|i| self.meeting.topics.get_mut(i))
        {
            topic.end = Some(when);
        }
    }

    /// The current topic, opening the default one if none exists yet
    ///
    /// A topic opened after the meeting ended is closed at its own start.
    fn topic_for(&mut self, raw_offset: &str) -> &mut Topic {
        let index = match self.current_topic {
            Some(index) => index,
            None => {
                let start = self.resolve_offset(raw_offset);
                let mut topic = Topic::new(self.config.default_topic_name.clone(), start);
                if self.state == MeetingState::Ended {
                    topic.end = Some(start);
                }
                self.meeting.topics.push(topic);
                let index = self.meeting.topics.len() - 1;
                self.current_topic = Some(index);
                index
            }
        };
        &mut self.meeting.topics[index]
    }

    fn record_unknown(&mut self, line: &ClassifiedLine) {
        let when = self.resolve_offset(&line.offset);
        self.meeting.unknowns.push(Utterance {
            when,
            who: line.speaker.clone(),
            text: line.text.clone(),
        });
        self.stats.unknowns += 1;
    }
}

/// Commands that move topic boundaries or the meeting start and end
fn changes_timing(line: &ClassifiedLine) -> bool {
    matches!(
        line.command(),
        Some(Command::StartMeeting | Command::EndMeeting | Command::Topic)
    )
}

/// Split an action argument into who, due and text
///
/// Fields fill left to right; missing trailing fields stay empty.
pub fn split_action(argument: &str) -> Action {
    let fields: Vec<&str> = argument.splitn(3, ' ').collect();
    let field = |i: usize| fields.get(i).map(|s| s.to_string()).unwrap_or_default();

    Action {
        who: field(0),
        due: field(1),
        text: field(2),
    }
}

/// Execute Stage 1: build a meeting from raw lines
pub fn execute_build<'a, C: Clock>(
    lines: impl IntoIterator<Item = &'a str>,
    classifier: &ClassifierConfig,
    mut builder: MeetingBuilder<C>,
) -> BuildResult {
    for raw in lines {
        builder.push_line(raw, classifier);
    }
    builder.finish()
}
