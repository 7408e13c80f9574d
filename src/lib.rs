pub mod io;
pub mod models;
pub mod stages;
pub mod timing;

pub use io::{MachineMinutes, MinutesReport, open_transcript, read_meeting, read_meeting_file};
pub use models::{Action, Attendee, ClassifiedLine, Command, Item, LineKind, Meeting, Topic, Utterance};
pub use stages::{
    BuildResult, BuildStats, BuilderConfig, ClassifierConfig, MeetingBuilder, MeetingState,
    RenderConfig, UnknownPolicy, classify_line, execute_build, execute_render,
};
pub use timing::{Clock, FixedClock, SystemClock, TimeError, Timestamp, resolve};
