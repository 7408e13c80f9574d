use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::stages::{BuildResult, ClassifierConfig, MeetingBuilder};
use crate::timing::Clock;

/// Open a transcript file, or stdin when no path is given
pub fn open_transcript(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Stream transcript lines from a reader into a meeting builder
///
/// Invalid UTF-8 is replaced rather than rejected. Only a read failure is an error.
pub fn read_meeting<R: BufRead, C: Clock>(
    mut reader: R,
    classifier: &ClassifierConfig,
    mut builder: MeetingBuilder<C>,
) -> Result<BuildResult> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read transcript line")?;
        if read == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        builder.push_line(line.trim_end_matches(['\r', '\n']), classifier);
    }

    debug!("Read {} transcript lines", builder.stats().lines_read);
    Ok(builder.finish())
}

/// Read a meeting from a transcript file (or stdin)
pub fn read_meeting_file<C: Clock>(
    path: Option<&Path>,
    classifier: &ClassifierConfig,
    builder: MeetingBuilder<C>,
) -> Result<BuildResult> {
    let reader = open_transcript(path)?;
    read_meeting(reader, classifier, builder)
        .with_context(|| format!("Failed to read transcript from {:?}", path))
}
