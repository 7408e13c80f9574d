use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{MachineMinutes, MinutesReport};
use crate::stages::BuildResult;

/// Configuration for Stage 2 rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Include chatter that carried no command
    pub include_non_commands: bool,
    /// Sort the attendance list by name
    pub sort_attendees: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_non_commands: false,
            sort_attendees: true,
        }
    }
}

/// Result of Stage 2 rendering
#[derive(Debug)]
pub struct RenderResult {
    /// Markdown minutes, always rendered
    pub markdown: String,
    /// Path to markdown minutes (if written)
    pub markdown_path: Option<PathBuf>,
    /// Path to machine minutes (if written)
    pub json_path: Option<PathBuf>,
}

/// Execute Stage 2: Rendering
///
/// Produces two views of the finished meeting:
/// 1. Markdown minutes, returned and optionally written to a file
/// 2. Machine minutes: JSON with the full meeting record and build stats
pub fn execute_render(
    built: &BuildResult,
    markdown_output: Option<&Path>,
    json_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let report = MinutesReport::new(&built.meeting, config);
    let mut result = RenderResult {
        markdown: report.format(),
        markdown_path: None,
        json_path: None,
    };

    if let Some(path) = markdown_output {
        info!("Writing minutes to {:?}", path);
        report.write_file(path)?;
        result.markdown_path = Some(path.to_path_buf());
    }

    if let Some(path) = json_output {
        info!("Writing machine minutes to {:?}", path);
        MachineMinutes::new(&built.meeting, Some(&built.stats)).write_json(path)?;
        result.json_path = Some(path.to_path_buf());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meeting;
    use crate::stages::{BuildStats, MeetingState};

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert!(!config.include_non_commands);
        assert!(config.sort_attendees);
    }

    #[test]
    fn test_render_without_outputs() {
        let built = BuildResult {
            meeting: Meeting::new("Retro"),
            stats: BuildStats::default(),
            final_state: MeetingState::NotStarted,
        };
        let result = execute_render(&built, None, None, &RenderConfig::default()).unwrap();

        assert!(result.markdown.starts_with("# Retro started on"));
        assert!(result.markdown_path.is_none());
        assert!(result.json_path.is_none());
    }
}
