use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use minutes::{
    BuilderConfig, ClassifierConfig, MeetingBuilder, RenderConfig, UnknownPolicy, execute_render,
    read_meeting_file,
};

#[derive(Parser)]
#[command(name = "minutes")]
#[command(author, version, about = "Meeting minutes from tagged chat transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How lines with an unrecognized keyword are filed
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Unknown only when the text starts with the marker; other text is chatter
    Marker,
    /// Every unrecognized keyword is unknown
    Keyword,
}

impl From<PolicyArg> for UnknownPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Marker => UnknownPolicy::Marker,
            PolicyArg::Keyword => UnknownPolicy::Keyword,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render meeting minutes from a transcript
    Render {
        /// Input transcript (tab-separated offset, speaker, text); stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the markdown minutes; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for machine-readable minutes (JSON)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Include non-command chatter in the minutes
        #[arg(long)]
        non: bool,

        /// Routing for unrecognized keywords
        #[arg(long, value_enum, default_value = "marker")]
        policy: PolicyArg,

        /// Character that marks text addressed to the minutes bot
        #[arg(long, default_value = "@")]
        marker: char,

        /// Keep attendees in the order they declared presence
        #[arg(long)]
        no_sort_attendees: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a transcript without rendering minutes
    Analyze {
        /// Input transcript; stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Routing for unrecognized keywords
        #[arg(long, value_enum, default_value = "marker")]
        policy: PolicyArg,

        /// Character that marks text addressed to the minutes bot
        #[arg(long, default_value = "@")]
        marker: char,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            json,
            non,
            policy,
            marker,
            no_sort_attendees,
            verbose,
        } => {
            setup_logging(verbose);
            let classifier = ClassifierConfig {
                policy: policy.into(),
                marker,
            };
            let render_config = RenderConfig {
                include_non_commands: non,
                sort_attendees: !no_sort_attendees,
            };
            render_minutes(input, output, json, &classifier, &render_config)
        }
        Commands::Analyze {
            input,
            policy,
            marker,
            verbose,
        } => {
            setup_logging(verbose);
            let classifier = ClassifierConfig {
                policy: policy.into(),
                marker,
            };
            analyze_transcript(input, &classifier)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn render_minutes(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    classifier: &ClassifierConfig,
    render_config: &RenderConfig,
) -> Result<()> {
    info!("Loading transcript from {}", describe_input(&input));
    let built = read_meeting_file(
        input.as_deref(),
        classifier,
        MeetingBuilder::new(BuilderConfig::default()),
    )
    .context("Failed to build meeting from transcript")?;

    let result = execute_render(&built, output.as_deref(), json.as_deref(), render_config)?;

    match result.markdown_path {
        Some(path) => info!("Minutes written to {:?}", path),
        None => print!("{}", result.markdown),
    }
    if let Some(path) = result.json_path {
        info!("Machine minutes written to {:?}", path);
    }

    Ok(())
}

fn analyze_transcript(input: Option<PathBuf>, classifier: &ClassifierConfig) -> Result<()> {
    info!("Analyzing transcript from {}", describe_input(&input));
    let built = read_meeting_file(
        input.as_deref(),
        classifier,
        MeetingBuilder::new(BuilderConfig::default()),
    )
    .context("Failed to build meeting from transcript")?;
    let meeting = &built.meeting;
    let stats = &built.stats;

    println!("Transcript Analysis");
    println!("===================");
    println!("Lines read: {}", stats.lines_read);
    println!("Lines skipped: {}", stats.lines_skipped);
    println!("Commands: {}", stats.commands);
    println!("Unknown commands: {}", stats.unknowns);
    println!("Non-command lines: {}", stats.non_commands);
    println!("Approximate timestamps: {}", stats.approximate_timestamps);
    println!("Final state: {:?}", built.final_state);
    println!();

    println!("Meeting");
    println!("-------");
    println!("Name: {}", meeting.name);
    match meeting.start_time {
        Some(start) => println!("Start: {}", start),
        None => println!("Start: not declared"),
    }
    match &meeting.end_time {
        Some(end) => println!("End: {}", minutes::io::format_timestamp(end)),
        None => println!("End: not recorded"),
    }
    println!("Attendance entries: {}", meeting.attendees.len());
    println!();

    println!("Topics");
    println!("------");
    for topic in &meeting.topics {
        let elapsed = topic
            .elapsed()
            .map(minutes::io::format_elapsed)
            .unwrap_or_else(|| "open".to_string());
        println!(
            "{} ({}): {} items, {} actions, {} decisions, {} non-commands",
            topic.name,
            elapsed,
            topic.items.len(),
            topic.actions.len(),
            topic.decisions.len(),
            topic.non_commands.len()
        );
    }

    Ok(())
}

fn describe_input(input: &Option<PathBuf>) -> String {
    match input {
        Some(path) => format!("{:?}", path),
        None => "stdin".to_string(),
    }
}
