// chat-context/crates/chat-context/src/main.rs

#[cfg(feature = "cli")]
use anyhow::Context;
#[cfg(feature = "cli")]
use chat_context::{telemetry, ContextConfig, ContextPipeline, Message, SessionContextConfig};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "chat-context", version, about = "Keyword, window and summary tooling for chat histories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Command {
    /// Extract keywords from a piece of text
    Keywords {
        text: String,
        #[arg(long)]
        max: Option<usize>,
    },
    /// Print the selected context window as JSON
    Select(WindowArgs),
    /// Print the session summary for a message history
    Summarize {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long)]
        max_length: Option<usize>,
    },
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct WindowArgs {
    /// JSON array of message records
    file: PathBuf,
    #[arg(long)]
    window: Option<usize>,
    /// Plain recency window instead of smart selection
    #[arg(long)]
    recency: bool,
    /// Recompute keywords from content before selecting
    #[arg(long)]
    enrich: bool,
}

#[cfg(feature = "cli")]
fn load_messages(pipeline: &ContextPipeline, args: &WindowArgs) -> anyhow::Result<Vec<Message>> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let records: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", args.file.display()))?;
    let messages = Message::from_records(&records)?;

    Ok(if args.enrich {
        messages.into_iter().map(|m| pipeline.enrich_on_ingest(m)).collect()
    } else {
        messages
    })
}

#[cfg(feature = "cli")]
fn session_settings(config: &ContextConfig, args: &WindowArgs) -> SessionContextConfig {
    let mut settings = config.session_defaults();
    if let Some(window) = args.window {
        settings.window_size = window;
    }
    if args.recency {
        settings.smart_selection = false;
    }
    settings
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    let _ = telemetry::init_tracing();

    let cli = Cli::parse();
    let config = ContextConfig::from_env().context("invalid context configuration")?;
    let pipeline = ContextPipeline::from_config(&config)?;

    match cli.command {
        Command::Keywords { text, max } => {
            let keywords = pipeline.extract_keywords(&text, max.unwrap_or(config.max_keywords));
            println!("{}", serde_json::to_string(&keywords)?);
        }
        Command::Select(args) => {
            let messages = load_messages(&pipeline, &args)?;
            let settings = session_settings(&config, &args);
            let selected = pipeline.select_messages(&messages, settings.window_size, settings.smart_selection);
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        Command::Summarize { window, max_length } => {
            let messages = load_messages(&pipeline, &window)?;
            let mut settings = session_settings(&config, &window);
            settings.summary_enabled = true;
            if let Some(max_length) = max_length {
                settings.max_summary_length = max_length;
            }
            if let Some(summary) = pipeline.recompute_summary(&settings, &messages) {
                println!("{}", summary);
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Enable with --features cli");
}
