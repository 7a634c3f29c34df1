//! CLI binary for ElderEase.

use clap::{Parser, Subcommand};
use elderease::AssistantConfig;
use elderease::account::AccountStore;
use elderease::assistant::Assistant;
use elderease::care_plan::CarePlan;
use elderease::completion::GeminiProvider;
use elderease::persona;
use elderease::speech::{NullSpeech, SimulatedSpeech, SpeechIo};
use std::io::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ElderEase: conversational companion assistant for elder care.
#[derive(Parser)]
#[command(name = "elderease", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speak replies aloud.
    #[arg(long)]
    speak: bool,

    /// Use simulated voice capture for the /voice command.
    #[arg(long)]
    voice: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Start an interactive conversation.
    Chat,

    /// Handle a single utterance and print the reply.
    Ask {
        /// The utterance text.
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("elderease=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        AssistantConfig::from_file(path)?
    } else {
        let path = AssistantConfig::default_config_path();
        if path.exists() {
            AssistantConfig::from_file(&path)?
        } else {
            AssistantConfig::default()
        }
    };
    if cli.speak {
        config.speech.speak_replies = true;
    }
    if cli.voice {
        config.speech.voice_enabled = true;
    }

    let plan = CarePlan::load(&CarePlan::default_path())?;
    let provider = GeminiProvider::new(&config.llm)?;
    let speech: Box<dyn SpeechIo> = if cli.voice {
        Box::new(SimulatedSpeech::new())
    } else {
        Box::new(NullSpeech)
    };
    let assistant = Assistant::new(config, plan, Box::new(provider), speech);

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(assistant).await,
        Command::Ask { text } => run_ask(assistant, &text).await,
    }
}

async fn run_ask(mut assistant: Assistant, text: &str) -> anyhow::Result<()> {
    let outcome = assistant.handle_utterance(text).await;
    println!("{}", outcome.turn.reply.text);
    Ok(())
}

async fn run_chat(mut assistant: Assistant) -> anyhow::Result<()> {
    println!("ElderEase v{}", env!("CARGO_PKG_VERSION"));

    let account = AccountStore::new(&AccountStore::default_root());
    let name = account.load().ok().flatten().map(|r| r.name);
    println!("{}", persona::welcome(name.as_deref()));
    println!("Type a message, or /voice, /confirm, /alerts, /quit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" => break,
            "/confirm" => match assistant.confirm_last() {
                Some(_) => println!("Confirmed!"),
                None => println!("Nothing to confirm."),
            },
            "/alerts" => {
                if assistant.alerts().is_empty() {
                    println!("No emergency alerts.");
                } else {
                    for alert in assistant.alerts().newest_first() {
                        println!(
                            "{} [{:?}] {}",
                            alert.at.format("%Y-%m-%d %H:%M:%S"),
                            alert.status,
                            alert.message
                        );
                    }
                }
            }
            "/voice" => match assistant.capture_utterance() {
                Ok(transcript) => {
                    println!("(heard) {transcript}");
                    respond(&mut assistant, &transcript).await;
                }
                Err(notice) => println!("{notice}"),
            },
            text => respond(&mut assistant, text).await,
        }
    }

    Ok(())
}

async fn respond(assistant: &mut Assistant, text: &str) {
    let outcome = assistant.handle_utterance(text).await;
    println!("{}", outcome.turn.reply.text);
    if outcome.turn.reply.is_confirmable() {
        println!("(type /confirm to confirm)");
    }
    if let Some(notice) = outcome.speech_notice {
        println!("{notice}");
    }
}
