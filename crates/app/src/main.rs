use std::fmt;
use std::path::PathBuf;

use drill_core::model::ChatId;
use services::{ChatTransport, DrillService};
use storage::{DEFAULT_QUESTIONS_PATH, JsonFileSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod console;

use console::{ConsoleTransport, parse_line};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidChatId { raw: String },
    InvalidQuestionsPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidChatId { raw } => write!(f, "invalid --chat-id value: {raw}"),
            ArgsError::InvalidQuestionsPath { raw } => {
                write!(f, "invalid --questions value: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  card-drill [--questions <path>] [--chat-id <id>]");
    eprintln!();
    eprintln!("Input lines are `<chat_id> <text>` or `<text>` for the default chat.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions {DEFAULT_QUESTIONS_PATH}");
    eprintln!("  --chat-id 1");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  DRILL_QUESTIONS_PATH, DRILL_CHAT_ID, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    questions_path: PathBuf,
    chat_id: ChatId,
}

impl Args {
    /// Environment values first, then flags on top.
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut questions_path = env("DRILL_QUESTIONS_PATH")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH), PathBuf::from);
        let mut chat_id = match env("DRILL_CHAT_ID") {
            Some(raw) => parse_chat_id(raw)?,
            None => ChatId::new(1),
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidQuestionsPath { raw: value });
                    }
                    questions_path = PathBuf::from(value);
                }
                "--chat-id" => {
                    let value = require_value(&mut args, "--chat-id")?;
                    chat_id = parse_chat_id(value)?;
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self {
            questions_path,
            chat_id,
        }))
    }
}

fn parse_chat_id(raw: String) -> Result<ChatId, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidChatId { raw })
}

fn init_tracing() {
    // Logs go to stderr so they never mix with chat output on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            log_fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Read stdin until EOF or Ctrl-C, dispatching each line.
async fn serve(
    service: &DrillService,
    transport: &dyn ChatTransport,
    default_chat: ChatId,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed, shutting down");
                    break;
                };
                let Some(message) = parse_line(&line, default_chat) else {
                    continue;
                };
                // A failed update is logged; the loop keeps receiving.
                if let Err(err) = service.handle(transport, &message).await {
                    error!(chat = %message.chat_id, error = %err, "failed to handle message");
                }
            }
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    let args = match parsed {
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
        Parsed::Run(args) => args,
    };

    let source = JsonFileSource::new(&args.questions_path);
    let service = DrillService::from_source(&source).await?;

    let transport = ConsoleTransport::stdout();
    service.publish_commands(&transport).await?;
    info!(
        questions = %args.questions_path.display(),
        default_chat = %args.chat_id,
        "card drill ready, press Ctrl+C to stop"
    );

    serve(&service, &transport, args.chat_id).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let parsed = Args::parse(Vec::new(), no_env).unwrap();
        assert_eq!(
            parsed,
            Parsed::Run(Args {
                questions_path: PathBuf::from(DEFAULT_QUESTIONS_PATH),
                chat_id: ChatId::new(1),
            })
        );
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "DRILL_QUESTIONS_PATH" => Some("env.json".to_owned()),
            "DRILL_CHAT_ID" => Some("9".to_owned()),
            _ => None,
        };

        let parsed = Args::parse(args(&["--chat-id", "-100"]), env).unwrap();
        assert_eq!(
            parsed,
            Parsed::Run(Args {
                questions_path: PathBuf::from("env.json"),
                chat_id: ChatId::new(-100),
            })
        );

        let parsed = Args::parse(args(&["--questions", "cli.json"]), env).unwrap();
        let Parsed::Run(parsed) = parsed else {
            panic!("expected run");
        };
        assert_eq!(parsed.questions_path, PathBuf::from("cli.json"));
        assert_eq!(parsed.chat_id, ChatId::new(9));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            Args::parse(args(&["--chat-id"]), no_env).unwrap_err(),
            ArgsError::MissingValue { flag: "--chat-id" }
        );
        assert_eq!(
            Args::parse(args(&["--chat-id", "abc"]), no_env).unwrap_err(),
            ArgsError::InvalidChatId { raw: "abc".into() }
        );
        assert_eq!(
            Args::parse(args(&["--questions", " "]), no_env).unwrap_err(),
            ArgsError::InvalidQuestionsPath { raw: " ".into() }
        );
        assert_eq!(
            Args::parse(args(&["--verbose"]), no_env).unwrap_err(),
            ArgsError::UnknownArg("--verbose".into())
        );
    }

    #[test]
    fn help_flag_short_circuits() {
        assert_eq!(Args::parse(args(&["-h", "--bogus"]), no_env).unwrap(), Parsed::Help);
    }
}
