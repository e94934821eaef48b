use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, QuestionBankLoader, QuestionSource, QuizFlowService};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_QUESTIONS: &str = "assets/data.json";
const DEFAULT_STORE: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidStoreUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStoreUrl { raw } => write!(f, "invalid --store value: {raw}"),
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

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        self.services.quiz_flow()
    }
}

struct Args {
    questions: QuestionSource,
    store_url: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui         [--questions <path|url>] [--store <sqlite_url|memory>]");
    eprintln!("  cargo run -p app -- categories [--questions <path|url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions {DEFAULT_QUESTIONS}");
    eprintln!("  --store {DEFAULT_STORE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_STORE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Categories,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut questions = std::env::var("QUIZ_QUESTIONS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QUESTIONS.to_string());
        let mut store_url = std::env::var("QUIZ_STORE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_STORE.to_string(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => questions = require_value(args, "--questions")?,
                "--store" => {
                    let value = require_value(args, "--store")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidStoreUrl { raw: value }.into());
                    }
                    store_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg).into()),
            }
        }

        Ok(Self {
            questions: QuestionSource::parse(&questions)?,
            store_url,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "memory" || trimmed == DEFAULT_STORE {
        return DEFAULT_STORE.to_string();
    }
    if trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(store_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if store_url == DEFAULT_STORE {
        return Ok(());
    }

    let path = store_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidStoreUrl {
            raw: store_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidStoreUrl {
            raw: store_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?;

    init_logging()?;

    match cmd {
        Command::Categories => {
            let bank = QuestionBankLoader::new(parsed.questions).fetch_bank().await?;
            for name in bank.category_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Ui => {
            prepare_sqlite_file(&parsed.store_url)?;
            let services =
                AppServices::new_sqlite(&parsed.store_url, parsed.questions, Clock::default_clock())
                    .await?;
            info!(
                questions = %services.quiz_flow().loader().source(),
                store = %parsed.store_url,
                "launching quiz"
            );

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window; turn it off explicitly.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, Box<dyn std::error::Error>> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn memory_store_aliases() {
        assert_eq!(normalize_sqlite_url("memory".into()), DEFAULT_STORE);
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), DEFAULT_STORE);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.sqlite3".into()),
            "sqlite:///tmp/quiz.sqlite3"
        );
        assert_eq!(
            normalize_sqlite_url("/tmp/quiz.sqlite3".into()),
            "sqlite:///tmp/quiz.sqlite3"
        );
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--questions", "https://example.com/q.json", "--store", "memory"]).unwrap();
        assert!(matches!(args.questions, QuestionSource::Remote(_)));
        assert_eq!(args.store_url, DEFAULT_STORE);
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse(&["--deck"]).is_err());
        assert!(parse(&["--questions"]).is_err());
        assert!(parse(&["--store", " "]).is_err());
    }

    #[test]
    fn subcommands() {
        assert_eq!(Command::from_arg("ui"), Some(Command::Ui));
        assert_eq!(Command::from_arg("categories"), Some(Command::Categories));
        assert_eq!(Command::from_arg("seed"), None);
    }
}
