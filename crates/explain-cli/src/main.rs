mod commands;

use clap::Parser;
use explain_core::config::MODEL_PATH_ENV;
use explain_core::prompt::Mode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: explain-me -f <file_path> OR -d <directory_path> [--prompt \"your prompt\"] [--summary] [--bug-check] [--chat-mode]";

#[derive(Parser)]
#[command(
    name = "explain-me",
    version,
    about = "Ask a local language model to explain, summarize, or bug-check source files"
)]
struct Cli {
    /// Path to a single file to analyze
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,
    /// Path to a directory to analyze all files (not recursive)
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    dir: Option<PathBuf>,
    /// Custom prompt to use instead of the built-in instructions
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,
    /// Summarize the code in English
    #[arg(long)]
    summary: bool,
    /// Analyze the code for bugs and bad practices
    #[arg(long)]
    bug_check: bool,
    /// Start the model in interactive chat mode
    #[arg(long)]
    chat_mode: bool,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
    /// Config file (default: ~/.explain-me/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// What a parsed command line asks for.
#[derive(Debug, PartialEq)]
enum Action {
    Chat,
    File(PathBuf),
    Dir(PathBuf),
}

impl Cli {
    /// Chat mode wins over `--file`, which wins over `--dir`. `None` when no
    /// action was given.
    fn action(&self) -> Option<Action> {
        if self.chat_mode {
            Some(Action::Chat)
        } else if let Some(ref file) = self.file {
            Some(Action::File(file.clone()))
        } else {
            self.dir.clone().map(Action::Dir)
        }
    }

    fn options(&self) -> commands::explain::Options<'_> {
        commands::explain::Options {
            instruction: self.prompt.as_deref().unwrap_or(""),
            mode: Mode::from_flags(self.summary, self.bug_check),
            json: self.json,
        }
    }
}

fn run(cli: &Cli, action: Action) -> anyhow::Result<()> {
    let setup = commands::Setup::load(cli.config.as_deref(), std::env::var(MODEL_PATH_ENV).ok())?;
    let runner = setup.runner();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let output = commands::explain::Output {
        out: &mut stdout,
        err: &mut stderr,
    };

    match action {
        Action::Chat => commands::chat::run(&setup),
        Action::File(file) => commands::explain::run_file(&runner, &file, &cli.options(), output),
        Action::Dir(dir) => commands::explain::run_dir(&runner, &dir, &cli.options(), output),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    dotenvy::dotenv().ok();

    let Some(action) = cli.action() else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    if let Err(e) = run(&cli, action) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
