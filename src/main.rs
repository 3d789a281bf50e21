use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use dlp_guard::cli;

#[derive(Parser)]
#[command(name = "dlp-guard", version, about = "Pattern and similarity based DLP decisions")]
struct Cli {
    /// Config file (default: .dlp-guard/config.yml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the sensitive-document index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
    /// Detect and mask structured PII
    Analyze {
        /// Text to analyze (stdin when omitted)
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Decide ALLOW / HOLD_FOR_REVIEW / BLOCK by similarity to the index
    Decide {
        /// Text to check (stdin when omitted)
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Preview extracted text of every file under a folder
    Extract { path: PathBuf },
}

#[derive(Subcommand)]
enum IndexAction {
    /// Embed every document under a folder, replacing the index
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Embed documents not yet in the index
    Add {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Load the persisted index and list its documents
    Load,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(args).await {
        cli::print_failure(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: Cli) -> dlp_guard::Result<()> {
    let config_path = args.config.as_deref();
    match args.command {
        Command::Analyze { text, file } => cli::analyze::run_analyze(text, file.as_deref()),
        Command::Extract { path } => cli::extract::run(&path),
        Command::Index { action } => {
            let config = cli::load_config(config_path)?;
            match action {
                IndexAction::Init { path } => cli::index::run_init(&config, path).await,
                IndexAction::Add { path } => cli::index::run_add(&config, path).await,
                IndexAction::Load => cli::index::run_load(&config).await,
            }
        }
        Command::Decide { text, file } => {
            let config = cli::load_config(config_path)?;
            cli::analyze::run_decide(&config, text, file.as_deref()).await
        }
    }
}
