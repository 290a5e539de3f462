mod commands;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use docdesk::logging::{self, LogFormat};
use docdesk::DocumentType;

use state::{AppState, Overrides};

#[derive(Parser)]
#[command(name = "docdesk", version, about = "Manage documents in a remote document store")]
struct Cli {
    /// Config file (JSON, or YAML for .yaml/.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token; takes priority over configured sources
    #[arg(long, global = true)]
    token: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    log_format: OutputFormat,

    /// Log filter, e.g. `docdesk=debug` (defaults to RUST_LOG, then info)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Human,
    Json,
}

impl From<OutputFormat> for LogFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => LogFormat::Human,
            OutputFormat::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh and print the document table
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Fetch a document's content into a temporary file
    View {
        id: String,
        /// Keep a copy at this path (or in this directory)
        #[arg(long)]
        keep: Option<PathBuf>,
    },
    /// Delete a document after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Upload a file as a new document
    Upload {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type", value_parser = parse_document_type)]
        document_type: Option<DocumentType>,
    },
}

fn parse_document_type(raw: &str) -> Result<DocumentType, String> {
    raw.parse()
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = LogFormat::from(cli.log_format);

    if let Err(e) = logging::init(format, cli.log_filter.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting docdesk v{}", env!("CARGO_PKG_VERSION"));

    let state = match AppState::initialize(Overrides {
        config_path: cli.config.as_deref(),
        base_url: cli.base_url.as_deref(),
        token: cli.token.as_deref(),
    }) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Using document store at {}",
        docdesk::sanitize::redact_url(&state.config.base_url)
    );

    let code = match cli.command {
        Command::List { search } => {
            commands::list_documents(&state, search.as_deref())
                .await
                .emit(format)
        }
        Command::View { id, keep } => {
            let (response, staged) = commands::view_document(&state, &id, keep).await;
            let code = response.emit(format);
            // Keep the staged file around until the user is done with it.
            if let Some(staged) = staged {
                wait_for_enter(staged.path()).await;
            }
            code
        }
        Command::Delete { id, yes } => commands::delete_document(&state, &id, yes)
            .await
            .emit(format),
        Command::Upload {
            file,
            title,
            document_type,
        } => commands::upload_document(&state, &file, title, document_type)
            .await
            .emit(format),
    };

    exit(code)
}

async fn wait_for_enter(path: &std::path::Path) {
    use tokio::io::AsyncBufReadExt;

    eprintln!("Press Enter to remove {}", path.display());
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut line).await {
        log::warn!("Failed to read from stdin: {}", e);
    }
}

fn exit(code: i32) -> ExitCode {
    if code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
