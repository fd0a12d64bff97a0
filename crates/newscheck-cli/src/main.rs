mod display;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use newscheck_client::{CheckClient, GENERIC_ERROR_MESSAGE, Session};
use newscheck_core::{DEFAULT_NUM_SOURCES, InputType, Phase};

use crate::display::{HealthCard, ResultCard, SourceList, progress_line};

#[derive(Parser, Debug)]
#[command(
    name = "newscheck",
    version,
    about = "Check news text or article URLs against trusted sources"
)]
struct Cli {
    /// Base URL of the detection service
    #[arg(long, global = true, env = "API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit text or a URL and show the verdict
    Check {
        /// Text to check, or an article URL with `--mode url`
        content: String,
        #[arg(long, value_enum, default_value_t = Mode::Text)]
        mode: Mode,
        /// Number of reference sources to compare against (1-10)
        #[arg(long, default_value_t = DEFAULT_NUM_SOURCES)]
        num_sources: u8,
        /// Print the raw service response as JSON
        #[arg(long)]
        json: bool,
        /// Disable ANSI colours
        #[arg(long)]
        no_color: bool,
    },
    /// Show service health
    Health {
        #[arg(long)]
        json: bool,
    },
    /// List trusted source domains
    Sources {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Text,
    Url,
}

impl From<Mode> for InputType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Text => InputType::Text,
            Mode::Url => InputType::Url,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("newscheck v{}", env!("CARGO_PKG_VERSION"));

    let client = CheckClient::with_timeout(cli.api_url, Duration::from_secs(cli.timeout_secs))
        .context("building HTTP client")?;

    match cli.command {
        Command::Check {
            content,
            mode,
            num_sources,
            json,
            no_color,
        } => {
            let color = !no_color && std::io::stdout().is_terminal();
            run_check(client, content, mode.into(), num_sources, json, color).await
        }
        Command::Health { json } => {
            let health = client.health().await.context("querying service health")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                print!("{}", HealthCard(&health));
            }
            if !health.is_ready() {
                anyhow::bail!("service at {} is not ready", client.base_url());
            }
            Ok(())
        }
        Command::Sources { json } => {
            let sources = client
                .trusted_sources()
                .await
                .context("fetching trusted sources")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                print!("{}", SourceList(&sources));
            }
            Ok(())
        }
    }
}

async fn run_check(
    client: CheckClient,
    content: String,
    input_type: InputType,
    num_sources: u8,
    json: bool,
    color: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new(client).with_num_sources(num_sources)?;
    session.set_input_type(input_type);
    session.set_content(content);

    let live = !json && std::io::stderr().is_terminal();
    let mut drew = false;
    let state = session
        .submit_with(|p| {
            if live {
                eprint!("{}", progress_line(p));
                drew = true;
            }
        })
        .await;
    if drew {
        eprintln!();
    }

    if state.phase() == Phase::Succeeded {
        let resp = state.result().context("check succeeded without a result")?;
        if json {
            println!("{}", serde_json::to_string_pretty(resp)?);
        } else {
            print!("{}", ResultCard::new(resp, color));
        }
        return Ok(());
    }

    let message = state.error_message().unwrap_or(GENERIC_ERROR_MESSAGE);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": false,
                "message": message,
            }))?
        );
    }
    anyhow::bail!("{message}")
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
