mod demo;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use fyrest_lib::RestConfig;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fyrest", about = "Typed TypeScript clients for axum route declarations", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE, -vvvv TRACE with file/line)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print API TypeScript types and fetch functions
    RestAll,
    /// Serve the demo API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
}

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): no subscriber
/// - 1 (-v): INFO (route declarations)
/// - 2 (-vv): DEBUG (type registration, handled requests)
/// - 3+ (-vvv): TRACE
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    if verbose == 0 {
        return;
    }

    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            1 => "warn,fyrest=info,fyrest_lib=info".to_string(),
            2 => "info,fyrest=debug,fyrest_lib=debug".to_string(),
            _ => "debug,fyrest=trace,fyrest_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RestConfig> {
    let config = match path {
        Some(path) => RestConfig::from_path(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display()))?,
        None => RestConfig::default(),
    };
    Ok(config.with_env_overrides())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    let api = demo::build(config).wrap_err("Failed to declare demo routes")?;

    match cli.command {
        Command::RestAll => {
            api.write_client_module(&mut io::stdout().lock())
                .wrap_err("Failed to write client module")?;
        }
        Command::Serve { addr } => {
            let client_path = api.config().client_path.clone();
            let router = api.into_router();
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .wrap_err_with(|| format!("Failed to bind {addr}"))?;
            tracing::info!(%addr, %client_path, "serving demo API");
            axum::serve(listener, router).await.wrap_err("Server error")?;
        }
    }

    Ok(())
}
