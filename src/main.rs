use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use eagrab::cli::{Cli, Commands};
use eagrab::config::Config;
use eagrab::console;

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "eagrab=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "eagrab.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Menu { output: None });

    let outcome = match command {
        Commands::List { json, query } => {
            let query = Commands::join_query(&query);
            info!("Listing blobs for query: {}", query);
            console::run_list(&config, &query, json).await
        }

        Commands::Download { output, yes, query } => {
            let query = Commands::join_query(&query);
            let output = output.unwrap_or_else(|| config.download_dir.clone());
            info!("Starting download for query: {}", query);
            console::run_download(&config, &output, &query, yes).await
        }

        Commands::Menu { output } => {
            let output = output.unwrap_or_else(|| config.download_dir.clone());
            console::run_menu(&config, output).await
        }
    };

    if let Err(e) = &outcome {
        error!("eagrab failed: {:#}", e);
    }
    outcome
}
