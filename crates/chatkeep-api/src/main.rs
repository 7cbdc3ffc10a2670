//! chatkeep CLI and REST API entry point.
//!
//! Binary name: `chatkeep`
//!
//! Loads `.env`, parses CLI arguments, sets up tracing, then dispatches to a
//! command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use chatkeep_infra::config::{config_from_env, log_startup_summary, EnvConfigSource};
use chatkeep_infra::storage::JsonFileSessionStore;
use chatkeep_observe::tracing_setup::{filter_for_verbosity, init_tracing, LogFormat};

use cli::{Cli, Commands, SessionsCommand};
use state::AppState;

const DOTENV_PATH: &str = ".env";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `.env` can supply clap's `env` fallbacks.
    let env_source = EnvConfigSource::new(DOTENV_PATH);
    env_source.prime();

    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format, filter_for_verbosity(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize tracing")?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            web_dir,
        } => {
            let state = AppState::init(cli.store_dir.clone(), env_source.clone(), Some(web_dir))
                .context("Invalid configuration")?;
            log_startup_summary(&state.config.current(), &env_source);
            tracing::info!(path = %cli.store_dir.display(), "Session store");

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} chatkeep listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }

        Commands::Config => {
            let config = config_from_env().context("Invalid configuration")?;
            cli::config::show_config(&config, &env_source, &cli.store_dir, cli.json)?;
        }

        Commands::Sessions { action } => {
            let store = JsonFileSessionStore::new(&cli.store_dir);
            match action {
                SessionsCommand::List => cli::session::list_sessions(&store, cli.json).await?,
                SessionsCommand::Show { session_id } => {
                    cli::session::show_session(&store, &session_id, cli.json).await?;
                }
                SessionsCommand::Delete { session_id, force } => {
                    cli::session::delete_session(&store, &session_id, force, cli.json).await?;
                }
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
