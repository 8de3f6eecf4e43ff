//! Lovenote CLI and REST API entry point.
//!
//! Binary name: `lovenote`
//!
//! Parses CLI arguments, initializes logging, database and services, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use lovenote_core::service::confession::SearchCriteria;
use lovenote_observe::tracing_setup::{default_directive, init_tracing, shutdown_tracing};

use cli::{AdminCommand, Cli, Commands, DraftCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(default_directive(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: logging setup failed: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "lovenote", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Confess { no_enhance } => {
            cli::confess::confess(&state, no_enhance, json).await?;
        }

        Commands::Show { code } => {
            cli::confession::show(&state, &code, json).await?;
        }

        Commands::Feed { limit, offset } => {
            cli::confession::feed(&state, limit, offset, json).await?;
        }

        Commands::Search {
            college,
            department,
            year,
            name,
        } => {
            let criteria = SearchCriteria {
                college,
                department,
                year,
                name,
            };
            cli::confession::search(&state, criteria, json).await?;
        }

        Commands::React { code, reaction } => {
            cli::confession::react(&state, &code, &reaction, json).await?;
        }

        Commands::Admin { command } => match command {
            AdminCommand::List { status } => cli::admin::list(&state, status, json).await?,
            AdminCommand::Approve { id } => {
                cli::admin::moderate(&state, &id, "approved", json).await?;
            }
            AdminCommand::Reject { id } => {
                cli::admin::moderate(&state, &id, "rejected", json).await?;
            }
            AdminCommand::Moderate { id, status } => {
                cli::admin::moderate(&state, &id, &status, json).await?;
            }
            AdminCommand::Stats => cli::admin::stats(&state, json).await?,
            AdminCommand::IssueKey { name } => cli::admin::issue_key(&state, &name, json).await?,
        },

        Commands::Draft { command } => match command {
            DraftCommand::Show => cli::draft::show(&state, json).await?,
            DraftCommand::Clear => cli::draft::clear(&state, json).await?,
        },

        Commands::Countdown => cli::countdown::countdown(&state, json)?,

        Commands::Serve { port, host } => serve(state, &host, port).await?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    if state.config.admin.enabled {
        // Print the first admin key once; later runs reuse the stored hash.
        if let Some(api_key) = http::extractors::auth::ensure_api_key(&state.db_pool).await? {
            println!();
            println!(
                "  {} Admin API key generated (save this, it won't be shown again):",
                console::style("🔑").bold()
            );
            println!();
            println!("  {}", console::style(&api_key).yellow().bold());
            println!();
        }
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} {} listening on {}",
        console::style("💌").bold(),
        state.config.app_name,
        console::style(format!("http://{addr}")).cyan()
    );
    if state.enhancer.is_none() {
        println!(
            "  {}",
            console::style("Message polishing is off (no API key configured)").dim()
        );
    }
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    tracing::info!(%addr, admin = state.config.admin.enabled, "server started");
    let sweeper = state.spawn_wizard_sweeper();
    let router = http::router::build_router(state);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
}
