// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Runk command-line client.
//!
//! Connects a Strava account through the Runk backend, shows the session
//! state, triggers territory syncs and exports the territory map.

use anyhow::Context;
use clap::{Parser, Subcommand};
use runk_client::{
    auth::{complete_callback, CallbackOutcome},
    config::Config,
    db::CachedUserStore,
    error::AppError,
    map::{GeoJsonWidget, TerritoryMap, ViewMode},
    models::DashboardStats,
    services::CallbackParams,
    time_utils::today,
    AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runk", version, about = "Runk territory client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Strava authorization URL to open in a browser
    Login,
    /// Complete the OAuth callback with the code Strava returned
    Callback {
        #[arg(long)]
        code: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        scope: Option<String>,
    },
    /// Reconcile and show the session state
    Status,
    /// Expire the session cookies locally
    Logout,
    /// Force a territory sync (once per calendar day)
    Sync,
    /// Clear today's sync marker
    SyncReset,
    /// Fetch territories and export them as GeoJSON
    Territories {
        #[arg(long, value_enum, default_value_t = ViewMode::Satellite)]
        view: ViewMode,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the OAuth callback and dashboard on the frontend origin
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_logging(config.is_production);

    let state = AppState::open(config).context("Failed to open local state")?;
    run(cli.command, Arc::new(state)).await
}

async fn run(command: Command, state: Arc<AppState>) -> anyhow::Result<()> {
    match command {
        Command::Login => {
            let redirect = state.session.login().await?;
            println!("Open this URL to connect your Strava account:\n{}", redirect.url());
        }
        Command::Callback { code, state: oauth_state, scope } => {
            let params = CallbackParams {
                code: Some(code),
                state: oauth_state,
                scope,
            };
            match complete_callback(&state.api, &params).await? {
                CallbackOutcome::NoCode => println!("No authorization code, nothing to do"),
                CallbackOutcome::Connected { user, message, cookies_set } => {
                    CachedUserStore::new(&state.local_store).save(&user);
                    println!("{} ({})", message, user.name);
                    if !cookies_set {
                        eprintln!("warning: backend did not set session cookies");
                    }
                    state.session.refresh().await;
                }
            }
        }
        Command::Status => {
            let session = state.session.refresh().await;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Command::Logout => {
            state.session.logout();
            CachedUserStore::new(&state.local_store).clear();
            println!("Logged out");
        }
        Command::Sync => {
            let user_id = require_user_id(&state).await?;
            let response = state.sync.sync(&user_id, today()).await?;
            println!("{}", response.message);
        }
        Command::SyncReset => {
            let user_id = require_user_id(&state).await?;
            state.sync.gate().reset(&user_id)?;
            println!("Sync marker cleared");
        }
        Command::Territories { view, out } => {
            let user_id = require_user_id(&state).await?;
            let territories = state.api.get_territories(&user_id).await?.territories;

            let mut map = TerritoryMap::new(GeoJsonWidget::new(), view);
            map.set_territories(&territories, false);
            let geojson = serde_json::to_string_pretty(&map.widget().to_geojson())?;
            map.dispose();

            match out {
                Some(path) => std::fs::write(&path, geojson)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", geojson),
            }

            let stats = DashboardStats::new(&territories, state.session.user().as_ref());
            eprintln!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Serve => serve(state).await?,
    }
    Ok(())
}

/// Reconcile the session and return the `userId` cookie.
async fn require_user_id(state: &AppState) -> Result<String, AppError> {
    if !state.session.refresh().await.is_authenticated() {
        return Err(AppError::NotAuthenticated);
    }
    state
        .session
        .cookie_snapshot()
        .user_id()
        .map(str::to_string)
        .ok_or(AppError::NotAuthenticated)
}

async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", state.config.port);
    tracing::info!(
        address = %addr,
        callback_url = %state.config.strava_callback_url(),
        backend_url = %state.config.backend_url,
        "Starting local Runk server"
    );

    let app = runk_client::routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize logging: JSON in production, compact text otherwise.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("runk_client=debug,info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
