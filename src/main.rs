mod catalog;
mod config;
mod db;
mod dedupe;
mod entities;
mod error;
mod models;
mod notifier;
mod processor;
mod routes;
mod seed;
mod sentiment;
mod session;
mod store;
mod templates;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use clap::{Parser, Subcommand};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{Config, StoreBackend},
    notifier::Notifier,
    session::SessionStore,
    store::{MemoryStore, SqlStore, Store},
};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: SessionStore,
}

#[derive(Parser, Debug)]
#[command(name = "cinemapulse", version, about = "Movie reviews with live ratings and analytics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Delete movies sharing a name with an older entry
    Dedupe {
        /// Report duplicates without deleting them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinemapulse=debug,sqlx=warn".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = Arc::new(Config::from_env()?);
    let store = open_store(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, store).await,
        Command::Dedupe { dry_run } => {
            let report = dedupe::remove_duplicate_movies(&*store, dry_run).await?;
            print!("{report}");
            Ok(())
        },
    }
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        },
        StoreBackend::Sqlite => {
            let db = db::connect_and_migrate(&config.database_url).await?;
            Arc::new(SqlStore::new(db))
        },
    };
    Ok(store)
}

async fn serve(config: Arc<Config>, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .user_agent("cinemapulse/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let notifier = notifier::from_config(&config, http)?;

    if config.seed_demo {
        seed::seed_demo(&*store).await?;
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        notifier,
        sessions: SessionStore::new(config.session_ttl_hours),
    });

    let app = app(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/about", get(routes::about))
        .route("/contact", get(routes::contact))
        .route("/register", get(routes::register_form).post(routes::register))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/logout", get(routes::logout))
        .route("/user/dashboard", get(routes::user_dashboard))
        .route("/movie/favorite/toggle/{movie_id}", post(routes::toggle_favorite))
        .route("/movie/feedback/add", post(routes::add_feedback))
        .route("/admin/login", get(routes::admin_login_form).post(routes::admin_login))
        .route("/admin/dashboard", get(routes::admin_dashboard))
        .route("/admin/movie/add", post(routes::add_movie))
        .route("/admin/movie/update", post(routes::update_movie))
        .route("/admin/movie/delete", post(routes::delete_movie))
        .route("/admin/feedback/delete", post(routes::delete_feedback))
        .with_state(state)
}
