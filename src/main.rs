//! Bookshelf server and seeding command

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{
    admin::Views,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    routes,
    services::Services,
    AppState,
};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Authors and books catalog server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Fill the database with generated books
    Seed {
        /// Books each configured author should end up with
        #[arg(long)]
        target: Option<i64>,
        /// Rows per INSERT statement
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);
    tracing::info!("Starting Bookshelf v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::Seed { target, batch_size } => seed(config, pool, target, batch_size).await,
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookshelf={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

async fn serve(config: AppConfig, pool: Pool<Postgres>) -> anyhow::Result<()> {
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let repository = Repository::new(pool.clone());
    let state = AppState {
        services: Arc::new(Services::new(&repository)),
        views: Arc::new(Views::new().context("Failed to compile templates")?),
        config: Arc::new(config),
        pool,
    };

    let app = routes::create_app(state);

    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn seed(
    config: AppConfig,
    pool: Pool<Postgres>,
    target: Option<i64>,
    batch_size: Option<usize>,
) -> anyhow::Result<()> {
    let mut seeder_config = config.seeder.clone();
    if let Some(target) = target {
        seeder_config.target_books_per_author = target;
    }
    if let Some(batch_size) = batch_size {
        seeder_config.batch_size = batch_size;
    }

    let repository = Repository::new(pool);
    let report = Services::new(&repository)
        .seeder(seeder_config)
        .run()
        .await
        .context("Seeding failed")?;

    for author in &report.authors {
        println!("{}: +{} books (total: {})", author.author, author.created, author.total);
    }
    println!(
        "Created {} books in {:.2}s ({:.0} books/s)",
        report.created,
        report.elapsed.as_secs_f64(),
        report.books_per_second()
    );

    Ok(())
}
