use actix_web::web;
use clap::{Parser, Subcommand};
use std::net::TcpListener;
use std::sync::Arc;
use tracing::{error, info};

use maintenance_tracker::{
    api::job::JobService,
    client::{JobApiClient, cli::JobsCommand},
    config::{self, StoreBackend},
    db::{self, JobRepository, JobStore, MemoryJobStore},
    logging, server,
    shutdown::ShutdownCoordinator,
};

#[derive(Parser, Debug)]
#[command(name = "maintenance-tracker", about = "Maintenance job tracking service and client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Manage jobs on a running server
    Jobs {
        /// Server base URL including the /api prefix
        #[arg(long, global = true)]
        api_url: Option<String>,
        #[command(subcommand)]
        command: JobsCommand,
    },
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = config::Config::from_env().map_err(std::io::Error::other)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            logging::init(&config.log_dir)?;
            serve(config).await
        }
        Command::Jobs { api_url, command } => {
            // Job listings go to stdout; diagnostics stay on stderr
            logging::init_cli()?;
            let client = JobApiClient::new(api_url.unwrap_or_else(|| config.api_url.clone()));
            maintenance_tracker::client::cli::run(command, client)
                .await
                .map_err(|e| {
                    error!("Job command failed: {}", e);
                    std::io::Error::other(e)
                })
        }
    }
}

async fn serve(config: config::Config) -> std::io::Result<()> {
    info!("Starting maintenance-tracker application");
    info!("Configuration loaded successfully:");
    info!("  - Store backend: {:?}", config.store_backend);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - CORS allowed origins: {:?}", config.cors_allowed_origins);

    let store: Arc<dyn JobStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config.require_database_url().map_err(std::io::Error::other)?;
            let pool = db::connection::get_connection(database_url, config.max_db_connections)
                .await
                .map_err(std::io::Error::other)?;
            info!("Database connection pool established");

            // Auto-migrate when starting server
            db::migrations::run_migrations(&pool)
                .await
                .map_err(std::io::Error::other)?;

            Arc::new(JobRepository::new(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory job store; jobs are lost on exit");
            Arc::new(MemoryJobStore::new())
        }
    };

    let job_service = web::Data::new(JobService::new(store.clone()));

    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    info!("Server starting on http://{}", listener.local_addr()?);

    let server = server::run(
        job_service,
        listener,
        config.max_payload_size,
        config.cors_allowed_origins.clone(),
    )?;

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, store);
    coordinator.wait_for_shutdown().await
}
