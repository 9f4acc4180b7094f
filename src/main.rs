use std::sync::Arc;

use anyhow::Result;
use innkeeper::application::usecases::sweep::StatusSweepUseCase;
use innkeeper::config::config_loader;
use innkeeper::infrastructure::axum_http::http_serve;
use innkeeper::infrastructure::postgres::postgres_connection;
use innkeeper::infrastructure::postgres::repositories::bookings::BookingPostgres;
use innkeeper::infrastructure::scheduler::sweep_scheduler;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Server exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let postgres_pool = Arc::new(postgres_pool);

    let sweep_usecase = StatusSweepUseCase::new(Arc::new(BookingPostgres::new(Arc::clone(
        &postgres_pool,
    ))));
    tokio::spawn(sweep_scheduler::run_sweep_loop(
        Arc::new(sweep_usecase),
        dotenvy_env.sweep.hour,
    ));
    info!("Day-boundary sweep scheduler has been started");

    http_serve::start(Arc::new(dotenvy_env), postgres_pool).await?;

    Ok(())
}
