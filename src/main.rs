use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldlend::config::Config;
use fieldlend::middleware::json_error_handler;
use fieldlend::modules::{health, lending};
use fieldlend::{LoanLedgerService, MySqlStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldlend=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!(env = %config.app.env, "Starting field-lending ledger");
    tracing::info!(address = %config.server.bind_address(), "Server binding");

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let store = MySqlStore::new(pool, config.ledger.lock_wait_timeout_secs);
    store.migrate().await.context("Failed to migrate database")?;

    let service = web::Data::new(LoanLedgerService::new(
        store,
        config.ledger.lending_settings(),
        config.ledger.business_clock()?,
    ));

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(health::controllers::configure::<MySqlStore>)
            .configure(lending::controllers::configure::<MySqlStore>)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
