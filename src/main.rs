//! beorders server binary.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beorders::adapters::auth::InMemoryCredentialStore;
use beorders::adapters::http::{app_router, AuthState, OrderHandlers, RouterSettings};
use beorders::adapters::postgres::{self, PostgresOrderRepository};
use beorders::adapters::storage::{demo_orders, seed_if_empty, InMemoryOrderRepository};
use beorders::config::AppConfig;
use beorders::domain::foundation::RouteKind;
use beorders::ports::OrderRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        "Starting beorders"
    );

    let repository = order_repository(&config).await?;

    let credentials = if config.auth.seed_demo_users {
        info!("Registering demo users");
        InMemoryCredentialStore::with_demo_users()
    } else {
        warn!("No users registered; every request will be rejected");
        InMemoryCredentialStore::new()
    };

    let handlers = OrderHandlers::new(repository).with_verbose_errors(config.features.verbose_errors);
    let auth = AuthState::new(
        Arc::new(credentials),
        config.auth.realm.as_str(),
        RouteKind::Public,
    );
    let settings = RouterSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = app_router(handlers, auth, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let (json, plain) = if config.is_production() {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

async fn order_repository(
    config: &AppConfig,
) -> Result<Arc<dyn OrderRepository>, Box<dyn std::error::Error>> {
    let seed = config.features.seed_demo_orders;

    match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            if database.run_migrations {
                postgres::run_migrations(&pool).await?;
                info!("Migrations applied");
            }
            let repository = PostgresOrderRepository::new(pool);
            if seed {
                let written = seed_if_empty(&repository, demo_orders()).await?;
                info!(orders = written, "Demo orders seeded");
            }
            info!("Using PostgreSQL order store");
            Ok(Arc::new(repository))
        }
        None => {
            let repository = if seed {
                InMemoryOrderRepository::with_demo_orders()
            } else {
                InMemoryOrderRepository::new()
            };
            info!(orders = repository.order_count().await, "Using in-memory order store");
            Ok(Arc::new(repository))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
