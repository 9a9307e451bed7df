//! User service entry point
//!
//! Loads configuration, connects MySQL and Redis, starts the notification
//! worker and token cleanup next to the HTTP server, and stops them when the
//! server exits.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use us_api::{app::create_app, telemetry, AppState};
use us_core::repositories::TemplateRepository;
use us_core::services::credentials::{BcryptPasswordHasher, PasswordHasher};
use us_core::services::notification::{
    stop_worker, NotificationDispatcher, NotificationWorker, NotificationWorkerConfig, TaskQueue,
};
use us_core::services::registration::RegistrationService;
use us_core::services::session::SessionService;
use us_core::services::token::{
    TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
use us_core::services::verification::{VerificationService, VerificationServiceConfig};
use us_infra::database::{
    DatabasePool, MySqlAccountRepository, MySqlTemplateRepository, MySqlTokenRepository,
};
use us_infra::email::create_email_transport;
use us_infra::queue::RedisTaskQueue;
use us_infra::replication::create_replicator;
use us_infra::sms::create_sms_sender;
use us_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    telemetry::init_tracing(&config.logging)?;
    info!(
        environment = %config.environment,
        bind = %config.server.bind_address(),
        "Starting user service"
    );

    // Storage
    let database = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to MySQL")?;
    database
        .run_migrations()
        .await
        .context("Failed to run database migrations")?;

    let pool = database.get_pool().clone();
    let accounts = Arc::new(MySqlAccountRepository::new(pool.clone()));
    let tokens = Arc::new(MySqlTokenRepository::new(pool.clone()));
    let templates: Arc<dyn TemplateRepository> = Arc::new(MySqlTemplateRepository::new(pool));

    // Delivery
    let queue: Arc<dyn TaskQueue> = Arc::new(
        RedisTaskQueue::new(&config.queue)
            .await
            .context("Failed to connect to the task queue")?,
    );
    let transport = create_email_transport(&config.email).context("Invalid email configuration")?;
    let sms = create_sms_sender(&config.sms).context("Invalid SMS configuration")?;
    let replicator =
        create_replicator(&config.replication).context("Invalid replication configuration")?;

    // Services
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::default());
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&config.jwt)));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&queue),
        config.queue.email_queue.clone(),
    ));

    let sessions = Arc::new(SessionService::new(
        Arc::clone(&accounts),
        Arc::clone(&tokens),
        token_service,
        Arc::clone(&hasher),
    ));
    let verification = Arc::new(VerificationService::new(
        Arc::clone(&accounts),
        dispatcher,
        sms,
        VerificationServiceConfig::from(&config.verification),
    ));
    let registration = Arc::new(RegistrationService::new(
        Arc::clone(&accounts),
        hasher,
        replicator,
    ));

    // Background tasks
    let shutdown = CancellationToken::new();

    let worker_handle = if config.worker.enabled {
        let worker = Arc::new(NotificationWorker::new(
            Arc::clone(&queue),
            templates,
            transport,
            NotificationWorkerConfig {
                queue_name: config.queue.email_queue.clone(),
                receive_timeout: Duration::from_secs(config.queue.receive_timeout),
            },
        ));
        Some(worker.spawn(shutdown.clone()))
    } else {
        info!("Notification worker disabled; tasks stay queued for an external consumer");
        None
    };

    let cleanup = Arc::new(TokenCleanupService::new(
        Arc::clone(&tokens),
        TokenCleanupConfig::from(&config.worker),
    ));
    let cleanup_handle = cleanup.start(shutdown.clone());

    // HTTP
    let state = web::Data::new(AppState {
        sessions,
        verification,
        registration,
        accounts,
        database: Some(database.clone()),
    });
    let allowed_origins = config.server.allowed_origins.clone();

    HttpServer::new(move || create_app(state.clone(), &allowed_origins))
        .workers(config.server.workers)
        .bind(config.server.bind_address())
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?
        .run()
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped, shutting down background tasks");
    let grace = Duration::from_secs(config.worker.shutdown_grace_seconds);

    if let Some(handle) = worker_handle {
        match stop_worker(handle, &shutdown, grace).await {
            Some(stats) => info!(
                delivered = stats.delivered,
                skipped = stats.skipped,
                failed = stats.failed,
                "Notification worker stopped"
            ),
            None => info!("Notification worker aborted"),
        }
    }

    shutdown.cancel();
    if let Some(handle) = cleanup_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    database.close().await;
    info!("User service stopped");
    Ok(())
}
