use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::info;

use kh_api::middleware::create_cors;
use kh_api::{create_app, AppState};
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::cleanup::CleanupConfig;
use kh_core::services::verification::{SmsProvider, VerificationCleanupService, VerificationService};
use kh_infra::database::{DatabasePool, MySqlProfileRepository, MySqlVerificationRepository};
use kh_infra::memory::{InMemoryProfileRepository, InMemoryVerificationRepository};
use kh_infra::sms::create_sms_provider;
use kh_shared::config::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().context("Refusing to start with invalid configuration")?;
    info!(
        "Starting Khidma verification API ({} environment, {:?} storage)",
        config.environment, config.storage
    );

    let sms_provider = Arc::new(create_sms_provider(&config.sms)?);
    info!("SMS provider: {}", sms_provider.provider_name());
    info!(
        "{} test phone number(s) configured",
        config.verification.test_phones.len()
    );

    match config.storage {
        StorageBackend::MySql => {
            let database = config
                .database
                .clone()
                .context("DATABASE_URL is required for MySQL storage")?;
            let pool = DatabasePool::new(&database).await?;
            pool.run_migrations().await?;
            info!("Database ready: {}", pool.get_statistics());

            let attempts = Arc::new(MySqlVerificationRepository::new(pool.get_pool().clone()));
            let profiles = Arc::new(MySqlProfileRepository::new(pool.get_pool().clone()));
            serve(config, sms_provider, attempts, profiles).await?;
            pool.close().await;
            Ok(())
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; verification state is lost on restart");
            let attempts = Arc::new(InMemoryVerificationRepository::new());
            let profiles = Arc::new(InMemoryProfileRepository::new());
            serve(config, sms_provider, attempts, profiles).await
        }
    }
}

/// Wire the service, start the retention sweep and run the HTTP server
async fn serve<P, V, R>(
    config: AppConfig,
    sms_provider: Arc<P>,
    attempts: Arc<V>,
    profiles: Arc<R>,
) -> anyhow::Result<()>
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    let cleanup = Arc::new(VerificationCleanupService::new(
        Arc::clone(&attempts),
        CleanupConfig::from(&config.verification),
    ));
    cleanup.start_background_task();

    let verification_service = Arc::new(VerificationService::new(
        sms_provider,
        attempts,
        profiles,
        config.verification.clone(),
    ));
    let app_state = web::Data::new(AppState::new(verification_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let environment = config.environment;
    let server_config = config.server.clone();
    let auth_config = config.auth.clone();

    let mut server = HttpServer::new(move || {
        create_app(
            app_state.clone(),
            auth_config.clone(),
            create_cors(environment, &server_config),
        )
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
