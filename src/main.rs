use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trainer_hub::adapters::auth::{IdentityAdminClient, JwtSessionValidator};
use trainer_hub::adapters::http::{build_router, AppState};
use trainer_hub::adapters::memory::InMemoryStore;
use trainer_hub::adapters::postgres::{
    create_pool, run_migrations, PostgresPaymentHistoryRepository, PostgresPlanReader,
    PostgresStudentRepository, PostgresSubscriptionRepository, PostgresTrainerRepository,
    PostgresWebhookConfigReader,
};
use trainer_hub::application::handlers::TrainerProvisioning;
use trainer_hub::config::{AppConfig, DatabaseConfig};
use trainer_hub::ports::{
    PaymentHistoryRepository, PlanReader, StudentRepository, SubscriptionRepository,
    TrainerRepository, WebhookConfigReader,
};

/// Store ports, backed either by PostgreSQL or by process memory.
struct Stores {
    trainers: Arc<dyn TrainerRepository>,
    plans: Arc<dyn PlanReader>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    students: Arc<dyn StudentRepository>,
    payments: Arc<dyn PaymentHistoryRepository>,
    webhook_configs: Arc<dyn WebhookConfigReader>,
}

impl Stores {
    async fn postgres(config: &DatabaseConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = create_pool(config).await?;
        if config.run_migrations {
            run_migrations(&pool).await?;
        }

        Ok(Self {
            trainers: Arc::new(PostgresTrainerRepository::new(pool.clone())),
            plans: Arc::new(PostgresPlanReader::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
            students: Arc::new(PostgresStudentRepository::new(pool.clone())),
            payments: Arc::new(PostgresPaymentHistoryRepository::new(pool.clone())),
            webhook_configs: Arc::new(PostgresWebhookConfigReader::new(pool)),
        })
    }

    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            trainers: store.clone(),
            plans: store.clone(),
            subscriptions: store.clone(),
            students: store.clone(),
            payments: store.clone(),
            webhook_configs: store,
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let stores = match &config.database {
        Some(database) => Stores::postgres(database).await?,
        None => {
            tracing::warn!("No database configured; using the in-memory store");
            Stores::in_memory()
        }
    };

    let session_validator = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.jwt_audience.clone(),
    ));
    let identity = Arc::new(
        IdentityAdminClient::new(
            config.auth.identity_admin_url.clone(),
            config.auth.service_role_key.clone(),
        )
        .with_timeout(config.auth.identity_timeout())?,
    );

    let state = AppState {
        trainers: stores.trainers,
        plans: stores.plans,
        subscriptions: stores.subscriptions,
        students: stores.students,
        payments: stores.payments,
        webhook_configs: stores.webhook_configs,
        identity,
        session_validator,
        provisioning: TrainerProvisioning {
            super_admin_email: config.admin.super_admin_email.clone(),
            temporary_password: config.admin.temporary_password.clone(),
        },
        webhook_provider: config.billing.webhook_provider.clone(),
    };
    if config.admin.temporary_password.expose_secret() == "temp123456" && config.is_production() {
        tracing::warn!("Default temporary password in use");
    }

    let app = build_router(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "Trainer Hub listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
