use std::sync::Arc;

use allowance_service::config::Config;
use allowance_service::domain::user::service::UserService;
use allowance_service::inbound::http::router::create_router;
use allowance_service::outbound::repositories::InMemoryUserRepository;
use auth::AuthenticationService;
use auth::LockoutTracker;
use auth::TokenManager;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "allowance_service=debug,auth=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "allowance-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    let lockout_policy = config.lockout.policy();
    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_seconds = config.security.token_ttl_seconds,
        max_failed_attempts = lockout_policy.max_failed_attempts,
        unlock_after_seconds = ?config.lockout.unlock_after_seconds,
        "Configuration loaded"
    );

    let tokens = Arc::new(
        TokenManager::new(config.security.token_secret.as_bytes())?
            .with_default_ttl(config.security.token_ttl()),
    );
    let lockout = Arc::new(LockoutTracker::new(lockout_policy));
    let encryption_key = config.security.encryption_key()?;

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let authentication = Arc::new(AuthenticationService::new(
        Arc::clone(&user_repository),
        encryption_key,
        tokens,
        lockout,
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authentication),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authentication);
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
