use civic_adapters::{
    PostgresCredentialStore, RedisSessionStore, TracingLoginObserver, config::CivicSettings,
};
use civic_core::SessionRole;
use civic_service::{
    WebsiteService,
    helpers::{configure_postgresql, configure_redis},
    tracing::init_tracing,
    web_config,
};
use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = CivicSettings::load()?;

    let pg_pool = configure_postgresql(settings.postgres_url()?).await?;
    let redis_conn = configure_redis(&settings.redis.host_name).await?;

    let credential_store = PostgresCredentialStore::new(pg_pool);
    let session_store = RedisSessionStore::new(
        redis_conn,
        SessionRole::Website,
        settings.session.ttl_seconds,
    );

    let service = WebsiteService::new(
        credential_store,
        TracingLoginObserver,
        session_store,
        web_config(&settings),
    )?;

    let listener = tokio::net::TcpListener::bind(&settings.application.address).await?;
    tracing::info!("Starting civic website...");

    service.run_standalone(listener).await?;

    Ok(())
}
