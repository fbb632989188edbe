use redis::{Client, RedisResult, aio::MultiplexedConnection};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connects to PostgreSQL and runs pending migrations.
pub async fn configure_postgresql(url: &Secret<String>) -> Result<PgPool, sqlx::Error> {
    let pg_pool = get_postgres_pool(url.expose_secret()).await?;

    sqlx::migrate!().run(&pg_pool).await?;

    Ok(pg_pool)
}

pub async fn configure_redis(redis_hostname: &str) -> RedisResult<MultiplexedConnection> {
    get_redis_client(redis_hostname)?
        .get_multiplexed_async_connection()
        .await
}

pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
