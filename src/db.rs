use dotenv::dotenv;
use sqlx::{MySql, Pool};
use std::env;

pub async fn establish_connection() -> Result<Pool<MySql>, sqlx::Error> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL tidak ditemukan di .env".into()))?;

    let maks_koneksi = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let pool = sqlx::mysql::MySqlPoolOptions::new()
        .max_connections(maks_koneksi)
        .connect(&database_url)
        .await
        .map_err(|e| {
            log::error!("Gagal membuat pool database: {:?}", e);
            e
        })?;

    log::info!("Pool database siap ({} koneksi maksimal)", maks_koneksi);
    Ok(pool)
}
