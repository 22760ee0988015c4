// src/db.rs
use crate::{config::Config, error::AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration; // Usar std::time::Duration aqui

/// Cria o pool a partir da configuração e aplica as migrações.
pub async fn create_db_pool(config: &Config) -> AppResult<SqlitePool> {
    tracing::info!("Ligando à base de dados: {}", config.database_url);

    let pool = connect(&config.database_url, config.db_max_connections).await?;

    tracing::info!("Executando migrações da base de dados...");
    run_migrations(&pool).await?;
    tracing::info!("Migrações concluídas.");

    Ok(pool)
}

/// Abre o pool sem migrar. Com `sqlite::memory:` use `max_connections = 1`,
/// cada conexão em memória é uma base de dados diferente.
pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<SqlitePool> {
    // Opções de conexão (criar se não existir, timeout, FKs ligadas para o CASCADE)
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        // Conexões nunca expiram: numa DB em memória fechar a conexão apaga os dados
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

// Executa automaticamente os ficheiros SQL em ./migrations
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Pool em memória já migrado, para os testes.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1).await.expect("pool em memória");
    run_migrations(&pool).await.expect("migrações");
    pool
}
