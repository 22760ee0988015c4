// src/config.rs
use crate::error::{AppError, AppResult};
use std::net::SocketAddr;

/// 7 dias, o mesmo prazo que os scripts de importação esperam.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Configuração da aplicação, lida uma única vez no arranque e passada
/// explicitamente para o estado (nada de variáveis globais).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_secret: String,
    pub bind_addr: SocketAddr,
    pub token_ttl_secs: u64,
    pub db_max_connections: u32,
}

impl Config {
    /// Lê a configuração das variáveis de ambiente (o `.env` já deve ter sido carregado).
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Separado de `from_env` para os testes não mexerem no ambiente do processo
    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> AppResult<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("variável {} não definida", key)))
        };

        let database_url = required("DATABASE_URL")?;
        let auth_secret = required("AUTH_SECRET")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR inválido: {}", e)))?;

        // Tem de caber em i64: `exp` é epoch com sinal
        let token_ttl_secs = match lookup("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("TOKEN_TTL_SECS inválido: {}", e)))
                .and_then(|ttl| {
                    i64::try_from(ttl)
                        .map(|_| ttl)
                        .map_err(|_| AppError::Config(format!("TOKEN_TTL_SECS fora do intervalo: {}", ttl)))
                })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| AppError::Config(format!("DB_MAX_CONNECTIONS inválido: {}", e)))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        if auth_secret.len() < 32 {
            tracing::warn!("⚠️ AUTH_SECRET é curta, considere usar uma chave mais longa e aleatória!");
        }

        Ok(Self {
            database_url,
            auth_secret,
            bind_addr,
            token_ttl_secs,
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://inovaulas.db"),
            ("AUTH_SECRET", "segredo-de-teste-com-tamanho-suficiente"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.db_max_connections, 5);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn invalid_ttl_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("AUTH_SECRET", "x"),
            ("TOKEN_TTL_SECS", "uma semana"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn ttl_beyond_i64_is_rejected() {
        let base = [("DATABASE_URL", "sqlite::memory:"), ("AUTH_SECRET", "x")];

        let too_big = u64::MAX.to_string();
        let result = Config::from_lookup(lookup_from(&[base[0], base[1], ("TOKEN_TTL_SECS", too_big.as_str())]));
        assert!(matches!(result, Err(AppError::Config(_))));

        let max = i64::MAX.to_string();
        let config = Config::from_lookup(lookup_from(&[base[0], base[1], ("TOKEN_TTL_SECS", max.as_str())])).unwrap();
        assert_eq!(config.token_ttl_secs, i64::MAX as u64);
    }
}
