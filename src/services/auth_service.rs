// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginResponse, USERNAME_MAX},
    services::{token_service::{Claims, TokenCodec}, user_service},
};
use sqlx::SqlitePool;

/// Emite um token para um username existente. Não há senha: quem conhece
/// um username válido recebe um token com `sub` e `role`.
pub async fn login(
    db_pool: &SqlitePool,
    tokens: &dyn TokenCodec,
    ttl_secs: u64,
    username: &str,
) -> AppResult<LoginResponse> {
    tracing::info!("Tentativa de login para: {}", username);

    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX {
        return Err(AppError::Validation("username must have between 1 and 50 characters".into()));
    }

    let user = user_service::find_user_by_username(db_pool, username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Utilizador não encontrado: {}", username);
            AppError::Unauthorized("invalid credentials".into())
        })?;

    let claims = Claims::new()
        .with("sub", user.username.as_str())
        .with("role", user.role.as_str());
    let access_token = tokens.sign(&claims, ttl_secs)?;

    tracing::info!("✅ Login bem-sucedido para: {}", user.username);
    Ok(LoginResponse {
        access_token,
        token_type: "bearer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_pool, models::user::CreateUser, services::token_service::HmacTokenCodec};

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let pool = test_pool().await;
        user_service::create_user(
            &pool,
            &CreateUser { username: "paulo".into(), full_name: None, role: "admin".into() },
        )
        .await
        .unwrap();

        let codec = HmacTokenCodec::new(b"segredo");
        let response = login(&pool, &codec, 3600, "paulo").await.unwrap();
        assert_eq!(response.token_type, "bearer");

        let claims = codec.verify(&response.access_token).unwrap();
        assert_eq!(claims.subject(), Some("paulo"));
        assert_eq!(claims.role(), Some("admin"));
    }

    #[tokio::test]
    async fn unknown_username_is_unauthorized() {
        let pool = test_pool().await;
        let codec = HmacTokenCodec::new(b"segredo");
        let err = login(&pool, &codec, 3600, "ninguem").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
