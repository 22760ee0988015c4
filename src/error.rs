// src/error.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de configuração: {0}")]
    Config(String),

    // Token em falta, inválido ou expirado (a razão vai na mensagem)
    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    // Payload vazio, campo obrigatório em falta, JSON mal formado...
    #[error("Pedido inválido: {0}")]
    Validation(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

// Rejeições do axum (JSON/query/path mal formados) viram 400 com a nossa forma de resposta
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// Como converter AppError numa resposta HTTP (JSON `{"detail": ...}`)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match &self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                // Detalhes da DB ficam só no log
                tracing::error!("Erro processado: {:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao aceder aos dados.".to_string())
            }
            AppError::Config(_) | AppError::InternalServerError => {
                tracing::error!("Erro processado: {:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
            AppError::Unauthorized(reason) => {
                tracing::warn!("Pedido não autorizado: {}", reason);
                (StatusCode::UNAUTHORIZED, reason.clone())
            }
            AppError::NotFound(what) => {
                tracing::debug!("Recurso não encontrado: {}", what);
                (StatusCode::NOT_FOUND, what.clone())
            }
            AppError::Validation(reason) => {
                tracing::warn!("Pedido inválido: {}", reason);
                (StatusCode::BAD_REQUEST, reason.clone())
            }
            AppError::Conflict(reason) => {
                tracing::warn!("Conflito: {}", reason);
                (StatusCode::CONFLICT, reason.clone())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (AppError::Unauthorized("missing bearer token".into()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("timetable not found".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("empty payload".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("username already exists".into()), StatusCode::CONFLICT),
            (AppError::InternalServerError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
