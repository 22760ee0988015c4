// src/models/user.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64, // SQLite INTEGER -> i64
    pub username: String,
    pub full_name: Option<String>,
    pub role: String, // texto livre: admin, cotep, professor, aluno...
}

// Corpo de POST /auth/login (só o username, sem senha)
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

// Corpo de POST /users
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: String,
}

/// Corpo de PATCH /users/{id}: campo ausente mantém o valor atual.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// Limites de tamanho dos campos
pub const USERNAME_MAX: usize = 50;
pub const FULL_NAME_MAX: usize = 120;
pub const ROLE_MAX: usize = 30;
