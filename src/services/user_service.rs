// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, FULL_NAME_MAX, ROLE_MAX, USERNAME_MAX},
};
use sqlx::SqlitePool;

/// Busca um utilizador pelo ID numérico.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: i64) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, full_name, role FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;

    if user.is_none() {
        tracing::debug!("Utilizador {} não encontrado.", user_id);
    }
    Ok(user)
}

/// Busca um utilizador pelo username (usado no login).
pub async fn find_user_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por username: {}", username);
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, full_name, role FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

/// Todos os utilizadores, por ordem de ID.
pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    tracing::debug!("Buscando todos os utilizadores...");
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, full_name, role FROM users ORDER BY id ASC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

pub async fn create_user(db_pool: &SqlitePool, new_user: &CreateUser) -> AppResult<User> {
    let username = new_user.username.trim();
    tracing::info!("Tentando criar utilizador: {}", username);

    check_length("username", username, 1, USERNAME_MAX)?;
    check_length("role", &new_user.role, 1, ROLE_MAX)?;
    if let Some(full_name) = &new_user.full_name {
        check_length("full_name", full_name, 0, FULL_NAME_MAX)?;
    }

    if find_user_by_username(db_pool, username).await?.is_some() {
        tracing::warn!("Falha ao criar user: username '{}' já existe.", username);
        return Err(AppError::Conflict("username already exists".into()));
    }

    let insert_result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, full_name, role)
        VALUES (?1, ?2, ?3)
        RETURNING id, username, full_name, role
        "#,
    )
    .bind(username)
    .bind(&new_user.full_name)
    .bind(&new_user.role)
    .fetch_one(db_pool)
    .await;

    // Dois pedidos em paralelo podem passar a verificação acima; a UNIQUE decide
    let user = match insert_result {
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::warn!("Falha ao criar user: username '{}' já existe (constraint).", username);
            return Err(AppError::Conflict("username already exists".into()));
        }
        other => other?,
    };

    tracing::info!("✅ Utilizador '{}' criado com ID {}.", user.username, user.id);
    Ok(user)
}

/// Atualização parcial: só os campos presentes em `patch` são escritos.
pub async fn update_user(db_pool: &SqlitePool, user_id: i64, patch: &UpdateUser) -> AppResult<User> {
    tracing::info!("Atualizando dados para user: {}", user_id);

    if let Some(full_name) = &patch.full_name {
        check_length("full_name", full_name, 0, FULL_NAME_MAX)?;
    }
    if let Some(role) = &patch.role {
        check_length("role", role, 1, ROLE_MAX)?;
    }

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            full_name = COALESCE(?1, full_name),
            role = COALESCE(?2, role)
        WHERE id = ?3
        RETURNING id, username, full_name, role
        "#,
    )
    .bind(&patch.full_name)
    .bind(&patch.role)
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;

    match updated {
        Some(user) => {
            tracing::info!("✅ Dados atualizados com sucesso para user: {}", user_id);
            Ok(user)
        }
        None => {
            tracing::warn!("Falha ao atualizar dados: Utilizador '{}' não encontrado.", user_id);
            Err(AppError::NotFound("user not found".into()))
        }
    }
}

pub async fn delete_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    tracing::info!("Removendo utilizador: {}", user_id);

    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover: Utilizador '{}' não encontrado.", user_id);
        return Err(AppError::NotFound("user not found".into()));
    }

    tracing::info!("🗑️ Utilizador {} removido.", user_id);
    Ok(())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{} must have between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}
