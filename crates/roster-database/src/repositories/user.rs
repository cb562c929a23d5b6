//! User repository implementation.
//!
//! Covers user CRUD, the enabled toggle, and full-replace synchronization
//! of role/permission membership.

use sqlx::PgPool;
use uuid::Uuid;

use roster_core::error::{AppError, ErrorKind};
use roster_core::result::AppResult;
use roster_core::types::pagination::{PageRequest, PageResponse};
use roster_entity::permission::Permission;
use roster_entity::role::Role;
use roster_entity::user::{CreateUser, User};

/// Repository for user CRUD, query, and membership-sync operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

/// Flat row for the batched user→role join on the list screen.
#[derive(Debug, sqlx::FromRow)]
struct UserRoleRow {
    user_id: Uuid,
    #[sqlx(flatten)]
    role: Role,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// List all users with pagination, usernames ascending.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY username ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Search users by first name, last name, or username.
    pub async fn search(&self, query: &str, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let pattern = format!("%{query}%");

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR username ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count search results", e)
        })?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR username ILIKE $1 \
             ORDER BY username ASC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search users", e))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, username, email, password_hash, enabled) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("users_username_key") =>
            {
                AppError::conflict(format!("Username '{}' already exists", data.username))
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Persist the five profile scalars of an already-loaded user.
    ///
    /// The credential hash is not written by this method; password changes
    /// go through [`UserRepository::update_password`].
    pub async fn update_profile(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = $2, last_name = $3, username = $4, \
                              email = $5, enabled = $6, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))
    }

    /// Update a user's password hash.
    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Set a user's enabled flag.
    pub async fn set_enabled(&self, user_id: Uuid, enabled: bool) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET enabled = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set enabled flag", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Delete a user by ID.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's role memberships, names ascending.
    pub async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             INNER JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user roles", e))
    }

    /// List a user's direct permission grants, names ascending.
    pub async fn permissions_of(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.* FROM permissions p \
             INNER JOIN user_permissions up ON up.permission_id = p.id \
             WHERE up.user_id = $1 ORDER BY p.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user permissions", e)
        })
    }

    /// Batched role lookup for a page of users (list screen).
    pub async fn roles_for_users(&self, user_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Role)>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            "SELECT ur.user_id, r.* FROM roles r \
             INNER JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ANY($1) ORDER BY r.name ASC",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to batch-load user roles", e)
        })?;

        Ok(rows.into_iter().map(|r| (r.user_id, r.role)).collect())
    }

    /// Full-replace sync of a user's role memberships.
    ///
    /// Sets membership to exactly `role_ids`: missing rows are added,
    /// extra rows are removed. Runs in a single transaction.
    pub async fn sync_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin role sync", e)
        })?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear role memberships", e)
            })?;

        if !role_ids.is_empty() {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) SELECT $1, unnest($2::uuid[])",
            )
            .bind(user_id)
            .bind(role_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert role memberships", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit role sync", e)
        })
    }

    /// Full-replace sync of a user's direct permission grants.
    pub async fn sync_permissions(&self, user_id: Uuid, perm_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin permission sync", e)
        })?;

        sqlx::query("DELETE FROM user_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to clear permission grants",
                    e,
                )
            })?;

        if !perm_ids.is_empty() {
            sqlx::query(
                "INSERT INTO user_permissions (user_id, permission_id) \
                 SELECT $1, unnest($2::uuid[])",
            )
            .bind(user_id)
            .bind(perm_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to insert permission grants",
                    e,
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit permission sync", e)
        })
    }
}
