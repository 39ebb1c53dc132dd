pub mod test_helpers {
    use crate::app::build_router;
    use crate::config::{SessionConfig, SESSION_TABLE};
    use crate::models::DEFAULT_CATEGORIES;
    use crate::services::password;
    use crate::AppState;
    use axum::Router;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tower_sessions_sqlx_store::SqliteStore;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Insert an active user with an argon2 hash of `password`
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        insert_user_with_role(pool, name, email, password, "user").await
    }

    pub async fn insert_test_admin(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        insert_user_with_role(pool, "Admin", email, password, "admin").await
    }

    async fn insert_user_with_role(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, sqlx::Error> {
        let password_hash = password::hash_password(password)
            .map_err(|e| sqlx::Error::Configuration(e.to_string().into()))?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, phone, location, role) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind("555-0100")
        .bind("Springfield")
        .bind(role)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_category(
        pool: &SqlitePool,
        name: &str,
        active: bool,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (name, active) VALUES (?, ?)")
            .bind(name)
            .bind(active)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert the default category list, all active
    pub async fn seed_categories(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        for name in DEFAULT_CATEGORIES {
            insert_category(pool, name, true).await?;
        }
        Ok(())
    }

    pub async fn category_id(pool: &SqlitePool, name: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Insert an item directly, bypassing validation
    pub async fn insert_test_item(
        pool: &SqlitePool,
        owner_id: i64,
        category_id: i64,
        title: &str,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO items (owner_id, category_id, title, description, condition, status) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(category_id)
        .bind(title)
        .bind(format!("{} in good shape", title))
        .bind("Good")
        .bind(status)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// The full HTTP application over `pool`, with development cookie settings
    pub async fn create_test_app(pool: SqlitePool) -> Result<Router, sqlx::Error> {
        let session_store = SqliteStore::new(pool.clone())
            .with_table_name(SESSION_TABLE)
            .map_err(|e| sqlx::Error::Configuration(e.into()))?;
        session_store.migrate().await?;

        let session_layer = SessionConfig::for_environment(false).create_layer(session_store);
        Ok(build_router(AppState::new(pool), session_layer, "static"))
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
