use super::{is_unique_violation, like_pattern, RepositoryError, RepositoryResult};
use crate::models::{NewUser, User, UserChanges, UserQuery};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, phone, location, role, active, created_at, updated_at";

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> RepositoryResult<Option<User>>;
    async fn delete_user(&self, id: i64) -> RepositoryResult<bool>;
    /// Removes the user's items and then the user, atomically.
    async fn delete_user_with_items(&self, id: i64) -> RepositoryResult<bool>;
    async fn find_all(&self, query: UserQuery) -> RepositoryResult<Vec<User>>;
    async fn count(&self) -> RepositoryResult<i64>;
    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> RepositoryResult<bool>;
    async fn set_active(&self, id: i64, active: bool) -> RepositoryResult<bool>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        if self.email_exists(&user.email, None).await? {
            return Err(RepositoryError::AlreadyExists);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, phone, location, role)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.location)
        .bind(user.role)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_rowid();
                self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
            }
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::AlreadyExists),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> RepositoryResult<Option<User>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("UPDATE users SET updated_at = datetime('now')");
        if let Some(name) = changes.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(phone) = changes.phone {
            builder.push(", phone = ").push_bind(phone);
        }
        if let Some(location) = changes.location {
            builder.push(", location = ").push_bind(location);
        }
        if let Some(password_hash) = changes.password_hash {
            builder.push(", password_hash = ").push_bind(password_hash);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete_user(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_with_items(&self, id: i64) -> RepositoryResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items WHERE owner_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn find_all(&self, query: UserQuery) -> RepositoryResult<Vec<User>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users WHERE 1=1", USER_COLUMNS));

        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder
                .push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR email LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let direction = query.direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {}, id {}",
            query.order_by.column(),
            direction,
            direction
        ));

        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> RepositoryResult<bool> {
        let matches = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = ? AND (? IS NULL OR id != ?)",
        )
        .bind(email)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(matches > 0)
    }

    async fn set_active(&self, id: i64, active: bool) -> RepositoryResult<bool> {
        let result =
            sqlx::query("UPDATE users SET active = ?, updated_at = datetime('now') WHERE id = ?")
                .bind(active)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
