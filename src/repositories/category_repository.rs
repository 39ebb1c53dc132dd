use super::{is_unique_violation, RepositoryError, RepositoryResult};
use crate::models::Category;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CategoryRepository: Send + Sync {
    async fn list_active(&self) -> RepositoryResult<Vec<Category>>;
    async fn list_all(&self) -> RepositoryResult<Vec<Category>>;
    async fn find_active_by_name(&self, name: &str) -> RepositoryResult<Option<Category>>;
    async fn create(&self, name: &str) -> RepositoryResult<Category>;
}

pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn list_active(&self) -> RepositoryResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, active FROM categories WHERE active = 1 ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, active FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_active_by_name(&self, name: &str) -> RepositoryResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, active FROM categories WHERE name = ? AND active = 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn create(&self, name: &str) -> RepositoryResult<Category> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => Ok(Category {
                id: res.last_insert_rowid(),
                name: name.to_string(),
                active: true,
            }),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::AlreadyExists),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }
}
