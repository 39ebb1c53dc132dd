use super::{like_pattern, RepositoryError, RepositoryResult};
use crate::models::{
    CategoryCount, ItemChanges, ItemDetails, ItemFilter, ItemStats, ItemStatus, ItemView,
    ListingChanges, NewItem, NewListing, PublicItemFilter,
};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const ITEM_VIEW_SELECT: &str = r#"
    SELECT
        i.id, i.owner_id, i.category_id, i.title, i.description, i.condition, i.location,
        i.image_url, i.status, i.created_at, i.updated_at,
        c.name AS category_name,
        u.name AS owner_name,
        u.location AS owner_location
    FROM items i
    LEFT JOIN categories c ON i.category_id = c.id
    LEFT JOIN users u ON i.owner_id = u.id
"#;

const ITEM_DETAILS_SELECT: &str = r#"
    SELECT
        i.id, i.owner_id, i.category_id, i.title, i.description, i.condition, i.location,
        i.image_url, i.status, i.created_at, i.updated_at,
        c.name AS category_name,
        u.name AS owner_name,
        u.location AS owner_location,
        u.email AS owner_email,
        u.phone AS owner_phone
    FROM items i
    LEFT JOIN categories c ON i.category_id = c.id
    LEFT JOIN users u ON i.owner_id = u.id
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ItemView>>;
    async fn find_details(&self, id: i64) -> RepositoryResult<Option<ItemDetails>>;
    async fn create(&self, item: NewItem) -> RepositoryResult<ItemView>;
    /// Resolves the category by name and inserts in one transaction.
    async fn create_listing(&self, listing: NewListing) -> RepositoryResult<ItemView>;
    async fn update(&self, id: i64, changes: ItemChanges) -> RepositoryResult<Option<ItemView>>;
    async fn update_listing(
        &self,
        id: i64,
        changes: ListingChanges,
    ) -> RepositoryResult<Option<ItemView>>;
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
    async fn delete_by_owner(&self, owner_id: i64) -> RepositoryResult<u64>;
    async fn find_all(&self, filter: ItemFilter) -> RepositoryResult<Vec<ItemView>>;
    async fn find_public(&self, filter: PublicItemFilter) -> RepositoryResult<Vec<ItemView>>;
    async fn count_by_owner(
        &self,
        owner_id: i64,
        status: Option<ItemStatus>,
    ) -> RepositoryResult<i64>;
    async fn get_stats(&self) -> RepositoryResult<ItemStats>;
}

pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn resolve_category(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE name = ? AND active = 1")
        .bind(name)
        .fetch_optional(conn)
        .await
}

async fn insert_item(conn: &mut SqliteConnection, item: &NewItem) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO items (owner_id, category_id, title, description, condition, location, image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.owner_id)
    .bind(item.category_id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.condition)
    .bind(&item.location)
    .bind(&item.image_url)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn apply_changes(
    conn: &mut SqliteConnection,
    id: i64,
    changes: ItemChanges,
) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE items SET updated_at = datetime('now')");
    if let Some(category_id) = changes.category_id {
        builder.push(", category_id = ").push_bind(category_id);
    }
    if let Some(title) = changes.title {
        builder.push(", title = ").push_bind(title);
    }
    if let Some(description) = changes.description {
        builder.push(", description = ").push_bind(description);
    }
    if let Some(condition) = changes.condition {
        builder.push(", condition = ").push_bind(condition);
    }
    if let Some(location) = changes.location {
        builder.push(", location = ").push_bind(location);
    }
    if let Some(image_url) = changes.image_url {
        builder.push(", image_url = ").push_bind(image_url);
    }
    if let Some(status) = changes.status {
        builder.push(", status = ").push_bind(status);
    }
    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ItemView>> {
        let sql = format!("{} WHERE i.id = ?", ITEM_VIEW_SELECT);
        let item = sqlx::query_as::<_, ItemView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn find_details(&self, id: i64) -> RepositoryResult<Option<ItemDetails>> {
        let sql = format!("{} WHERE i.id = ?", ITEM_DETAILS_SELECT);
        let item = sqlx::query_as::<_, ItemDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn create(&self, item: NewItem) -> RepositoryResult<ItemView> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_item(&mut conn, &item).await?;
        drop(conn);

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn create_listing(&self, listing: NewListing) -> RepositoryResult<ItemView> {
        let mut tx = self.pool.begin().await?;

        let category_id = match resolve_category(&mut tx, &listing.category).await? {
            Some(id) => id,
            None => return Err(RepositoryError::UnknownCategory(listing.category)),
        };

        let item = NewItem {
            owner_id: listing.owner_id,
            category_id,
            title: listing.title,
            description: listing.description,
            condition: listing.condition,
            location: listing.location,
            image_url: listing.image_url,
        };
        let id = insert_item(&mut tx, &item).await?;
        tx.commit().await?;

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: i64, changes: ItemChanges) -> RepositoryResult<Option<ItemView>> {
        let mut conn = self.pool.acquire().await?;
        let updated = apply_changes(&mut conn, id, changes).await?;
        drop(conn);

        if !updated {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn update_listing(
        &self,
        id: i64,
        changes: ListingChanges,
    ) -> RepositoryResult<Option<ItemView>> {
        let mut tx = self.pool.begin().await?;

        let mut fields = changes.fields;
        if let Some(name) = changes.category {
            match resolve_category(&mut tx, &name).await? {
                Some(category_id) => fields.category_id = Some(category_id),
                None => return Err(RepositoryError::UnknownCategory(name)),
            }
        }

        let updated = apply_changes(&mut tx, id, fields).await?;
        tx.commit().await?;

        if !updated {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, owner_id: i64) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM items WHERE owner_id = ?")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_all(&self, filter: ItemFilter) -> RepositoryResult<Vec<ItemView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(ITEM_VIEW_SELECT);
        builder.push(" WHERE 1=1");

        if let Some(owner_id) = filter.owner_id {
            builder.push(" AND i.owner_id = ").push_bind(owner_id);
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND i.category_id = ").push_bind(category_id);
        }
        if let Some(category_name) = filter.category_name {
            builder.push(" AND c.name = ").push_bind(category_name);
        }
        if let Some(status) = filter.status.status() {
            builder.push(" AND i.status = ").push_bind(status);
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder
                .push(" AND (i.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR i.description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let direction = filter.direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {}, i.id {}",
            filter.order_by.column(),
            direction,
            direction
        ));

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let items = builder
            .build_query_as::<ItemView>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn find_public(&self, filter: PublicItemFilter) -> RepositoryResult<Vec<ItemView>> {
        let mut builder = QueryBuilder::<Sqlite>::new(ITEM_VIEW_SELECT);
        builder
            .push(" WHERE i.status = ")
            .push_bind(ItemStatus::Available);

        if let Some(category) = filter.category {
            builder.push(" AND c.name = ").push_bind(category);
        }
        if let Some(condition) = filter.condition {
            builder.push(" AND i.condition = ").push_bind(condition);
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder
                .push(" AND (i.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR i.description LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR c.name LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        builder.push(" ORDER BY i.created_at DESC, i.id DESC");

        let items = builder
            .build_query_as::<ItemView>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn count_by_owner(
        &self,
        owner_id: i64,
        status: Option<ItemStatus>,
    ) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM items WHERE owner_id = ? AND (? IS NULL OR status = ?)",
        )
        .bind(owner_id)
        .bind(status)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn get_stats(&self) -> RepositoryResult<ItemStats> {
        let (total, available, traded, removed) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'available' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'traded' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'removed' THEN 1 ELSE 0 END), 0)
            FROM items
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.name AS name, COUNT(i.id) AS total
            FROM categories c
            LEFT JOIN items i ON c.id = i.category_id
            GROUP BY c.id, c.name
            ORDER BY total DESC, c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ItemStats {
            total,
            available,
            traded,
            removed,
            by_category,
        })
    }
}
