//! Read-only aggregate queries backing the admin dashboard, reports and exports.

use super::{like_pattern, RepositoryResult};
use crate::models::{
    AdminStatistics, CategoryCount, ExportItem, ExportUser, RecentItem, RecentUser,
    ReportItemRow, ReportTotals, StatusCount, UserOverview, UserQuery, UserReportRow,
};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ReportRepository: Send + Sync {
    async fn admin_statistics(&self) -> RepositoryResult<AdminStatistics>;
    /// Non-admin users with their item counts.
    async fn users_overview(&self, query: UserQuery) -> RepositoryResult<Vec<UserOverview>>;
    async fn new_users_this_month(&self) -> RepositoryResult<i64>;
    async fn user_report_rows(&self) -> RepositoryResult<Vec<UserReportRow>>;
    async fn report_totals(&self) -> RepositoryResult<ReportTotals>;
    async fn report_items(&self) -> RepositoryResult<Vec<ReportItemRow>>;
    async fn export_users(&self) -> RepositoryResult<Vec<ExportUser>>;
    async fn export_items(&self) -> RepositoryResult<Vec<ExportItem>>;
}

pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn admin_statistics(&self) -> RepositoryResult<AdminStatistics> {
        let total_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role != 'admin'",
        )
        .fetch_one(&self.pool)
        .await?;

        let (total_items, available_items, traded_items) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COALESCE(SUM(CASE WHEN status = 'available' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = 'traded' THEN 1 ELSE 0 END), 0)
                FROM items
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.name AS name, COUNT(i.id) AS total
            FROM items i
            JOIN categories c ON i.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY total DESC, c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM items GROUP BY status ORDER BY status ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_users = sqlx::query_as::<_, RecentUser>(
            r#"
            SELECT name, created_at FROM users
            WHERE role != 'admin'
            ORDER BY created_at DESC, id DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_items = sqlx::query_as::<_, RecentItem>(
            r#"
            SELECT i.title, i.created_at, u.name AS owner_name
            FROM items i
            JOIN users u ON i.owner_id = u.id
            ORDER BY i.created_at DESC, i.id DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(AdminStatistics {
            total_users,
            total_items,
            available_items,
            traded_items,
            by_category,
            by_status,
            recent_users,
            recent_items,
        })
    }

    async fn users_overview(&self, query: UserQuery) -> RepositoryResult<Vec<UserOverview>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT u.id, u.name, u.email, u.location, u.phone, u.active, u.created_at,
                   COUNT(i.id) AS item_count
            FROM users u
            LEFT JOIN items i ON u.id = i.owner_id
            WHERE u.role != 'admin'
            "#,
        );

        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            builder
                .push(" AND (u.name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR u.email LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let direction = query.direction.as_sql();
        builder.push(format!(
            " GROUP BY u.id ORDER BY u.{} {}, u.id {}",
            query.order_by.column(),
            direction,
            direction
        ));

        let users = builder
            .build_query_as::<UserOverview>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn new_users_this_month(&self) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role != 'admin'
              AND strftime('%Y-%m', created_at) = strftime('%Y-%m', 'now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn user_report_rows(&self) -> RepositoryResult<Vec<UserReportRow>> {
        let rows = sqlx::query_as::<_, UserReportRow>(
            r#"
            SELECT
                u.name, u.email, u.phone, u.location, u.created_at,
                COUNT(i.id) AS total_items,
                COALESCE(SUM(CASE WHEN i.status = 'available' THEN 1 ELSE 0 END), 0) AS available_items,
                COALESCE(SUM(CASE WHEN i.status = 'traded' THEN 1 ELSE 0 END), 0) AS traded_items,
                COALESCE(SUM(CASE WHEN i.status = 'removed' THEN 1 ELSE 0 END), 0) AS removed_items
            FROM users u
            LEFT JOIN items i ON u.id = i.owner_id
            WHERE u.role = 'user'
            GROUP BY u.id
            ORDER BY u.created_at DESC, u.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn report_totals(&self) -> RepositoryResult<ReportTotals> {
        let totals = sqlx::query_as::<_, ReportTotals>(
            r#"
            SELECT
                COUNT(DISTINCT u.id) AS total_users,
                COUNT(i.id) AS total_items,
                COALESCE(SUM(CASE WHEN i.status = 'available' THEN 1 ELSE 0 END), 0) AS total_available,
                COALESCE(SUM(CASE WHEN i.status = 'traded' THEN 1 ELSE 0 END), 0) AS total_traded
            FROM users u
            LEFT JOIN items i ON u.id = i.owner_id
            WHERE u.role = 'user'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    async fn report_items(&self) -> RepositoryResult<Vec<ReportItemRow>> {
        let rows = sqlx::query_as::<_, ReportItemRow>(
            r#"
            SELECT
                i.title, i.description, c.name AS category, i.condition, i.status, i.created_at,
                u.name AS owner_name, u.email AS owner_email
            FROM items i
            JOIN users u ON i.owner_id = u.id
            JOIN categories c ON i.category_id = c.id
            ORDER BY i.created_at DESC, i.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn export_users(&self) -> RepositoryResult<Vec<ExportUser>> {
        let users = sqlx::query_as::<_, ExportUser>(
            r#"
            SELECT id, name, email, phone, location, role, active, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn export_items(&self) -> RepositoryResult<Vec<ExportItem>> {
        let items = sqlx::query_as::<_, ExportItem>(
            r#"
            SELECT
                i.id, i.title, i.description, i.condition, i.status, i.image_url, i.created_at,
                u.name AS owner_name, u.email AS owner_email, c.name AS category_name
            FROM items i
            JOIN users u ON i.owner_id = u.id
            JOIN categories c ON i.category_id = c.id
            ORDER BY i.created_at DESC, i.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
