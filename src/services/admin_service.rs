use crate::models::{
    AdminStatistics, Category, ExportItem, ExportUser, ItemFilter, ItemStatus, ItemView,
    ReportItemRow, ReportTotals, StatusFilter, User, UserOverview, UserPublicView, UserQuery,
    UserReportRow,
};
use crate::repositories::{
    CategoryRepository, ItemRepository, ReportRepository, RepositoryError, UserRepository,
};
use crate::services::user_service::{ProfileUpdate, UserService, UserServiceError};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    User(#[from] UserServiceError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersSummary {
    pub total_users: i64,
    /// Users with at least one listing.
    pub active_users: i64,
    pub new_this_month: i64,
    pub average_items: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersOverview {
    pub stats: UsersSummary,
    pub users: Vec<UserOverview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileStats {
    pub total_users: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminProfileData {
    pub profile: AdminProfile,
    pub stats: AdminProfileStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub users: Vec<UserReportRow>,
    pub items: Vec<ReportItemRow>,
    pub statistics: ReportTotals,
    pub generated_at: String,
    pub report_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub exported_at: String,
    pub exported_by: String,
    pub version: &'static str,
    pub system: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    pub users: Vec<ExportUser>,
    pub categories: Vec<Category>,
    pub items: Vec<ExportItem>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub data: ExportData,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserItemStats {
    pub total_items: i64,
    pub available_items: i64,
    pub traded_items: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: UserPublicView,
    pub items: Vec<ItemView>,
    pub stats: UserItemStats,
}

pub struct AdminService {
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    categories: Arc<dyn CategoryRepository>,
    user_service: Arc<UserService>,
}

impl AdminService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        categories: Arc<dyn CategoryRepository>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self {
            reports,
            users,
            items,
            categories,
            user_service,
        }
    }

    pub async fn statistics(&self) -> Result<AdminStatistics, AdminServiceError> {
        Ok(self.reports.admin_statistics().await?)
    }

    pub async fn users_overview(
        &self,
        query: UserQuery,
    ) -> Result<UsersOverview, AdminServiceError> {
        let users = self.reports.users_overview(query).await?;
        let new_this_month = self.reports.new_users_this_month().await?;

        Ok(UsersOverview {
            stats: summarize(&users, new_this_month),
            users,
        })
    }

    pub async fn profile_data(&self, admin_id: i64) -> Result<AdminProfileData, AdminServiceError> {
        let admin = self
            .users
            .find_by_id(admin_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;
        let statistics = self.reports.admin_statistics().await?;

        Ok(AdminProfileData {
            profile: AdminProfile {
                name: admin.name,
                email: admin.email,
                phone: admin.phone,
                location: admin.location,
                created_at: admin.created_at,
            },
            stats: AdminProfileStats {
                total_users: statistics.total_users,
                total_items: statistics.total_items,
            },
        })
    }

    pub async fn update_profile(
        &self,
        admin_id: i64,
        update: ProfileUpdate,
    ) -> Result<User, AdminServiceError> {
        Ok(self.user_service.update_profile(admin_id, update).await?)
    }

    pub async fn generate_report(&self) -> Result<Report, AdminServiceError> {
        let users = self.reports.user_report_rows().await?;
        let items = self.reports.report_items().await?;
        let statistics = self.reports.report_totals().await?;

        Ok(Report {
            users,
            items,
            statistics,
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            report_type: "admin_report",
        })
    }

    pub async fn export_data(&self, exported_by: &str) -> Result<ExportBundle, AdminServiceError> {
        let users = self.reports.export_users().await?;
        let categories = self.categories.list_all().await?;
        let items = self.reports.export_items().await?;

        let now = Utc::now();
        tracing::info!("Data export requested by {}", exported_by);

        Ok(ExportBundle {
            data: ExportData {
                users,
                categories,
                items,
                metadata: ExportMetadata {
                    exported_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
                    exported_by: exported_by.to_string(),
                    version: EXPORT_VERSION,
                    system: "EcoSwap",
                },
            },
            filename: format!("ecoswap_export_{}.json", now.format("%Y-%m-%d_%H-%M-%S")),
        })
    }

    pub async fn user_details(&self, user_id: i64) -> Result<UserDetails, AdminServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        let items = self
            .items
            .find_all(ItemFilter {
                owner_id: Some(user_id),
                status: StatusFilter::Any,
                ..Default::default()
            })
            .await?;

        let stats = UserItemStats {
            total_items: self.items.count_by_owner(user_id, None).await?,
            available_items: self
                .items
                .count_by_owner(user_id, Some(ItemStatus::Available))
                .await?,
            traded_items: self
                .items
                .count_by_owner(user_id, Some(ItemStatus::Traded))
                .await?,
        };

        Ok(UserDetails {
            user: user.public_view(),
            items,
            stats,
        })
    }
}

fn summarize(users: &[UserOverview], new_this_month: i64) -> UsersSummary {
    let total_users = users.len() as i64;
    let active_users = users.iter().filter(|u| u.item_count > 0).count() as i64;
    let total_items: i64 = users.iter().map(|u| u.item_count).sum();

    let average_items = if total_users > 0 {
        (total_items as f64 / total_users as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    UsersSummary {
        total_users,
        active_users,
        new_this_month,
        average_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview(id: i64, item_count: i64) -> UserOverview {
        UserOverview {
            id,
            name: format!("user{}", id),
            email: format!("user{}@x.com", id),
            location: "SP".to_string(),
            phone: "1".to_string(),
            active: true,
            created_at: Utc::now().naive_utc(),
            item_count,
        }
    }

    #[test]
    fn summary_counts_users_with_items() {
        let users = vec![overview(1, 2), overview(2, 0), overview(3, 0)];
        let summary = summarize(&users, 1);

        assert_eq!(summary.total_users, 3);
        assert_eq!(summary.active_users, 1);
        assert_eq!(summary.new_this_month, 1);
        assert_eq!(summary.average_items, 0.67);
    }

    #[test]
    fn summary_of_nobody() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.total_users, 0);
        assert_eq!(summary.average_items, 0.0);
    }
}
