//! Row shapes for the admin dashboard, reports and exports.

use super::{CategoryCount, ItemStatus, UserRole};
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct StatusCount {
    pub status: ItemStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RecentUser {
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RecentItem {
    pub title: String,
    pub created_at: NaiveDateTime,
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminStatistics {
    pub total_users: i64,
    pub total_items: i64,
    pub available_items: i64,
    pub traded_items: i64,
    pub by_category: Vec<CategoryCount>,
    pub by_status: Vec<StatusCount>,
    pub recent_users: Vec<RecentUser>,
    pub recent_items: Vec<RecentItem>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserOverview {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub location: String,
    pub phone: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    #[serde(rename = "itemCount")]
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserReportRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub created_at: NaiveDateTime,
    pub total_items: i64,
    pub available_items: i64,
    pub traded_items: i64,
    pub removed_items: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ReportTotals {
    pub total_users: i64,
    pub total_items: i64,
    pub total_available: i64,
    pub total_traded: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ReportItemRow {
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub status: ItemStatus,
    pub created_at: NaiveDateTime,
    pub owner_name: String,
    pub owner_email: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExportUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExportItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub condition: String,
    pub status: ItemStatus,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub owner_name: String,
    pub owner_email: String,
    pub category_name: String,
}
