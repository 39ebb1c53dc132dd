pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use repositories::{
    CategoryRepository, ItemRepository, ReportRepository, SqliteCategoryRepository,
    SqliteItemRepository, SqliteReportRepository, SqliteUserRepository, UserRepository,
};
use services::{AdminService, AuthService, DashboardService, ItemService, UserService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub item_service: Arc<ItemService>,
    pub dashboard_service: Arc<DashboardService>,
    pub admin_service: Arc<AdminService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite repositories into every service.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let items: Arc<dyn ItemRepository> = Arc::new(SqliteItemRepository::new(pool.clone()));
        let categories: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let reports: Arc<dyn ReportRepository> =
            Arc::new(SqliteReportRepository::new(pool.clone()));

        let user_service = Arc::new(UserService::new(users.clone()));
        let auth_service = Arc::new(AuthService::new(users.clone()));
        let item_service = Arc::new(ItemService::new(items.clone(), categories.clone()));
        let dashboard_service = Arc::new(DashboardService::new(users.clone(), items.clone()));
        let admin_service = Arc::new(AdminService::new(
            reports,
            users,
            items,
            categories,
            user_service.clone(),
        ));

        Self {
            user_service,
            auth_service,
            item_service,
            dashboard_service,
            admin_service,
            pool,
        }
    }
}
