pub mod admin_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod item_service;
pub mod password;
pub mod user_service;
pub mod validation;

pub use admin_service::{AdminService, AdminServiceError};
pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use dashboard_service::{DashboardService, DashboardServiceError};
pub use item_service::{ItemService, ItemServiceError};
pub use user_service::{UserService, UserServiceError};
