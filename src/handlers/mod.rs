pub mod admin_handlers;
pub mod api;
pub mod auth_handlers;
pub mod catalog_handlers;
pub mod dashboard_handlers;
pub mod item_handlers;
pub mod profile_handlers;
pub mod request;

pub use api::{api_handler, health};
pub use request::{Action, ActionInput};
