use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Shown when the store has no active category.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Books",
    "Sports",
    "Music",
    "Toys",
    "Vehicles",
    "Beauty",
    "Furniture",
    "Other",
];

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub active: bool,
}
