use super::SortDirection;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a listing. Stored as `available|traded|removed`; the legacy
/// Portuguese spellings are accepted on input and translated here only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Traded,
    Removed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Traded => "traded",
            ItemStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid item status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" | "disponivel" | "disponível" => Ok(ItemStatus::Available),
            "traded" | "trocado" => Ok(ItemStatus::Traded),
            "removed" | "removido" => Ok(ItemStatus::Removed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// An item joined with the names needed to display it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub owner_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: ItemStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(rename = "category")]
    pub category_name: Option<String>,
    pub owner_name: Option<String>,
    pub owner_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ItemDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: ItemView,
    pub owner_email: Option<String>,
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub owner_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: String,
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
}

/// A new item whose category is still a name; resolved inside the insert transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub owner_id: i64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub condition: String,
    pub location: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ItemStatus>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.condition.is_none()
            && self.location.is_none()
            && self.image_url.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChanges {
    pub category: Option<String>,
    pub fields: ItemChanges,
}

impl ListingChanges {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    Only(ItemStatus),
    Any,
    #[default]
    DefaultAvailable,
}

impl StatusFilter {
    pub fn status(&self) -> Option<ItemStatus> {
        match self {
            StatusFilter::Only(status) => Some(*status),
            StatusFilter::DefaultAvailable => Some(ItemStatus::Available),
            StatusFilter::Any => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemOrder {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl ItemOrder {
    pub fn column(&self) -> &'static str {
        match self {
            ItemOrder::CreatedAt => "i.created_at",
            ItemOrder::UpdatedAt => "i.updated_at",
            ItemOrder::Title => "i.title",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub owner_id: Option<i64>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub status: StatusFilter,
    pub search: Option<String>,
    pub order_by: ItemOrder,
    pub direction: SortDirection,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicItemFilter {
    pub category: Option<String>,
    pub condition: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStats {
    pub total: i64,
    pub available: i64,
    pub traded: i64,
    pub removed: i64,
    pub by_category: Vec<CategoryCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_translation_happens_at_the_edge() {
        assert_eq!("available".parse::<ItemStatus>(), Ok(ItemStatus::Available));
        assert_eq!("Disponível".parse::<ItemStatus>(), Ok(ItemStatus::Available));
        assert_eq!("trocado".parse::<ItemStatus>(), Ok(ItemStatus::Traded));
        assert_eq!("removido".parse::<ItemStatus>(), Ok(ItemStatus::Removed));
        assert_eq!(
            "sold".parse::<ItemStatus>(),
            Err(UnknownStatus("sold".to_string()))
        );
    }

    #[test]
    fn status_serializes_with_the_external_vocabulary() {
        assert_eq!(
            serde_json::to_value(ItemStatus::Traded).unwrap(),
            serde_json::json!("traded")
        );
        assert_eq!(ItemStatus::Removed.to_string(), "removed");
    }

    #[test]
    fn status_filter_defaults_to_available() {
        assert_eq!(StatusFilter::default().status(), Some(ItemStatus::Available));
        assert_eq!(StatusFilter::Any.status(), None);
        assert_eq!(
            StatusFilter::Only(ItemStatus::Traded).status(),
            Some(ItemStatus::Traded)
        );
    }

    #[test]
    fn listing_changes_emptiness_covers_category() {
        assert!(ListingChanges::default().is_empty());
        let changes = ListingChanges {
            category: Some("Books".to_string()),
            fields: ItemChanges::default(),
        };
        assert!(!changes.is_empty());
    }
}
