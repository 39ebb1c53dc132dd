pub mod category;
pub mod item;
pub mod query;
pub mod report;
pub mod user;

pub use category::{Category, DEFAULT_CATEGORIES};
pub use item::{
    CategoryCount, ItemChanges, ItemDetails, ItemFilter, ItemOrder, ItemStats, ItemStatus,
    ItemView, ListingChanges, NewItem, NewListing, PublicItemFilter, StatusFilter, UnknownStatus,
};
pub use query::SortDirection;
pub use report::{
    AdminStatistics, ExportItem, ExportUser, RecentItem, RecentUser, ReportItemRow, ReportTotals,
    StatusCount, UserOverview, UserReportRow,
};
pub use user::{NewUser, User, UserChanges, UserOrder, UserPublicView, UserQuery, UserRole};
