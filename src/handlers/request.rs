//! Action names and request input for the `/api` endpoint.

use crate::error::AppError;
use axum::body::Bytes;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Register,
    Login,
    Logout,
    GetCategories,
    GetPublicItems,
    GetItemDetails,
    SearchItems,
    GetNoPublicItemsMessage,
    GetUserData,
    GetUserStatistics,
    GetUserRecentItems,
    GetSustainabilityTip,
    GetItemsPageData,
    GetNoItemsMessage,
    GetUserItems,
    GetItemById,
    AddItem,
    UpdateItem,
    DeleteItem,
    UpdateProfile,
    DeleteAccount,
    GetAdminStatistics,
    GetUsersAdmin,
    GetAdminProfileData,
    UpdateAdminProfile,
    GetUserDetails,
    DeleteUser,
    SetUserActive,
    GenerateReport,
    ExportData,
}

const ACTION_NAMES: &[(&str, Action)] = &[
    ("register", Action::Register),
    ("login", Action::Login),
    ("logout", Action::Logout),
    ("getCategories", Action::GetCategories),
    ("getPublicItems", Action::GetPublicItems),
    ("getItemDetails", Action::GetItemDetails),
    ("searchItems", Action::SearchItems),
    ("getNoPublicItemsMessage", Action::GetNoPublicItemsMessage),
    ("getUserData", Action::GetUserData),
    ("getUserStatistics", Action::GetUserStatistics),
    ("getUserRecentItems", Action::GetUserRecentItems),
    ("getSustainabilityTip", Action::GetSustainabilityTip),
    ("getItemsPageData", Action::GetItemsPageData),
    ("getNoItemsMessage", Action::GetNoItemsMessage),
    ("getUserItems", Action::GetUserItems),
    ("getItemById", Action::GetItemById),
    ("addItem", Action::AddItem),
    ("updateItem", Action::UpdateItem),
    ("deleteItem", Action::DeleteItem),
    ("updateProfile", Action::UpdateProfile),
    ("deleteAccount", Action::DeleteAccount),
    ("getAdminStatistics", Action::GetAdminStatistics),
    ("getUsersAdmin", Action::GetUsersAdmin),
    ("getAdminProfileData", Action::GetAdminProfileData),
    ("updateAdminProfile", Action::UpdateAdminProfile),
    ("getUserDetails", Action::GetUserDetails),
    ("deleteUser", Action::DeleteUser),
    ("setUserActive", Action::SetUserActive),
    ("generateReport", Action::GenerateReport),
    ("exportData", Action::ExportData),
];

impl Action {
    pub fn as_str(&self) -> &'static str {
        ACTION_NAMES
            .iter()
            .find(|(_, action)| action == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Mutations only run on POST; everything else accepts GET or POST.
    pub fn requires_post(&self) -> bool {
        matches!(
            self,
            Action::Register
                | Action::Login
                | Action::AddItem
                | Action::UpdateItem
                | Action::DeleteItem
                | Action::UpdateProfile
                | Action::DeleteAccount
                | Action::UpdateAdminProfile
                | Action::DeleteUser
                | Action::SetUserActive
        )
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, action)| *action)
            .ok_or(AppError::UnknownAction)
    }
}

/// Query string plus body. The body is read as a JSON object and, failing that, as a form.
/// Body fields shadow query fields of the same name.
#[derive(Debug, Default, Clone)]
pub struct ActionInput {
    query: HashMap<String, String>,
    body: Map<String, Value>,
}

impl ActionInput {
    pub fn new(query: HashMap<String, String>, body: &Bytes) -> Self {
        Self {
            query,
            body: parse_body(body),
        }
    }

    fn value(&self, key: &str) -> Option<String> {
        match self.body.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(_) => None,
            None => self.query.get(key).cloned(),
        }
    }

    /// Trimmed; blank counts as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// First of several accepted names that carries a value.
    pub fn text_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Untrimmed, for passwords. Empty still counts as absent.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.value(key).filter(|v| !v.is_empty())
    }

    pub fn id(&self, key: &str) -> Option<i64> {
        self.text(key).and_then(|v| v.parse().ok())
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.text(key)?.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    pub fn require_id(&self, key: &str, message: &str) -> Result<i64, AppError> {
        self.id(key)
            .ok_or_else(|| AppError::Validation(message.to_string()))
    }
}

fn parse_body(body: &Bytes) -> Map<String, Value> {
    if body.is_empty() {
        return Map::new();
    }

    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        return map;
    }

    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn action_names_round_trip() {
        for (name, action) in ACTION_NAMES {
            assert_eq!(name.parse::<Action>().unwrap(), *action);
            assert_eq!(action.as_str(), *name);
        }
        assert!(matches!(
            "dropTables".parse::<Action>(),
            Err(AppError::UnknownAction)
        ));
        assert!("Login".parse::<Action>().is_err());
    }

    #[test]
    fn only_mutations_require_post() {
        assert!(Action::Register.requires_post());
        assert!(Action::DeleteUser.requires_post());
        assert!(!Action::Logout.requires_post());
        assert!(!Action::GetPublicItems.requires_post());
    }

    #[test]
    fn json_body_is_trimmed_and_blank_is_absent() {
        let body = Bytes::from(r#"{"name":"  Ana ","phone":"   ","id":42,"password":" pw "}"#);
        let input = ActionInput::new(HashMap::new(), &body);

        assert_eq!(input.text("name").as_deref(), Some("Ana"));
        assert_eq!(input.text("phone"), None);
        assert_eq!(input.id("id"), Some(42));
        assert_eq!(input.raw("password").as_deref(), Some(" pw "));
    }

    #[test]
    fn form_body_is_the_fallback() {
        let body = Bytes::from("email=ana%40x.com&password=secret1");
        let input = ActionInput::new(HashMap::new(), &body);

        assert_eq!(input.text("email").as_deref(), Some("ana@x.com"));
        assert_eq!(input.raw("password").as_deref(), Some("secret1"));
    }

    #[test]
    fn body_shadows_query() {
        let body = Bytes::from(r#"{"id":"7"}"#);
        let input = ActionInput::new(query(&[("id", "3"), ("q", "ab")]), &body);

        assert_eq!(input.id("id"), Some(7));
        assert_eq!(input.text("q").as_deref(), Some("ab"));
        assert_eq!(input.text_any(&["title", "q"]).as_deref(), Some("ab"));
    }

    #[test]
    fn flags_accept_common_spellings() {
        let input = ActionInput::new(
            query(&[("a", "TRUE"), ("b", "0"), ("c", "maybe")]),
            &Bytes::new(),
        );
        assert_eq!(input.flag("a"), Some(true));
        assert_eq!(input.flag("b"), Some(false));
        assert_eq!(input.flag("c"), None);
    }
}
