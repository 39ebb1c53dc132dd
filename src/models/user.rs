use super::SortDirection;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub location: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn public_view(&self) -> UserPublicView {
        UserPublicView::from(self)
    }
}

/// What the API is allowed to show about a user: everything except the hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPublicView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&User> for UserPublicView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            location: user.location.clone(),
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub location: String,
    pub role: UserRole,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.password_hash.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserOrder {
    #[default]
    Name,
    Email,
    CreatedAt,
}

impl UserOrder {
    pub fn column(&self) -> &'static str {
        match self {
            UserOrder::Name => "name",
            UserOrder::Email => "email",
            UserOrder::CreatedAt => "created_at",
        }
    }
}

impl FromStr for UserOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" | "nome" => Ok(UserOrder::Name),
            "email" => Ok(UserOrder::Email),
            "created_at" | "createdAt" | "data_cadastro" => Ok(UserOrder::CreatedAt),
            other => Err(format!("Unknown user ordering: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub order_by: UserOrder,
    pub direction: SortDirection,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            search: None,
            order_by: UserOrder::Name,
            direction: SortDirection::Asc,
        }
    }
}
