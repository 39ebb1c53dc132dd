//! Typed access to the per-browser session.
//!
//! Everything the app keeps about a login lives in one [`SessionData`] value stored under
//! [`SESSION_KEY`]. Only [`crate::services::auth_service::AuthService`] and the profile
//! refresh after an update write to it.

use crate::models::{User, UserRole};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const SESSION_KEY: &str = "ecoswap.auth";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_type: UserRole,
    pub logged_in: bool,
}

impl SessionData {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_type: user.role,
            logged_in: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserRole::Admin
    }
}

/// Starts a fresh session for `user`. The id is cycled first so a pre-login id is never reused.
pub async fn create(
    session: &Session,
    user: &User,
) -> Result<SessionData, tower_sessions::session::Error> {
    session.cycle_id().await?;
    let data = SessionData::for_user(user);
    session.insert(SESSION_KEY, &data).await?;
    Ok(data)
}

/// Present only when a logged-in value is stored.
pub async fn get(session: &Session) -> Result<Option<SessionData>, tower_sessions::session::Error> {
    let data = session.get::<SessionData>(SESSION_KEY).await?;
    Ok(data.filter(|d| d.logged_in))
}

pub async fn destroy(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Rewrites the cached name and email after a profile change.
pub async fn refresh(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    if let Some(mut data) = get(session).await? {
        if data.user_id == user.id {
            data.user_name = user.name.clone();
            data.user_email = user.email.clone();
            session.insert(SESSION_KEY, &data).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn sample_user() -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: 5,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "1".to_string(),
            location: "SP".to_string(),
            role: UserRole::User,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn create_then_get() {
        let session = new_session();
        assert_eq!(get(&session).await.unwrap(), None);

        let data = create(&session, &sample_user()).await.unwrap();
        assert_eq!(data.user_id, 5);
        assert!(data.logged_in);
        assert!(!data.is_admin());
        assert_eq!(get(&session).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let session = new_session();
        create(&session, &sample_user()).await.unwrap();

        destroy(&session).await.unwrap();
        destroy(&session).await.unwrap();
        assert_eq!(get(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn refresh_updates_cached_name() {
        let session = new_session();
        let mut user = sample_user();
        create(&session, &user).await.unwrap();

        user.name = "Ana Maria".to_string();
        refresh(&session, &user).await.unwrap();

        let data = get(&session).await.unwrap().unwrap();
        assert_eq!(data.user_name, "Ana Maria");
    }
}
