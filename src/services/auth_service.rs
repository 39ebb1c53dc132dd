use crate::auth::session::{self, SessionData};
use crate::models::{User, UserPublicView};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::{password, validation};
use std::sync::Arc;
use tower_sessions::Session;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("No account with that email")]
    NotFound,
    #[error("Account is inactive")]
    Inactive,
    #[error("Invalid email or password")]
    BadCredentials,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Access denied")]
    Forbidden,
    #[error("Session error: {0}")]
    SessionError(#[from] tower_sessions::session::Error),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Checks the credentials without touching any session.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let email = validation::normalize_email(&request.email);
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !user.active {
            return Err(AuthServiceError::Inactive);
        }

        if !password::verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::BadCredentials);
        }

        Ok(user)
    }

    pub async fn login(
        &self,
        session: &Session,
        request: LoginRequest,
    ) -> Result<UserPublicView, AuthServiceError> {
        let user = self.authenticate(request).await?;
        session::create(session, &user).await?;
        tracing::info!("User {} logged in", user.id);
        Ok(user.public_view())
    }

    pub async fn logout(&self, session: &Session) -> Result<(), AuthServiceError> {
        session::destroy(session).await?;
        Ok(())
    }

    /// Keeps the cached name and email in step with a profile edit.
    pub async fn refresh_session(
        &self,
        session: &Session,
        user: &User,
    ) -> Result<(), AuthServiceError> {
        session::refresh(session, user).await?;
        Ok(())
    }

    pub async fn current_session(
        &self,
        session: &Session,
    ) -> Result<Option<SessionData>, AuthServiceError> {
        Ok(session::get(session).await?)
    }

    pub async fn is_logged_in(&self, session: &Session) -> bool {
        matches!(session::get(session).await, Ok(Some(_)))
    }

    pub async fn is_admin(&self, session: &Session) -> bool {
        matches!(session::get(session).await, Ok(Some(data)) if data.is_admin())
    }

    /// The logged-in session, checked against the stored user. A session whose user was
    /// deleted or deactivated is flushed and counts as logged out.
    pub async fn require_session(
        &self,
        session: &Session,
    ) -> Result<SessionData, AuthServiceError> {
        let user = self.current_user(session).await?;
        Ok(SessionData::for_user(&user))
    }

    /// Role comes from the stored row, so a demotion takes effect on the next request.
    pub async fn require_admin(&self, session: &Session) -> Result<SessionData, AuthServiceError> {
        let user = self.current_user(session).await?;
        if user.is_admin() {
            Ok(SessionData::for_user(&user))
        } else {
            Err(AuthServiceError::Forbidden)
        }
    }

    pub async fn current_user(&self, session: &Session) -> Result<User, AuthServiceError> {
        let data = self
            .current_session(session)
            .await?
            .ok_or(AuthServiceError::NotAuthenticated)?;

        match self.user_repository.find_by_id(data.user_id).await? {
            Some(user) if user.active => Ok(user),
            _ => {
                tracing::info!("Dropping session of unavailable user {}", data.user_id);
                session::destroy(session).await?;
                Err(AuthServiceError::NotAuthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;
    use tower_sessions::MemoryStore;

    fn stored_user(active: bool, password: &str) -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: password::hash_password(password).unwrap(),
            phone: "11999999999".to_string(),
            location: "SP".to_string(),
            role: UserRole::User,
            active,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("ana@x.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));

        let result = service.authenticate(request("ANA@x.com", "secret1")).await;
        assert!(matches!(result, Err(AuthServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user(false, "secret1");

        mock_repo.expect_find_by_email().times(1).returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

        let service = AuthService::new(Arc::new(mock_repo));

        let result = service.authenticate(request("ana@x.com", "secret1")).await;
        assert!(matches!(result, Err(AuthServiceError::Inactive)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user(true, "secret1");

        mock_repo.expect_find_by_email().times(1).returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

        let service = AuthService::new(Arc::new(mock_repo));

        let result = service.authenticate(request("ana@x.com", "secret2")).await;
        assert!(matches!(result, Err(AuthServiceError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_login_writes_session_and_logout_clears_it() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user(true, "secret1");

        let stored = user.clone();
        mock_repo.expect_find_by_email().times(1).returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        mock_repo.expect_find_by_id().with(eq(1)).returning(move |_| {
            let user = stored.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

        let service = AuthService::new(Arc::new(mock_repo));
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        assert!(!service.is_logged_in(&session).await);

        let view = service
            .login(&session, request("ana@x.com", "secret1"))
            .await
            .expect("login");
        assert_eq!(view.email, "ana@x.com");
        assert!(service.is_logged_in(&session).await);
        assert!(!service.is_admin(&session).await);
        assert!(matches!(
            service.require_admin(&session).await,
            Err(AuthServiceError::Forbidden)
        ));

        service.logout(&session).await.expect("first logout");
        service.logout(&session).await.expect("second logout");
        assert!(!service.is_logged_in(&session).await);
        assert!(matches!(
            service.require_session(&session).await,
            Err(AuthServiceError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_session_of_deactivated_user_is_dropped() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user(false, "secret1");

        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .times(1)
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        let service = AuthService::new(Arc::new(mock_repo));
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session::create(&session, &stored_user(true, "secret1"))
            .await
            .expect("seed session");

        assert!(matches!(
            service.require_session(&session).await,
            Err(AuthServiceError::NotAuthenticated)
        ));
        assert!(!service.is_logged_in(&session).await);
    }

    #[tokio::test]
    async fn test_admin_role_is_read_from_stored_user() {
        let mut mock_repo = MockUserRepository::new();
        let demoted = stored_user(true, "secret1");

        mock_repo.expect_find_by_id().returning(move |_| {
            let user = demoted.clone();
            Box::pin(async move { Ok(Some(user)) })
        });

        let service = AuthService::new(Arc::new(mock_repo));
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut admin = stored_user(true, "secret1");
        admin.role = UserRole::Admin;
        session::create(&session, &admin).await.expect("seed session");

        assert!(service.is_admin(&session).await);
        assert!(matches!(
            service.require_admin(&session).await,
            Err(AuthServiceError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_session_of_deleted_user_is_dropped() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(mock_repo));
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session::create(&session, &stored_user(true, "secret1"))
            .await
            .expect("seed session");

        assert!(matches!(
            service.current_user(&session).await,
            Err(AuthServiceError::NotAuthenticated)
        ));
        assert!(matches!(
            service.current_session(&session).await,
            Ok(None)
        ));
    }
}
