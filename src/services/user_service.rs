use crate::models::{NewUser, User, UserChanges, UserQuery, UserRole};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::password::{self, HashError};
use crate::services::validation::{self, Validator};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("You cannot delete your own account")]
    CannotDeleteSelf,
    #[error(transparent)]
    HashingError(#[from] HashError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub location: String,
}

/// Fields a user may change on their own profile; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Public sign-up: every contact field is mandatory and the role is always `user`.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, UserServiceError> {
        let email = validation::normalize_email(&request.email);

        let mut validator = Validator::new();
        validator
            .require(&request.name, "Name is required")
            .check(validation::is_valid_email(&email), "A valid email is required")
            .check(
                validation::is_strong_enough(&request.password),
                "Password must be at least 6 characters",
            )
            .require(&request.phone, "Phone is required")
            .require(&request.location, "Location is required");
        validator.finish().map_err(UserServiceError::Validation)?;

        let user = self.insert(request, email, UserRole::User).await?;
        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Account creation from the command line; phone and location may be blank.
    pub async fn create_account(
        &self,
        request: RegisterRequest,
        role: UserRole,
    ) -> Result<User, UserServiceError> {
        let email = validation::normalize_email(&request.email);

        let mut validator = Validator::new();
        validator
            .require(&request.name, "Name is required")
            .check(validation::is_valid_email(&email), "A valid email is required")
            .check(
                validation::is_strong_enough(&request.password),
                "Password must be at least 6 characters",
            );
        validator.finish().map_err(UserServiceError::Validation)?;

        self.insert(request, email, role).await
    }

    async fn insert(
        &self,
        request: RegisterRequest,
        email: String,
        role: UserRole,
    ) -> Result<User, UserServiceError> {
        if self.repository.email_exists(&email, None).await? {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = password::hash_password(&request.password)?;
        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
            phone: request.phone.trim().to_string(),
            location: request.location.trim().to_string(),
            role,
        };

        match self.repository.create_user(new_user).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        update: ProfileUpdate,
    ) -> Result<User, UserServiceError> {
        let name = update.name.map(|n| n.trim().to_string());
        if matches!(name.as_deref(), Some("")) {
            return Err(UserServiceError::Validation(
                "Name cannot be empty".to_string(),
            ));
        }

        let password_hash = match update.password.as_deref() {
            Some(password) if !validation::is_strong_enough(password) => {
                return Err(UserServiceError::Validation(
                    "Password must be at least 6 characters".to_string(),
                ));
            }
            Some(password) => Some(password::hash_password(password)?),
            None => None,
        };

        let changes = UserChanges {
            name,
            phone: update.phone.map(|p| p.trim().to_string()),
            location: update.location.map(|l| l.trim().to_string()),
            password_hash,
        };
        if changes.is_empty() {
            return Err(UserServiceError::NothingToUpdate);
        }

        self.repository
            .update_user(user_id, changes)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn set_password(&self, user_id: i64, password: &str) -> Result<(), UserServiceError> {
        self.update_profile(
            user_id,
            ProfileUpdate {
                password: Some(password.to_string()),
                ..Default::default()
            },
        )
        .await
        .map(|_| ())
    }

    /// Removes the account and every item it owns.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), UserServiceError> {
        if self.repository.delete_user_with_items(user_id).await? {
            tracing::info!("Deleted account {}", user_id);
            Ok(())
        } else {
            Err(UserServiceError::UserNotFound)
        }
    }

    pub async fn admin_delete_user(
        &self,
        admin_id: i64,
        target_id: i64,
    ) -> Result<(), UserServiceError> {
        if admin_id == target_id {
            return Err(UserServiceError::CannotDeleteSelf);
        }
        if self.repository.find_by_id(target_id).await?.is_none() {
            return Err(UserServiceError::UserNotFound);
        }

        self.delete_account(target_id).await?;
        tracing::info!("Admin {} deleted user {}", admin_id, target_id);
        Ok(())
    }

    pub async fn set_user_active(
        &self,
        user_id: i64,
        active: bool,
    ) -> Result<(), UserServiceError> {
        if self.repository.set_active(user_id, active).await? {
            tracing::info!("User {} active = {}", user_id, active);
            Ok(())
        } else {
            Err(UserServiceError::UserNotFound)
        }
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let email = validation::normalize_email(email);
        Ok(self.repository.find_by_email(&email).await?)
    }

    pub async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.find_all(query).await?)
    }

    pub async fn count_users(&self) -> Result<i64, UserServiceError> {
        Ok(self.repository.count().await?)
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        password::verify_password(password, password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn sample_user(id: i64, email: &str) -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id,
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            phone: "11999999999".to_string(),
            location: "SP".to_string(),
            role: UserRole::User,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn ana() -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: "Ana@X.com".to_string(),
            password: "secret1".to_string(),
            phone: "11999999999".to_string(),
            location: "SP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_email_exists()
            .with(eq("ana@x.com"), eq(None))
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(false) }));

        mock_repo
            .expect_create_user()
            .withf(|new_user| {
                new_user.email == "ana@x.com"
                    && new_user.role == UserRole::User
                    && new_user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_user| {
                let user = sample_user(1, &new_user.email);
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let user = service.register(ana()).await.expect("Expected Ok result");
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_register_reports_every_missing_field() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let request = RegisterRequest {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            phone: "".to_string(),
            location: "SP".to_string(),
        };

        match service.register(request).await {
            Err(UserServiceError::Validation(msg)) => assert_eq!(
                msg,
                "Name is required, A valid email is required, \
                 Password must be at least 6 characters, Phone is required"
            ),
            other => panic!("unexpected result: {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_email_exists()
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(true) }));
        mock_repo.expect_create_user().times(0);

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.register(ana()).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_profile_requires_a_change() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let result = service.update_profile(1, ProfileUpdate::default()).await;
        assert!(matches!(result, Err(UserServiceError::NothingToUpdate)));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_blank_name_and_short_password() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let blank = ProfileUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_profile(1, blank).await,
            Err(UserServiceError::Validation(_))
        ));

        let short = ProfileUpdate {
            password: Some("12345".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_profile(1, short).await,
            Err(UserServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_password() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_update_user()
            .withf(|id, changes| {
                *id == 3
                    && changes.name.as_deref() == Some("Bia")
                    && changes
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2"))
            })
            .times(1)
            .returning(|id, _| {
                let user = sample_user(id, "bia@x.com");
                Box::pin(async move { Ok(Some(user)) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let update = ProfileUpdate {
            name: Some(" Bia ".to_string()),
            password: Some("newsecret".to_string()),
            ..Default::default()
        };
        let user = service.update_profile(3, update).await.expect("update");
        assert_eq!(user.id, 3);
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let service = UserService::new(Arc::new(MockUserRepository::new()));

        let result = service.admin_delete_user(1, 1).await;
        assert!(matches!(result, Err(UserServiceError::CannotDeleteSelf)));
    }

    #[tokio::test]
    async fn test_admin_delete_missing_user() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(9))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo.expect_delete_user_with_items().times(0);

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.admin_delete_user(1, 9).await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_delete_account_cascades() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_delete_user_with_items()
            .with(eq(4))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(true) }));

        let service = UserService::new(Arc::new(mock_repo));

        assert!(service.delete_account(4).await.is_ok());
    }
}
