use std::sync::Arc;

use tracing::{debug, instrument};

use models::user;

use super::domain::UserDetails;
use super::repository::{Principal, UserRepository};
use crate::errors::ServiceError;

/// Resolves the authenticated user and credential lookups for login.
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    principal: Arc<dyn Principal>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, principal: Arc<dyn Principal>) -> Self {
        Self { repo, principal }
    }

    /// Current principal's user row. Fails with `Unauthorized` when there is
    /// no principal or its username matches no user.
    #[instrument(skip(self))]
    pub async fn authenticated(&self) -> Result<user::Model, ServiceError> {
        let username = self.principal.username()?;
        debug!(%username, "resolving authenticated user");
        self.repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized(format!("unknown user: {username}")))
    }

    /// User plus granted authorities, for credential checks at login.
    /// An unknown username is an authentication failure, not a 404.
    #[instrument(skip(self))]
    pub async fn load_user_by_username(
        &self,
        username: &str,
    ) -> Result<UserDetails, ServiceError> {
        let rows = self.repo.search_user_with_roles(username).await?;
        let first = rows
            .first()
            .ok_or_else(|| ServiceError::Unauthorized(format!("unknown user: {username}")))?;
        Ok(UserDetails {
            username: first.username.clone(),
            password: first.password.clone(),
            authorities: rows.iter().map(|r| r.authority.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::mock::{FixedPrincipal, MockUserRepository, NoPrincipal};
    use chrono::Utc;

    const EXISTING_USERNAME: &str = "maria@example.com";
    const UNKNOWN_USERNAME: &str = "nobody@example.com";

    fn sample_user() -> user::Model {
        user::Model {
            id: 1,
            username: EXISTING_USERNAME.into(),
            password: "$argon2id$stub".into(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with_principal(username: &str) -> UserService<MockUserRepository> {
        let repo = Arc::new(MockUserRepository::with_user(
            sample_user(),
            vec!["ROLE_MEMBER", "ROLE_ADMIN"],
        ));
        UserService::new(repo, Arc::new(FixedPrincipal(username.to_string())))
    }

    #[tokio::test]
    async fn authenticated_returns_user_when_user_exists() {
        let svc = service_with_principal(EXISTING_USERNAME);
        let user = svc.authenticated().await.unwrap();
        assert_eq!(user.username, EXISTING_USERNAME);
    }

    #[tokio::test]
    async fn authenticated_reports_unauthorized_when_user_does_not_exist() {
        let svc = service_with_principal(UNKNOWN_USERNAME);
        let err = svc.authenticated().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn authenticated_reports_unauthorized_without_principal() {
        let repo = Arc::new(MockUserRepository::with_user(sample_user(), vec!["ROLE_MEMBER"]));
        let svc = UserService::new(repo, Arc::new(NoPrincipal));
        let err = svc.authenticated().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn load_user_by_username_returns_details_when_user_exists() {
        let svc = service_with_principal(EXISTING_USERNAME);
        let details = svc.load_user_by_username(EXISTING_USERNAME).await.unwrap();
        assert_eq!(details.username, EXISTING_USERNAME);
        assert_eq!(details.authorities, vec!["ROLE_MEMBER", "ROLE_ADMIN"]);
    }

    #[tokio::test]
    async fn load_user_by_username_reports_unauthorized_when_user_does_not_exist() {
        let svc = service_with_principal(EXISTING_USERNAME);
        let err = svc.load_user_by_username(UNKNOWN_USERNAME).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
