use async_trait::async_trait;
use sea_orm::{DatabaseConnection, ModelTrait};

use models::{role, user};

use super::domain::UserDetailsRow;
use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str)
        -> Result<Option<user::Model>, ServiceError>;
    /// User joined with its granted authorities; empty when the username is
    /// unknown.
    async fn search_user_with_roles(
        &self,
        username: &str,
    ) -> Result<Vec<UserDetailsRow>, ServiceError>;
}

/// Source of the current principal's username, supplied by the host web
/// framework (decoded token, session, ...). Kept as a trait so services can
/// be tested without any security stack.
pub trait Principal: Send + Sync {
    fn username(&self) -> Result<String, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_username(&self.db, username).await?)
    }

    async fn search_user_with_roles(
        &self,
        username: &str,
    ) -> Result<Vec<UserDetailsRow>, ServiceError> {
        let Some(u) = user::find_by_username(&self.db, username).await? else {
            return Ok(Vec::new());
        };
        let roles = u
            .find_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(roles
            .into_iter()
            .map(|r| UserDetailsRow {
                username: u.username.clone(),
                password: u.password.clone(),
                authority: r.authority,
            })
            .collect())
    }
}

/// Simple in-memory mock repository and principals for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<String, user::Model>>,
        // username -> granted authorities
        roles: Mutex<HashMap<String, Vec<String>>>,
    }

    impl MockUserRepository {
        pub fn with_user(user: user::Model, authorities: Vec<&str>) -> Self {
            let repo = Self::default();
            repo.roles.lock().unwrap().insert(
                user.username.clone(),
                authorities.into_iter().map(String::from).collect(),
            );
            repo.users.lock().unwrap().insert(user.username.clone(), user);
            repo
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<user::Model>, ServiceError> {
            Ok(self.users.lock().unwrap().get(username).cloned())
        }

        async fn search_user_with_roles(
            &self,
            username: &str,
        ) -> Result<Vec<UserDetailsRow>, ServiceError> {
            let users = self.users.lock().unwrap();
            let Some(u) = users.get(username) else {
                return Ok(Vec::new());
            };
            let roles = self.roles.lock().unwrap();
            Ok(roles
                .get(username)
                .map(|auths| {
                    auths
                        .iter()
                        .map(|a| UserDetailsRow {
                            username: u.username.clone(),
                            password: u.password.clone(),
                            authority: a.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    /// Principal that always resolves to a fixed username.
    pub struct FixedPrincipal(pub String);

    impl Principal for FixedPrincipal {
        fn username(&self) -> Result<String, ServiceError> {
            Ok(self.0.clone())
        }
    }

    /// Principal of an unauthenticated request.
    pub struct NoPrincipal;

    impl Principal for NoPrincipal {
        fn username(&self) -> Result<String, ServiceError> {
            Err(ServiceError::Unauthorized("no authenticated principal".into()))
        }
    }
}
