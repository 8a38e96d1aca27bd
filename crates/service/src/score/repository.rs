use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use models::score;

use crate::errors::ServiceError;

/// Repository abstraction for score persistence.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Lookup-or-create on the (user, movie) key; a second submission by the
    /// same user replaces the previous value.
    async fn upsert(
        &self,
        user_id: i64,
        movie_id: i64,
        value: f64,
    ) -> Result<score::Model, ServiceError>;
    async fn find_by_movie(&self, movie_id: i64) -> Result<Vec<score::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmScoreRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ScoreRepository for SeaOrmScoreRepository {
    async fn upsert(
        &self,
        user_id: i64,
        movie_id: i64,
        value: f64,
    ) -> Result<score::Model, ServiceError> {
        let existing = score::Entity::find_by_id((user_id, movie_id))
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        match existing {
            Some(_) => {
                let am = score::ActiveModel {
                    user_id: Unchanged(user_id),
                    movie_id: Unchanged(movie_id),
                    value: Set(value),
                };
                am.update(&self.db).await.map_err(ServiceError::from_db)
            }
            None => {
                let am = score::ActiveModel {
                    user_id: Set(user_id),
                    movie_id: Set(movie_id),
                    value: Set(value),
                };
                am.insert(&self.db).await.map_err(ServiceError::from_db)
            }
        }
    }

    async fn find_by_movie(&self, movie_id: i64) -> Result<Vec<score::Model>, ServiceError> {
        score::Entity::find()
            .filter(score::Column::MovieId.eq(movie_id))
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockScoreRepository {
        scores: Mutex<HashMap<(i64, i64), score::Model>>,
    }

    impl MockScoreRepository {
        pub fn with_scores(list: Vec<score::Model>) -> Self {
            let repo = Self::default();
            {
                let mut map = repo.scores.lock().unwrap();
                for s in list {
                    map.insert((s.user_id, s.movie_id), s);
                }
            }
            repo
        }
    }

    #[async_trait]
    impl ScoreRepository for MockScoreRepository {
        async fn upsert(
            &self,
            user_id: i64,
            movie_id: i64,
            value: f64,
        ) -> Result<score::Model, ServiceError> {
            let s = score::Model { user_id, movie_id, value };
            self.scores.lock().unwrap().insert((user_id, movie_id), s.clone());
            Ok(s)
        }

        async fn find_by_movie(
            &self,
            movie_id: i64,
        ) -> Result<Vec<score::Model>, ServiceError> {
            let mut rows: Vec<score::Model> = self
                .scores
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.movie_id == movie_id)
                .cloned()
                .collect();
            rows.sort_by_key(|s| s.user_id);
            Ok(rows)
        }
    }
}
