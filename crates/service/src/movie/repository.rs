use async_trait::async_trait;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use models::movie;

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// Repository abstraction for movie persistence.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn search_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Page<movie::Model>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<movie::Model>, ServiceError>;
    async fn insert(&self, title: &str) -> Result<movie::Model, ServiceError>;
    async fn save(&self, movie: movie::Model) -> Result<movie::Model, ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmMovieRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn search_by_title(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Page<movie::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        let paginator = movie::Entity::find()
            .filter(movie::Column::Title.contains(title))
            .order_by_asc(movie::Column::Title)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await.map_err(ServiceError::from_db)?;
        let items = paginator.fetch_page(page_idx).await.map_err(ServiceError::from_db)?;
        Ok(Page { items, total, page: page_idx as u32 + 1, per_page: per_page as u32 })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<movie::Model>, ServiceError> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    async fn insert(&self, title: &str) -> Result<movie::Model, ServiceError> {
        Ok(movie::create(&self.db, title).await?)
    }

    async fn save(&self, m: movie::Model) -> Result<movie::Model, ServiceError> {
        let am = movie::ActiveModel {
            id: Unchanged(m.id),
            title: Set(m.title),
            score: Set(m.score),
            count: Set(m.count),
        };
        am.update(&self.db).await.map_err(ServiceError::from_db)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        movie::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockMovieRepository {
        movies: Mutex<HashMap<i64, movie::Model>>,
        // ids whose delete raises a foreign-key violation
        dependent: Mutex<HashSet<i64>>,
        next_id: AtomicI64,
        search_calls: AtomicUsize,
    }

    impl MockMovieRepository {
        pub fn with_movies(list: Vec<movie::Model>) -> Self {
            let repo = Self::default();
            let max = list.iter().map(|m| m.id).max().unwrap_or(0);
            repo.next_id.store(max, Ordering::SeqCst);
            {
                let mut map = repo.movies.lock().unwrap();
                for m in list {
                    map.insert(m.id, m);
                }
            }
            repo
        }

        /// Register an id whose delete should fail with an integrity violation.
        pub fn mark_dependent(&self, id: i64) {
            self.dependent.lock().unwrap().insert(id);
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieRepository for MockMovieRepository {
        async fn search_by_title(
            &self,
            title: &str,
            page: Pagination,
        ) -> Result<Page<movie::Model>, ServiceError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let (page_idx, per_page) = page.normalize();
            let mut all: Vec<movie::Model> = self
                .movies
                .lock()
                .unwrap()
                .values()
                .filter(|m| m.title.contains(title))
                .cloned()
                .collect();
            all.sort_by(|a, b| a.title.cmp(&b.title));
            let total = all.len() as u64;
            let items = all
                .into_iter()
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .collect();
            Ok(Page { items, total, page: page_idx as u32 + 1, per_page: per_page as u32 })
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<movie::Model>, ServiceError> {
            Ok(self.movies.lock().unwrap().get(&id).cloned())
        }

        async fn insert(&self, title: &str) -> Result<movie::Model, ServiceError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let m = movie::Model { id, title: title.to_string(), score: 0.0, count: 0 };
            self.movies.lock().unwrap().insert(id, m.clone());
            Ok(m)
        }

        async fn save(&self, m: movie::Model) -> Result<movie::Model, ServiceError> {
            let mut map = self.movies.lock().unwrap();
            if !map.contains_key(&m.id) {
                return Err(ServiceError::not_found("movie"));
            }
            map.insert(m.id, m.clone());
            Ok(m)
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
            Ok(self.movies.lock().unwrap().contains_key(&id))
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
            if self.dependent.lock().unwrap().contains(&id) {
                return Err(ServiceError::IntegrityViolation(
                    "score rows still reference movie".into(),
                ));
            }
            self.movies.lock().unwrap().remove(&id);
            Ok(())
        }
    }
}
