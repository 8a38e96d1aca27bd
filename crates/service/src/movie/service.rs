use std::sync::Arc;

use tracing::{info, instrument};

use models::movie;

use super::domain::{MovieDto, MovieInput};
use super::repository::MovieRepository;
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// Movie business service independent of the web framework.
pub struct MovieService<R: MovieRepository> {
    repo: Arc<R>,
}

impl<R: MovieRepository> MovieService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Paged title search; an empty title matches everything.
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        title: &str,
        page: Pagination,
    ) -> Result<Page<MovieDto>, ServiceError> {
        let found = self.repo.search_by_title(title, page).await?;
        Ok(found.map(MovieDto::from))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<MovieDto, ServiceError> {
        let m = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("movie"))?;
        Ok(m.into())
    }

    /// Persist a new movie with an empty score ledger.
    ///
    /// # Examples
    /// ```
    /// use service::movie::{MovieService, domain::MovieInput, repository::mock::MockMovieRepository};
    /// use std::sync::Arc;
    /// let svc = MovieService::new(Arc::new(MockMovieRepository::default()));
    /// let dto = tokio_test::block_on(svc.insert(MovieInput { title: "Alien".into() })).unwrap();
    /// assert_eq!(dto.title, "Alien");
    /// assert_eq!(dto.count, 0);
    /// ```
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn insert(&self, input: MovieInput) -> Result<MovieDto, ServiceError> {
        models::movie::validate_title(&input.title)?;
        let created = self.repo.insert(input.title.trim()).await?;
        info!(movie_id = created.id, "movie_created");
        Ok(created.into())
    }

    #[instrument(skip(self, input), fields(movie_id = id))]
    pub async fn update(&self, id: i64, input: MovieInput) -> Result<MovieDto, ServiceError> {
        models::movie::validate_title(&input.title)?;
        let mut m: movie::Model = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("movie"))?;
        m.title = input.title.trim().to_string();
        let saved = self.repo.save(m).await?;
        Ok(saved.into())
    }

    /// Delete a movie. Absent ids report not-found; ids still referenced by
    /// score rows report an integrity violation.
    #[instrument(skip(self), fields(movie_id = id))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(ServiceError::not_found("movie"));
        }
        self.repo.delete_by_id(id).await?;
        info!(movie_id = id, "movie_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::repository::mock::MockMovieRepository;

    const EXISTING_ID: i64 = 1;
    const NON_EXISTING_ID: i64 = 100;
    const DEPENDENT_ID: i64 = 3;

    fn sample_movie() -> movie::Model {
        movie::Model { id: EXISTING_ID, title: "The Witcher".into(), score: 4.5, count: 2 }
    }

    fn service_with_fixture() -> (Arc<MockMovieRepository>, MovieService<MockMovieRepository>) {
        let repo = Arc::new(MockMovieRepository::with_movies(vec![
            sample_movie(),
            movie::Model { id: DEPENDENT_ID, title: "The Scored One".into(), score: 3.0, count: 5 },
        ]));
        repo.mark_dependent(DEPENDENT_ID);
        let svc = MovieService::new(Arc::clone(&repo));
        (repo, svc)
    }

    #[tokio::test]
    async fn find_all_returns_paged_movies_and_queries_once() {
        let (repo, svc) = service_with_fixture();
        let page = svc
            .find_all("The Witcher", Pagination { page: 1, per_page: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 1);
        assert_eq!(repo.search_calls(), 1);
    }

    #[tokio::test]
    async fn find_by_id_returns_dto_when_id_exists() {
        let (_, svc) = service_with_fixture();
        let dto = svc.find_by_id(EXISTING_ID).await.unwrap();
        assert_eq!(dto.id, EXISTING_ID);
        assert_eq!(dto.title, "The Witcher");
    }

    #[tokio::test]
    async fn find_by_id_reports_not_found_when_id_does_not_exist() {
        let (_, svc) = service_with_fixture();
        let err = svc.find_by_id(NON_EXISTING_ID).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn insert_returns_dto() {
        let (_, svc) = service_with_fixture();
        let dto = svc.insert(MovieInput { title: "Dune".into() }).await.unwrap();
        assert_eq!(dto.title, "Dune");
        assert_eq!(dto.score, 0.0);
        assert_eq!(dto.count, 0);
    }

    #[tokio::test]
    async fn insert_rejects_blank_title() {
        let (_, svc) = service_with_fixture();
        let err = svc.insert(MovieInput { title: "   ".into() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn update_returns_dto_when_id_exists() {
        let (_, svc) = service_with_fixture();
        let dto = svc
            .update(EXISTING_ID, MovieInput { title: "The Witcher 2".into() })
            .await
            .unwrap();
        assert_eq!(dto.id, EXISTING_ID);
        assert_eq!(dto.title, "The Witcher 2");
        // existing score data survives a title update
        assert_eq!(dto.count, 2);
    }

    #[tokio::test]
    async fn update_reports_not_found_when_id_does_not_exist() {
        let (_, svc) = service_with_fixture();
        let err = svc
            .update(NON_EXISTING_ID, MovieInput { title: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_does_nothing_when_id_exists() {
        let (repo, svc) = service_with_fixture();
        svc.delete(EXISTING_ID).await.unwrap();
        assert!(!repo.exists_by_id(EXISTING_ID).await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_not_found_when_id_does_not_exist() {
        let (_, svc) = service_with_fixture();
        let err = svc.delete(NON_EXISTING_ID).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_integrity_violation_when_id_has_scores() {
        let (_, svc) = service_with_fixture();
        let err = svc.delete(DEPENDENT_ID).await.unwrap_err();
        assert!(matches!(err, ServiceError::IntegrityViolation(_)));
    }
}
