use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::ScoreDto;
use super::repository::ScoreRepository;
use crate::errors::ServiceError;
use crate::movie::domain::MovieDto;
use crate::movie::repository::MovieRepository;
use crate::user::repository::UserRepository;
use crate::user::UserService;

/// Records the authenticated user's score for a movie and keeps the movie's
/// average up to date.
pub struct ScoreService<S: ScoreRepository, M: MovieRepository, U: UserRepository> {
    scores: Arc<S>,
    movies: Arc<M>,
    users: UserService<U>,
}

impl<S: ScoreRepository, M: MovieRepository, U: UserRepository> ScoreService<S, M, U> {
    pub fn new(scores: Arc<S>, movies: Arc<M>, users: UserService<U>) -> Self {
        Self { scores, movies, users }
    }

    /// Upsert the current user's score for a movie, then recompute the
    /// movie's average and count over all of its scores. Returns the updated
    /// movie.
    #[instrument(skip(self, input), fields(movie_id = input.movie_id))]
    pub async fn save_score(&self, input: ScoreDto) -> Result<MovieDto, ServiceError> {
        let user = self.users.authenticated().await?;
        let mut movie = self
            .movies
            .find_by_id(input.movie_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("movie"))?;

        self.scores.upsert(user.id, movie.id, input.score).await?;

        // Full recomputation keeps the upsert idempotent
        let all = self.scores.find_by_movie(movie.id).await?;
        let count = all.len() as i32;
        let sum: f64 = all.iter().map(|s| s.value).sum();
        movie.score = if count > 0 { sum / count as f64 } else { 0.0 };
        movie.count = count;

        let saved = self.movies.save(movie).await?;
        info!(
            movie_id = saved.id,
            user_id = user.id,
            average = saved.score,
            count = saved.count,
            "score_saved"
        );
        Ok(saved.into())
    }
}
