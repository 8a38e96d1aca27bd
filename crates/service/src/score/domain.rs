use serde::{Deserialize, Serialize};

/// Score submission shape: which movie, and the value the current user gives
/// it (0 to 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDto {
    pub movie_id: i64,
    pub score: f64,
}
