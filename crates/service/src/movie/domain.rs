use serde::{Deserialize, Serialize};

/// Movie as exposed at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub score: f64,
    pub count: i32,
}

/// Writable movie fields for insert and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieInput {
    pub title: String,
}

impl From<models::movie::Model> for MovieDto {
    fn from(m: models::movie::Model) -> Self {
        Self { id: m.id, title: m.title, score: m.score, count: m.count }
    }
}
