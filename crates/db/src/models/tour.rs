//! Tour entity model and DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::types::{DbId, Timestamp};

/// Physical difficulty rating of a tour.
///
/// Stored as lowercase text in `tours.difficulty`; the column carries a CHECK
/// constraint with the same three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown difficulty: {0}")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

// Used by sqlx to decode the `tours.difficulty` TEXT column.
impl TryFrom<String> for Difficulty {
    type Error = ParseDifficultyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Full tour row from the `tours` table.
///
/// `start_location` and `locations` are GeoJSON-shaped documents kept as
/// JSONB; the server never interprets them beyond passing them through.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tour {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub duration: i32,
    pub max_group_size: i32,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub price: f64,
    pub discount: Option<f64>,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<Timestamp>,
    /// Staff-only tours are hidden from every read path; not exposed on the
    /// wire at all.
    #[serde(skip_serializing)]
    pub secret: bool,
    pub start_location: Option<serde_json::Value>,
    pub locations: serde_json::Value,
    pub guides: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new tour. The slug is derived from the name by the
/// repository, never supplied by the client.
#[derive(Debug, Deserialize)]
pub struct CreateTour {
    pub name: String,
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub price: f64,
    pub discount: Option<f64>,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub start_dates: Vec<Timestamp>,
    #[serde(default)]
    pub secret: bool,
    pub start_location: Option<serde_json::Value>,
    #[serde(default = "empty_locations")]
    pub locations: serde_json::Value,
    #[serde(default)]
    pub guides: Vec<DbId>,
}

fn empty_locations() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// DTO for updating an existing tour. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateTour {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<Timestamp>>,
    pub secret: Option<bool>,
    pub start_location: Option<serde_json::Value>,
    pub locations: Option<serde_json::Value>,
    pub guides: Option<Vec<DbId>>,
}

/// One row of the per-difficulty catalog statistics.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TourStats {
    pub difficulty: String,
    pub num_tours: i64,
    pub num_ratings: i64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}
