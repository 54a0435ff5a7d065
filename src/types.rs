//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use uuid::Uuid;

/// Stable identity of a rated participant
///
/// Equality and hashing of participants go through this id, never through the
/// numeric rating fields, which change every period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(crate::utils::generate_entity_id())
    }

    /// Wrap an id supplied by the hosting application
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rating state on the conventional (Glicko) scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl RatingSnapshot {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            deviation,
            volatility,
        }
    }

    /// 95% confidence interval around the rating
    pub fn confidence_interval(&self) -> (f64, f64) {
        (
            self.rating - 1.96 * self.deviation,
            self.rating + 1.96 * self.deviation,
        )
    }
}

impl Default for RatingSnapshot {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl From<Glicko2Rating> for RatingSnapshot {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

impl From<RatingSnapshot> for Glicko2Rating {
    fn from(snapshot: RatingSnapshot) -> Self {
        Self {
            rating: snapshot.rating,
            deviation: snapshot.deviation,
            volatility: snapshot.volatility,
        }
    }
}

/// Rating and deviation on the internal Glicko-2 scale (mu, phi)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InternalRating {
    pub mu: f64,
    pub phi: f64,
}

/// Rating change information for one participant after a committed period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub entity_id: EntityId,
    pub old_rating: RatingSnapshot,
    pub new_rating: RatingSnapshot,
    /// Outcomes the participant was rated on in this period
    pub games: usize,
}

impl RatingChange {
    /// Signed change of the rating value
    pub fn rating_delta(&self) -> f64 {
        self.new_rating.rating - self.old_rating.rating
    }
}
