//! Rated participants
//!
//! A [`RatingEntity`] holds one participant's committed rating plus a staging
//! area for the update in progress. The hosting application owns entities
//! through [`Participant`] handles; outcomes and periods hold clones of the
//! same handles, so committed values become visible to the host as soon as a
//! period commits.

use crate::error::Glicko2Error;
use crate::types::{EntityId, RatingSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Values staged for the next commit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagedRating {
    pub next: RatingSnapshot,
    /// Outcomes the participant was rated on this period
    pub games: usize,
}

/// One participant's persistent rating state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntity {
    id: EntityId,
    rating: f64,
    deviation: f64,
    volatility: f64,
    working: Option<StagedRating>,
    games_played: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl RatingEntity {
    /// Create an entity with explicit starting values
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self::with_id(EntityId::new(), rating, deviation, volatility)
    }

    /// Create an entity under an id chosen by the hosting application
    pub fn with_id(id: EntityId, rating: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            id,
            rating,
            deviation,
            volatility,
            working: None,
            games_played: 0,
            updated_at: None,
        }
    }

    /// Create an entity from a snapshot, e.g. the calculator's initial rating
    pub fn from_snapshot(snapshot: RatingSnapshot) -> Self {
        Self::new(snapshot.rating, snapshot.deviation, snapshot.volatility)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Total outcomes this entity has been rated on across committed periods
    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    /// When the last commit happened; `None` before the first one
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Committed state
    pub fn snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            rating: self.rating,
            deviation: self.deviation,
            volatility: self.volatility,
        }
    }

    /// Staged state, if an update is in progress
    pub fn working(&self) -> Option<&StagedRating> {
        self.working.as_ref()
    }

    pub(crate) fn stage(&mut self, next: RatingSnapshot, games: usize) {
        self.working = Some(StagedRating { next, games });
    }

    /// Copy staged values into the committed fields; returns false if nothing was staged
    pub(crate) fn commit(&mut self) -> bool {
        let Some(staged) = self.working.take() else {
            return false;
        };

        self.rating = staged.next.rating;
        self.deviation = staged.next.deviation;
        self.volatility = staged.next.volatility;
        self.games_played += staged.games as u64;
        self.updated_at = Some(crate::utils::current_timestamp());
        true
    }
}

impl Default for RatingEntity {
    fn default() -> Self {
        Self::from_snapshot(RatingSnapshot::default())
    }
}

/// Shared handle to a [`RatingEntity`]
///
/// Equality and hashing use the entity id only.
#[derive(Debug, Clone)]
pub struct Participant {
    id: EntityId,
    entity: Arc<RwLock<RatingEntity>>,
}

impl Participant {
    pub fn new(entity: RatingEntity) -> Self {
        Self {
            id: entity.id(),
            entity: Arc::new(RwLock::new(entity)),
        }
    }

    /// Create a participant with explicit starting values
    pub fn with_rating(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self::new(RatingEntity::new(rating, deviation, volatility))
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Acquire read access to the entity
    pub fn read(&self) -> crate::error::Result<RwLockReadGuard<'_, RatingEntity>> {
        self.entity.read().map_err(|_| {
            Glicko2Error::Internal {
                message: format!("Failed to acquire read lock for participant {}", self.id),
            }
            .into()
        })
    }

    fn write(&self) -> crate::error::Result<RwLockWriteGuard<'_, RatingEntity>> {
        self.entity.write().map_err(|_| {
            Glicko2Error::Internal {
                message: format!("Failed to acquire write lock for participant {}", self.id),
            }
            .into()
        })
    }

    /// Committed state
    pub fn snapshot(&self) -> crate::error::Result<RatingSnapshot> {
        Ok(self.read()?.snapshot())
    }

    pub(crate) fn stage(&self, next: RatingSnapshot, games: usize) -> crate::error::Result<()> {
        self.write()?.stage(next, games);
        Ok(())
    }

    pub(crate) fn commit(&self) -> crate::error::Result<bool> {
        Ok(self.write()?.commit())
    }
}

impl Default for Participant {
    fn default() -> Self {
        Self::new(RatingEntity::default())
    }
}

impl From<RatingEntity> for Participant {
    fn from(entity: RatingEntity) -> Self {
        Self::new(entity)
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
