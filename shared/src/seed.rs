//! Seed payload the catalog is built from.
//!
//! The app ships with a bundled catalog compiled into the binary; shells may
//! hand over their own seed instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{Item, ItemId, MapLayer, MapMarker, TravelTip};
use crate::{CoordinateError, ValidatedCoordinate};

pub const BUNDLED_SEED_JSON: &str = include_str!("../data/seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to parse seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate id {id:?} in {collection}")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    #[error("event category {0:?} is reserved")]
    ReservedCategory(String),

    #[error("marker {id} has an invalid coordinate: {source}")]
    InvalidCoordinate {
        id: String,
        #[source]
        source: CoordinateError,
    },
}

/// A destination as seeded, with its initial favorite flag.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeedItem {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MarkerSeed {
    pub id: ItemId,
    pub title: String,
    pub layer: MapLayer,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl TryFrom<MarkerSeed> for MapMarker {
    type Error = SeedError;

    fn try_from(seed: MarkerSeed) -> Result<Self, Self::Error> {
        let coordinate = ValidatedCoordinate::new(seed.latitude, seed.longitude).map_err(
            |source| SeedError::InvalidCoordinate {
                id: seed.id.to_string(),
                source,
            },
        )?;

        Ok(MapMarker {
            id: seed.id,
            title: seed.title,
            layer: seed.layer,
            coordinate,
            rating: seed.rating,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CatalogSeed {
    #[serde(default)]
    pub destinations: Vec<SeedItem>,
    #[serde(default)]
    pub categories: Vec<Item>,
    #[serde(default)]
    pub event_categories: Vec<String>,
    #[serde(default)]
    pub events: Vec<Item>,
    #[serde(default)]
    pub markers: Vec<MarkerSeed>,
    #[serde(default)]
    pub travel_tips: Vec<TravelTip>,
}

impl CatalogSeed {
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_SEED_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_json::from_str(json)?;
        debug!(bytes = json.len(), "seed parsed");
        Ok(seed)
    }
}
