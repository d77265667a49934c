//! Catalog state: the seeded collections plus everything the user has
//! selected on top of them.
//!
//! Base collections are fixed at construction. Selection changes only through
//! the intent methods on [`CatalogStateStore`], and every list the screens show
//! is derived from `(collections, selection)` without side effects, so the same
//! inputs always produce an equal view.
//!
//! Id-based intents are total: an unknown or empty id is a valid id that
//! simply matches nothing. The only rejected intent is selecting an event
//! category that was never configured.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::model::{Item, ItemId, MapLayer, MapMarker, TravelTip};
use crate::seed::{CatalogSeed, SeedError};
use crate::{ValidatedCoordinate, ALL_CATEGORIES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown event category: {tag:?}")]
    InvalidCategory { tag: String },
}

/// Flips membership of `value`: removes it when present, inserts it otherwise.
///
/// Takes the set by value and returns the new one, so callers never observe a
/// half-updated set. Applying it twice with the same value yields the input.
#[must_use]
pub fn toggle<T: Ord>(mut set: BTreeSet<T>, value: T) -> BTreeSet<T> {
    if !set.remove(&value) {
        set.insert(value);
    }
    set
}

/// Active event category: either no filter or one configured tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Tag(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Tag(tag) => tag,
        }
    }

    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => item.category.as_deref() == Some(tag.as_str()),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Tag(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_owned(),
            CategoryFilter::Tag(tag) => tag,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub favorite_ids: BTreeSet<ItemId>,
    pub active_event_category: CategoryFilter,
    /// Empty means no filtering, not "match nothing".
    pub active_map_filters: BTreeSet<MapLayer>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStateStore {
    destinations: Vec<Item>,
    categories: Vec<Item>,
    event_categories: Vec<String>,
    events: Vec<Item>,
    markers: Vec<MapMarker>,
    travel_tips: Vec<TravelTip>,
    user_position: Option<ValidatedCoordinate>,
    selection: SelectionState,
}

impl CatalogStateStore {
    /// Builds the store from seed data. Favorites start as the destinations
    /// flagged `is_favorite`.
    #[instrument(skip(seed))]
    pub fn from_seed(seed: CatalogSeed) -> Result<Self, SeedError> {
        ensure_unique_ids("destinations", seed.destinations.iter().map(|d| &d.item.id))?;
        ensure_unique_ids("categories", seed.categories.iter().map(|c| &c.id))?;
        ensure_unique_ids("events", seed.events.iter().map(|e| &e.id))?;
        ensure_unique_ids("markers", seed.markers.iter().map(|m| &m.id))?;

        let mut seen_tags = HashSet::new();
        for tag in &seed.event_categories {
            if tag == ALL_CATEGORIES {
                return Err(SeedError::ReservedCategory(tag.clone()));
            }
            if !seen_tags.insert(tag.as_str()) {
                return Err(SeedError::DuplicateId {
                    collection: "event_categories",
                    id: tag.clone(),
                });
            }
        }

        let markers = seed
            .markers
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<MapMarker>, SeedError>>()?;

        let favorite_ids: BTreeSet<ItemId> = seed
            .destinations
            .iter()
            .filter(|d| d.is_favorite)
            .map(|d| d.item.id.clone())
            .collect();

        let destinations: Vec<Item> = seed.destinations.into_iter().map(|d| d.item).collect();

        info!(
            destinations = destinations.len(),
            categories = seed.categories.len(),
            events = seed.events.len(),
            markers = markers.len(),
            favorites = favorite_ids.len(),
            "catalog seeded"
        );

        Ok(Self {
            destinations,
            categories: seed.categories,
            event_categories: seed.event_categories,
            events: seed.events,
            markers,
            travel_tips: seed.travel_tips,
            user_position: None,
            selection: SelectionState {
                favorite_ids,
                ..SelectionState::default()
            },
        })
    }

    // --- Intents ---

    #[instrument(skip(self, id), fields(id = %id))]
    pub fn toggle_favorite(&mut self, id: &ItemId) {
        let current = std::mem::take(&mut self.selection.favorite_ids);
        self.selection.favorite_ids = toggle(current, id.clone());
        debug!(favorite = self.is_favorite(id), "favorite toggled");
    }

    /// Selects the event category to filter by. `"All"` clears the filter;
    /// any other tag must be one of the configured event categories.
    #[instrument(skip(self))]
    pub fn set_event_category(&mut self, tag: &str) -> Result<(), CatalogError> {
        let filter = if tag == ALL_CATEGORIES {
            CategoryFilter::All
        } else if self.event_categories.iter().any(|c| c == tag) {
            CategoryFilter::Tag(tag.to_owned())
        } else {
            warn!("rejecting unknown event category");
            return Err(CatalogError::InvalidCategory {
                tag: tag.to_owned(),
            });
        };

        self.selection.active_event_category = filter;
        debug!("event category selected");
        Ok(())
    }

    #[instrument(skip(self, layer), fields(layer = %layer))]
    pub fn toggle_map_filter(&mut self, layer: MapLayer) {
        let current = std::mem::take(&mut self.selection.active_map_filters);
        self.selection.active_map_filters = toggle(current, layer);
        debug!(
            active = self.selection.active_map_filters.len(),
            "map filter toggled"
        );
    }

    pub fn clear_map_filters(&mut self) {
        if !self.selection.active_map_filters.is_empty() {
            debug!("map filters cleared");
        }
        self.selection.active_map_filters.clear();
    }

    /// Records the resolved user position; `None` when the location
    /// collaborator was denied or failed.
    pub fn set_user_position(&mut self, position: Option<ValidatedCoordinate>) {
        self.user_position = position;
    }

    // --- Queries ---

    #[must_use]
    pub fn is_favorite(&self, id: &ItemId) -> bool {
        self.selection.favorite_ids.contains(id)
    }

    /// Events in seed order, restricted to the active category.
    #[must_use]
    pub fn filtered_events(&self) -> Vec<&Item> {
        let filter = &self.selection.active_event_category;
        self.events.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Markers whose layer is an active filter, in input order. With no
    /// active filter every marker is visible.
    #[must_use]
    pub fn visible_markers<'a>(&self, markers: &'a [MapMarker]) -> Vec<&'a MapMarker> {
        let filters = &self.selection.active_map_filters;
        if filters.is_empty() {
            return markers.iter().collect();
        }
        markers.iter().filter(|m| filters.contains(&m.layer)).collect()
    }

    /// [`Self::visible_markers`] over the seeded markers.
    #[must_use]
    pub fn visible_seeded_markers(&self) -> Vec<&MapMarker> {
        self.visible_markers(&self.markers)
    }

    /// Favorited destinations in seed order. Ids favorited without a matching
    /// destination are kept in the selection but never listed here.
    #[must_use]
    pub fn favorite_destinations(&self) -> Vec<&Item> {
        self.destinations
            .iter()
            .filter(|d| self.is_favorite(&d.id))
            .collect()
    }

    #[must_use]
    pub fn find_destination(&self, id: &ItemId) -> Option<&Item> {
        self.destinations.iter().find(|d| &d.id == id)
    }

    #[must_use]
    pub fn find_category(&self, id: &ItemId) -> Option<&Item> {
        self.categories.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn find_event(&self, id: &ItemId) -> Option<&Item> {
        self.events.iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn is_map_filter_active(&self, layer: MapLayer) -> bool {
        self.selection.active_map_filters.contains(&layer)
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn active_event_category(&self) -> &CategoryFilter {
        &self.selection.active_event_category
    }

    #[must_use]
    pub fn active_map_filters(&self) -> &BTreeSet<MapLayer> {
        &self.selection.active_map_filters
    }

    #[must_use]
    pub fn destinations(&self) -> &[Item] {
        &self.destinations
    }

    #[must_use]
    pub fn categories(&self) -> &[Item] {
        &self.categories
    }

    #[must_use]
    pub fn event_categories(&self) -> &[String] {
        &self.event_categories
    }

    #[must_use]
    pub fn events(&self) -> &[Item] {
        &self.events
    }

    #[must_use]
    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    #[must_use]
    pub fn travel_tips(&self) -> &[TravelTip] {
        &self.travel_tips
    }

    #[must_use]
    pub fn user_position(&self) -> Option<ValidatedCoordinate> {
        self.user_position
    }
}

fn ensure_unique_ids<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a ItemId>,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SeedError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
