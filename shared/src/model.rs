use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::capabilities::PickerMode;
use crate::catalog::CatalogStateStore;
use crate::{
    AppError, ValidatedCoordinate, DEFAULT_LATITUDE_DELTA, DEFAULT_LONGITUDE_DELTA,
    DEFAULT_MAP_CENTER,
};

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

typed_id!(ItemId);

/// Identifies one location request so late answers can be told apart from
/// the request currently in flight.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocationRequestId(pub u64);

// --- Catalog entries ---

/// A destination, category or event. Everything beyond id, name and
/// category is display payload the catalog never looks at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub display_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            display_name: display_name.into(),
            category: None,
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// String metadata lookup for views; non-string values yield `None`.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }

    #[must_use]
    pub fn meta_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(serde_json::Value::as_u64)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TravelTip {
    pub id: String,
    pub title: String,
    pub tip: String,
    pub icon: String,
}

// --- Map layers ---

/// Kinds of point of interest shown on the map. Used both as the marker type
/// and as the filter chip id.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum MapLayer {
    Attractions,
    Nature,
    Restaurants,
    Events,
    Hotels,
    Shopping,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map layer: {0:?}")]
pub struct UnknownMapLayer(pub String);

impl MapLayer {
    pub const ALL: [MapLayer; 6] = [
        MapLayer::Attractions,
        MapLayer::Nature,
        MapLayer::Restaurants,
        MapLayer::Events,
        MapLayer::Hotels,
        MapLayer::Shopping,
    ];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Attractions => "attractions",
            Self::Nature => "nature",
            Self::Restaurants => "restaurants",
            Self::Events => "events",
            Self::Hotels => "hotels",
            Self::Shopping => "shopping",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attractions => "Attractions",
            Self::Nature => "Nature",
            Self::Restaurants => "Restaurants",
            Self::Events => "Events",
            Self::Hotels => "Hotels",
            Self::Shopping => "Shopping",
        }
    }

    /// Chip background when the filter is active.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Attractions => "#F97316",
            Self::Nature => "#22C55E",
            Self::Restaurants => "#EF4444",
            Self::Events => "#EAB308",
            Self::Hotels => "#3B82F6",
            Self::Shopping => "#A855F7",
        }
    }

    #[must_use]
    pub const fn chip_icon(self) -> &'static str {
        match self {
            Self::Attractions => "place",
            Self::Nature => "nature",
            Self::Restaurants => "restaurant",
            Self::Events => "event",
            Self::Hotels => "hotel",
            Self::Shopping => "shopping-cart",
        }
    }

    #[must_use]
    pub const fn marker_icon(self) -> &'static str {
        match self {
            Self::Attractions => "place",
            Self::Events => "event",
            Self::Hotels => "hotel",
            Self::Restaurants => "restaurant",
            Self::Nature | Self::Shopping => crate::FALLBACK_MARKER_ICON,
        }
    }
}

impl FromStr for MapLayer {
    type Err = UnknownMapLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attractions" | "attraction" => Ok(Self::Attractions),
            "nature" => Ok(Self::Nature),
            "restaurants" | "restaurant" => Ok(Self::Restaurants),
            "events" | "event" => Ok(Self::Events),
            "hotels" | "hotel" => Ok(Self::Hotels),
            "shopping" => Ok(Self::Shopping),
            _ => Err(UnknownMapLayer(s.to_owned())),
        }
    }
}

impl TryFrom<String> for MapLayer {
    type Error = UnknownMapLayer;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MapLayer> for String {
    fn from(layer: MapLayer) -> Self {
        layer.tag().to_owned()
    }
}

impl fmt::Display for MapLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MapMarker {
    pub id: ItemId,
    pub title: String,
    pub layer: MapLayer,
    pub coordinate: ValidatedCoordinate,
    pub rating: Option<f32>,
}

// --- Navigation ---

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Home,
    Map,
    Events,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Map, Tab::Events, Tab::Profile];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Map => "Map",
            Self::Events => "Events",
            Self::Profile => "Profile",
        }
    }

    #[must_use]
    pub const fn header_title(self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Map => Some("Discover Places"),
            Self::Events => Some("Upcoming Events"),
            Self::Profile => Some("My Profile"),
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Map => "map",
            Self::Events => "calendar",
            Self::Profile => "person",
        }
    }

    #[must_use]
    pub const fn route_segment(self) -> &'static str {
        match self {
            Self::Home => "",
            Self::Map => "map",
            Self::Events => "events",
            Self::Profile => "profile",
        }
    }
}

// --- Location ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Unknown,
    Requesting,
    Granted,
    Denied,
}

impl PermissionState {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

// --- Configuration ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub initial_center: ValidatedCoordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_center: DEFAULT_MAP_CENTER,
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            longitude_delta: DEFAULT_LONGITUDE_DELTA,
        }
    }
}

// --- Model ---

/// Screen-session state. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct Model {
    pub onboarded: bool,
    pub active_tab: Tab,
    pub catalog: CatalogStateStore,
    pub map_config: MapConfig,

    // Map
    pub filter_panel_open: bool,
    pub location_permission: PermissionState,
    pub pending_location: Option<LocationRequestId>,
    pub next_location_request: u64,

    // Events
    pub selected_event: Option<ItemId>,
    pub calendar_open: bool,
    pub picker: Option<PickerMode>,
    pub picked_at: Option<NaiveDateTime>,

    pub active_error: Option<AppError>,
}

impl Model {
    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    /// Hands out the id for a new location request and marks it as the one
    /// in flight, superseding any earlier request.
    pub fn begin_location_request(&mut self) -> LocationRequestId {
        self.next_location_request += 1;
        let id = LocationRequestId(self.next_location_request);
        self.pending_location = Some(id);
        id
    }

    #[must_use]
    pub fn is_current_location_request(&self, id: LocationRequestId) -> bool {
        self.pending_location == Some(id)
    }

    pub fn cancel_location_request(&mut self) -> Option<LocationRequestId> {
        self.pending_location.take()
    }
}
