use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::capabilities::{PickerMode, Route};
use crate::catalog::CatalogStateStore;
use crate::model::{Item, MapConfig, MapLayer, MapMarker, Model, PermissionState, Tab};
use crate::{
    format_distance, AppError, ErrorSeverity, ValidatedCoordinate, ALL_CATEGORIES,
    USER_PIN_ICON, USER_PIN_TITLE,
};

const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";
const EVENT_DATE_DISPLAY: &str = "%b %-d";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub active_tab: Tab,
    pub tabs: Vec<TabItem>,
    pub screen: Screen,
    pub error: Option<UserFacingError>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabItem {
    pub tab: Tab,
    pub title: String,
    pub header_title: Option<String>,
    pub icon: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Screen {
    Onboarding(OnboardingView),
    Home(HomeView),
    Map(MapView),
    Events(EventsView),
    Profile(ProfileView),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnboardingView {
    pub title: String,
    pub continue_label: String,
}

// --- Home ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestinationCard {
    pub id: String,
    pub name: String,
    pub weather: Option<String>,
    pub image: Option<String>,
    pub is_favorite: bool,
    pub favorite_icon: String,
    pub route: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCard {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub route: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TipCard {
    pub id: String,
    pub title: String,
    pub tip: String,
    pub icon: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeView {
    pub destinations: Vec<DestinationCard>,
    pub categories: Vec<CategoryCard>,
    pub tips: Vec<TipCard>,
    pub favorite_count: usize,
}

// --- Map ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterChip {
    pub layer: MapLayer,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerPin {
    pub id: String,
    pub title: String,
    pub layer: MapLayer,
    pub icon: String,
    pub lat: f64,
    pub lon: f64,
    pub rating: Option<f32>,
    pub distance_text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserPin {
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub icon: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl From<&MapConfig> for MapRegion {
    fn from(config: &MapConfig) -> Self {
        Self {
            latitude: config.initial_center.lat(),
            longitude: config.initial_center.lon(),
            latitude_delta: config.latitude_delta,
            longitude_delta: config.longitude_delta,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub region: MapRegion,
    pub filters: Vec<FilterChip>,
    pub filter_panel_open: bool,
    pub has_active_filters: bool,
    pub pins: Vec<MarkerPin>,
    pub user_pin: Option<UserPin>,
    pub permission: PermissionState,
    pub locating: bool,
}

#[cfg(feature = "map-geojson")]
impl MapView {
    /// Visible pins as point features, for shells that draw a vector layer.
    #[must_use]
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        let features = self
            .pins
            .iter()
            .map(|pin| {
                let mut properties = geojson::JsonObject::new();
                properties.insert("title".into(), pin.title.clone().into());
                properties.insert("layer".into(), pin.layer.tag().into());
                properties.insert("icon".into(), pin.icon.clone().into());
                if let Some(rating) = pin.rating {
                    properties.insert("rating".into(), f64::from(rating).into());
                }

                geojson::Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                        pin.lon, pin.lat,
                    ]))),
                    id: Some(geojson::feature::Id::String(pin.id.clone())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

// --- Events ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryChip {
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub attendees: Option<u64>,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventsView {
    pub categories: Vec<CategoryChip>,
    pub events: Vec<EventCard>,
    pub selected_event: Option<EventCard>,
    pub calendar_open: bool,
    pub marked_dates: Vec<NaiveDate>,
    pub picker: Option<PickerMode>,
    pub picked_at: Option<NaiveDateTime>,
}

// --- Profile ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileView {
    pub favorites: Vec<DestinationCard>,
}

// --- Errors ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

// --- Builders ---

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let screen = if model.onboarded {
            match model.active_tab {
                Tab::Home => Screen::Home(build_home(&model.catalog)),
                Tab::Map => Screen::Map(build_map(model)),
                Tab::Events => Screen::Events(build_events(model)),
                Tab::Profile => Screen::Profile(build_profile(&model.catalog)),
            }
        } else {
            Screen::Onboarding(OnboardingView {
                title: "Welcome to Explore Cameroon".into(),
                continue_label: "Continue".into(),
            })
        };

        let tabs = Tab::ALL
            .iter()
            .map(|&tab| TabItem {
                tab,
                title: tab.title().into(),
                header_title: tab.header_title().map(Into::into),
                icon: tab.icon().into(),
                active: tab == model.active_tab,
            })
            .collect();

        Self {
            active_tab: model.active_tab,
            tabs,
            screen,
            error: model.active_error.as_ref().map(UserFacingError::from),
        }
    }
}

fn destination_card(catalog: &CatalogStateStore, item: &Item) -> DestinationCard {
    let is_favorite = catalog.is_favorite(&item.id);
    DestinationCard {
        id: item.id.to_string(),
        name: item.display_name.clone(),
        weather: item.meta_str("weather").map(Into::into),
        image: item.meta_str("image").map(Into::into),
        is_favorite,
        favorite_icon: if is_favorite { "heart" } else { "heart-outline" }.into(),
        route: Route::Destination {
            id: item.id.clone(),
        }
        .path(),
    }
}

fn build_home(catalog: &CatalogStateStore) -> HomeView {
    let categories = catalog
        .categories()
        .iter()
        .map(|c| CategoryCard {
            id: c.id.to_string(),
            name: c.display_name.clone(),
            icon: c.meta_str("icon").map(Into::into),
            color: c.meta_str("color").map(Into::into),
            description: c.meta_str("description").map(Into::into),
            route: Route::category(&c.display_name).path(),
        })
        .collect();

    let tips = catalog
        .travel_tips()
        .iter()
        .map(|t| TipCard {
            id: t.id.clone(),
            title: t.title.clone(),
            tip: t.tip.clone(),
            icon: t.icon.clone(),
        })
        .collect();

    HomeView {
        destinations: catalog
            .destinations()
            .iter()
            .map(|d| destination_card(catalog, d))
            .collect(),
        categories,
        tips,
        favorite_count: catalog.favorite_destinations().len(),
    }
}

fn marker_pin(marker: &MapMarker, user: Option<ValidatedCoordinate>) -> MarkerPin {
    MarkerPin {
        id: marker.id.to_string(),
        title: marker.title.clone(),
        layer: marker.layer,
        icon: marker.layer.marker_icon().into(),
        lat: marker.coordinate.lat(),
        lon: marker.coordinate.lon(),
        rating: marker.rating,
        distance_text: user.map(|u| format_distance(u.distance_to(marker.coordinate))),
    }
}

fn build_map(model: &Model) -> MapView {
    let catalog = &model.catalog;
    let user = catalog.user_position();

    let filters = MapLayer::ALL
        .iter()
        .map(|&layer| FilterChip {
            layer,
            label: layer.label().into(),
            icon: layer.chip_icon().into(),
            color: layer.color().into(),
            active: catalog.is_map_filter_active(layer),
        })
        .collect();

    MapView {
        region: MapRegion::from(&model.map_config),
        filters,
        filter_panel_open: model.filter_panel_open,
        has_active_filters: !catalog.active_map_filters().is_empty(),
        pins: catalog
            .visible_seeded_markers()
            .into_iter()
            .map(|m| marker_pin(m, user))
            .collect(),
        user_pin: user.map(|u| UserPin {
            lat: u.lat(),
            lon: u.lon(),
            title: USER_PIN_TITLE.into(),
            icon: USER_PIN_ICON.into(),
        }),
        permission: model.location_permission,
        locating: model.pending_location.is_some(),
    }
}

fn parse_event_date(item: &Item) -> Option<NaiveDate> {
    item.meta_str("date")
        .and_then(|s| NaiveDate::parse_from_str(s, EVENT_DATE_FORMAT).ok())
}

fn event_card(item: &Item) -> EventCard {
    let date = match (parse_event_date(item), item.meta_str("date")) {
        (Some(date), _) => Some(date.format(EVENT_DATE_DISPLAY).to_string()),
        (None, raw) => raw.map(Into::into),
    };

    EventCard {
        id: item.id.to_string(),
        title: item.display_name.clone(),
        category: item.category.clone(),
        location: item.meta_str("location").map(Into::into),
        date,
        time: item.meta_str("time").map(Into::into),
        description: item.meta_str("description").map(Into::into),
        attendees: item.meta_u64("attendees"),
        image: item.meta_str("image").map(Into::into),
    }
}

/// Dates carrying at least one event, sorted and deduplicated.
#[must_use]
pub fn calendar_marks(events: &[Item]) -> Vec<NaiveDate> {
    events
        .iter()
        .filter_map(parse_event_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn build_events(model: &Model) -> EventsView {
    let catalog = &model.catalog;
    let active = catalog.active_event_category().as_str();

    let categories = std::iter::once(ALL_CATEGORIES)
        .chain(catalog.event_categories().iter().map(String::as_str))
        .map(|label| CategoryChip {
            label: label.into(),
            selected: label == active,
        })
        .collect();

    EventsView {
        categories,
        events: catalog
            .filtered_events()
            .into_iter()
            .map(event_card)
            .collect(),
        selected_event: model
            .selected_event
            .as_ref()
            .and_then(|id| catalog.find_event(id))
            .map(event_card),
        calendar_open: model.calendar_open,
        marked_dates: calendar_marks(catalog.events()),
        picker: model.picker,
        picked_at: model.picked_at,
    }
}

fn build_profile(catalog: &CatalogStateStore) -> ProfileView {
    ProfileView {
        favorites: catalog
            .favorite_destinations()
            .into_iter()
            .map(|d| destination_card(catalog, d))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;
    use crate::seed::CatalogSeed;

    fn seeded_model() -> Model {
        Model {
            onboarded: true,
            catalog: CatalogStateStore::from_seed(CatalogSeed::bundled().unwrap()).unwrap(),
            ..Model::default()
        }
    }

    #[test]
    fn onboarding_screen_until_completed() {
        let vm = ViewModel::from(&Model::default());
        assert!(matches!(vm.screen, Screen::Onboarding(_)));
        assert_eq!(vm.tabs.len(), 4);
        assert!(vm.tabs[0].active);
    }

    #[test]
    fn home_marks_favorites() {
        let vm = ViewModel::from(&seeded_model());
        let Screen::Home(home) = vm.screen else {
            panic!("expected home screen");
        };
        assert_eq!(home.destinations.len(), 5);
        assert_eq!(home.favorite_count, 1);
        let limbe = &home.destinations[1];
        assert!(limbe.is_favorite);
        assert_eq!(limbe.favorite_icon, "heart");
        assert_eq!(limbe.route, "/destination/2");
        assert_eq!(home.destinations[0].favorite_icon, "heart-outline");
        assert_eq!(home.categories[3].route, "/category/beaches");
        assert_eq!(home.tips[1].icon, "car");
    }

    #[test]
    fn events_view_formats_cards_and_calendar() {
        let mut model = seeded_model();
        model.active_tab = Tab::Events;
        model.catalog.set_event_category("Music").unwrap();
        model.selected_event = Some(ItemId::new("1"));

        let Screen::Events(events) = ViewModel::from(&model).screen else {
            panic!("expected events screen");
        };
        let labels: Vec<_> = events.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["All", "Cultural", "Music", "Workshop", "Sports"]);
        assert!(events.categories[2].selected);

        assert_eq!(events.events.len(), 1);
        assert_eq!(events.events[0].title, "Beach Concert Series");
        assert_eq!(events.events[0].date.as_deref(), Some("Jan 28"));
        assert_eq!(events.events[0].attendees, Some(180));

        // The detail modal shows the tapped event even if it is filtered out.
        assert_eq!(
            events.selected_event.map(|e| e.title),
            Some("Cultural Festival 2025".to_string())
        );
        assert_eq!(
            events.marked_dates,
            [
                NaiveDate::from_ymd_opt(2025, 1, 27).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 28).unwrap()
            ]
        );
    }

    #[test]
    fn calendar_marks_skip_unparseable_dates() {
        let events = vec![
            Item::new("1", "a").with_metadata("date", "2025-02-01"),
            Item::new("2", "b").with_metadata("date", "Feb 1"),
            Item::new("3", "c").with_metadata("date", "2025-02-01"),
            Item::new("4", "d"),
        ];
        assert_eq!(
            calendar_marks(&events),
            [NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()]
        );
    }

    #[test]
    fn unparseable_event_date_is_shown_raw() {
        let card = event_card(&Item::new("1", "a").with_metadata("date", "Jan 27"));
        assert_eq!(card.date.as_deref(), Some("Jan 27"));
    }

    #[test]
    fn map_view_without_user_position_has_no_user_pin() {
        let mut model = seeded_model();
        model.active_tab = Tab::Map;
        let Screen::Map(map) = ViewModel::from(&model).screen else {
            panic!("expected map screen");
        };
        assert!(map.user_pin.is_none());
        assert_eq!(map.pins.len(), 1);
        assert_eq!(map.pins[0].icon, "place");
        assert_eq!(map.pins[0].distance_text, None);
        assert_eq!(map.filters.len(), MapLayer::ALL.len());
        assert!(!map.has_active_filters);
        assert_eq!(map.region.latitude, 4.0511);
    }

    #[test]
    fn map_view_with_user_position_shows_distance() {
        let mut model = seeded_model();
        model.active_tab = Tab::Map;
        model
            .catalog
            .set_user_position(Some(ValidatedCoordinate::new(4.0511, 9.7679).unwrap()));
        let Screen::Map(map) = ViewModel::from(&model).screen else {
            panic!("expected map screen");
        };
        let user = map.user_pin.expect("user pin");
        assert_eq!(user.title, USER_PIN_TITLE);
        assert_eq!(map.pins[0].distance_text.as_deref(), Some("0 m"));
    }

    #[test]
    fn active_filter_hides_other_layers() {
        let mut model = seeded_model();
        model.active_tab = Tab::Map;
        model.catalog.toggle_map_filter(MapLayer::Hotels);
        let Screen::Map(map) = ViewModel::from(&model).screen else {
            panic!("expected map screen");
        };
        assert!(map.pins.is_empty());
        assert!(map.has_active_filters);
        assert!(map.filters.iter().any(|f| f.layer == MapLayer::Hotels && f.active));
    }

    #[cfg(feature = "map-geojson")]
    #[test]
    fn map_pins_export_as_geojson_points() {
        let mut model = seeded_model();
        model.active_tab = Tab::Map;
        let Screen::Map(map) = ViewModel::from(&model).screen else {
            panic!("expected map screen");
        };
        let collection = map.to_feature_collection();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            feature.geometry.as_ref().map(|g| &g.value),
            Some(&geojson::Value::Point(vec![9.7679, 4.0511]))
        );
        assert_eq!(
            feature.property("layer").and_then(|v| v.as_str()),
            Some("attractions")
        );
    }

    #[test]
    fn profile_lists_only_favorites() {
        let mut model = seeded_model();
        model.active_tab = Tab::Profile;
        model.catalog.toggle_favorite(&ItemId::new("4"));
        let Screen::Profile(profile) = ViewModel::from(&model).screen else {
            panic!("expected profile screen");
        };
        let names: Vec<_> = profile.favorites.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Limbe Beach", "Kribi Beach"]);
    }

    #[test]
    fn error_is_projected_for_the_shell() {
        let mut model = seeded_model();
        model.set_error(
            crate::CatalogError::InvalidCategory {
                tag: "Opera".into(),
            }
            .into(),
        );
        let vm = ViewModel::from(&model);
        let error = vm.error.expect("error");
        assert_eq!(error.error_code, "INVALID_CATEGORY");
        assert_eq!(error.message, "unknown event category: \"Opera\"");
        assert!(!error.is_transient);
    }
}
