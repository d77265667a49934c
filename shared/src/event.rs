use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationResult, PickerMode, PickerOutput};
use crate::model::{ItemId, LocationRequestId, MapLayer, Tab};
use crate::seed::CatalogSeed;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Event {
    #[default]
    Noop,

    // Lifecycle
    AppStarted,
    SeedProvided(Box<CatalogSeed>),
    OnboardingCompleted,
    TabSelected {
        tab: Tab,
    },

    // Home
    FavoriteToggled {
        id: ItemId,
    },
    DestinationTapped {
        id: ItemId,
    },
    CategoryTapped {
        id: ItemId,
    },
    SeeAllDestinationsRequested,
    SearchRequested,
    ProfileRequested,

    // Events
    EventCategorySelected {
        tag: String,
    },
    EventTapped {
        id: ItemId,
    },
    EventDetailsDismissed,
    CalendarToggled,
    DatePickerRequested {
        mode: PickerMode,
    },

    // Map
    MapFilterToggled {
        layer: MapLayer,
    },
    MapFiltersCleared,
    FilterPanelToggled,
    LocateUserRequested,

    DismissError,

    // Capability responses
    #[serde(skip)]
    LocationPermissionResolved {
        request: LocationRequestId,
        result: Box<LocationResult>,
    },
    #[serde(skip)]
    PositionResolved {
        request: LocationRequestId,
        result: Box<LocationResult>,
    },
    #[serde(skip)]
    DatePickerResolved(PickerOutput),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::SeedProvided(_) => "seed_provided",
            Self::OnboardingCompleted => "onboarding_completed",
            Self::TabSelected { .. } => "tab_selected",
            Self::FavoriteToggled { .. } => "favorite_toggled",
            Self::DestinationTapped { .. } => "destination_tapped",
            Self::CategoryTapped { .. } => "category_tapped",
            Self::SeeAllDestinationsRequested => "see_all_destinations_requested",
            Self::SearchRequested => "search_requested",
            Self::ProfileRequested => "profile_requested",
            Self::EventCategorySelected { .. } => "event_category_selected",
            Self::EventTapped { .. } => "event_tapped",
            Self::EventDetailsDismissed => "event_details_dismissed",
            Self::CalendarToggled => "calendar_toggled",
            Self::DatePickerRequested { .. } => "date_picker_requested",
            Self::MapFilterToggled { .. } => "map_filter_toggled",
            Self::MapFiltersCleared => "map_filters_cleared",
            Self::FilterPanelToggled => "filter_panel_toggled",
            Self::LocateUserRequested => "locate_user_requested",
            Self::DismissError => "dismiss_error",
            Self::LocationPermissionResolved { .. } => "location_permission_resolved",
            Self::PositionResolved { .. } => "position_resolved",
            Self::DatePickerResolved(_) => "date_picker_resolved",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Noop
                | Self::AppStarted
                | Self::SeedProvided(_)
                | Self::LocationPermissionResolved { .. }
                | Self::PositionResolved { .. }
                | Self::DatePickerResolved(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 64,
            "Event enum is {size} bytes, box the larger variants"
        );
    }

    #[test]
    fn shell_events_deserialize_from_tags() {
        let event: Event =
            serde_json::from_str(r#"{"MapFilterToggled":{"layer":"nature"}}"#).unwrap();
        assert_eq!(
            event,
            Event::MapFilterToggled {
                layer: MapLayer::Nature
            }
        );
    }

    #[test]
    fn capability_responses_are_not_user_initiated() {
        assert!(!Event::DatePickerResolved(PickerOutput::Cancelled).is_user_initiated());
        assert!(Event::LocateUserRequested.is_user_initiated());
        assert_eq!(Event::CalendarToggled.name(), "calendar_toggled");
    }
}
