use tracing::{debug, error, info, warn};

use crate::capabilities::{
    Capabilities, LocationError, LocationOutput, LocationResult, PermissionStatus, PickerOutput,
    Route,
};
use crate::catalog::CatalogStateStore;
use crate::event::Event;
use crate::model::{LocationRequestId, Model, PermissionState, Tab};
use crate::seed::{CatalogSeed, SeedError};
use crate::view::ViewModel;
use crate::{AppError, ErrorKind, ValidatedCoordinate};

#[derive(Default)]
pub struct App;

impl App {
    fn install_seed(model: &mut Model, seed: Result<CatalogSeed, SeedError>) {
        match seed.and_then(CatalogStateStore::from_seed) {
            Ok(catalog) => {
                model.catalog = catalog;
                model.clear_error();
            }
            Err(e) => {
                error!(error = %e, "catalog seed rejected");
                model.set_error(e.into());
            }
        }
    }

    fn push(caps: &Capabilities, route: Route) {
        debug!(path = %route.path(), "navigating");
        caps.navigate.push(route);
    }

    fn leave_map(model: &mut Model) {
        if let Some(request) = model.cancel_location_request() {
            debug!(request = request.0, "dropping location request on tab change");
        }
        if model.location_permission == PermissionState::Requesting {
            model.location_permission = PermissionState::Unknown;
        }
        model.filter_panel_open = false;
    }

    fn request_position(caps: &Capabilities, request: LocationRequestId) {
        caps.location.current_position(move |result| Event::PositionResolved {
            request,
            result: Box::new(result),
        });
    }

    fn location_failed(model: &mut Model, err: &LocationError) {
        model.catalog.set_user_position(None);
        match err {
            LocationError::PermissionDenied => {
                model.location_permission = PermissionState::Denied;
                warn!("location permission denied");
                model.set_error(AppError::new(
                    ErrorKind::LocationPermissionDenied,
                    "Location permission denied",
                ));
            }
            LocationError::Unavailable { .. } | LocationError::Timeout => {
                if model.location_permission == PermissionState::Requesting {
                    model.location_permission = PermissionState::Unknown;
                }
                warn!(error = %err, "location unavailable");
                model.set_error(
                    AppError::new(ErrorKind::Location, "Location unavailable")
                        .with_internal(err.to_string()),
                );
            }
        }
    }

    fn on_permission(
        model: &mut Model,
        caps: &Capabilities,
        request: LocationRequestId,
        result: LocationResult,
    ) {
        match result {
            Ok(LocationOutput::Permission(PermissionStatus::Granted)) => {
                model.location_permission = PermissionState::Granted;
                info!("location permission granted");
                Self::request_position(caps, request);
            }
            Ok(LocationOutput::Permission(PermissionStatus::Denied)) => {
                model.cancel_location_request();
                Self::location_failed(model, &LocationError::PermissionDenied);
            }
            Ok(LocationOutput::Position { .. }) => {
                model.cancel_location_request();
                model.catalog.set_user_position(None);
                warn!("shell answered a permission request with a position");
                model.set_error(AppError::new(
                    ErrorKind::Internal,
                    "Unexpected location response",
                ));
            }
            Err(e) => {
                model.cancel_location_request();
                Self::location_failed(model, &e);
            }
        }
    }

    fn on_position(model: &mut Model, result: LocationResult) {
        model.cancel_location_request();
        match result {
            Ok(LocationOutput::Position {
                latitude,
                longitude,
            }) => match ValidatedCoordinate::new(latitude, longitude) {
                Ok(position) => {
                    debug!(lat = position.lat(), lon = position.lon(), "user located");
                    model.catalog.set_user_position(Some(position));
                }
                Err(e) => {
                    warn!(error = %e, latitude, longitude, "shell reported invalid position");
                    model.catalog.set_user_position(None);
                    model.set_error(AppError::from(e).with_context("source", "location"));
                }
            },
            Ok(LocationOutput::Permission(_)) => {
                model.catalog.set_user_position(None);
                warn!("shell answered a position request with a permission status");
                model.set_error(AppError::new(
                    ErrorKind::Internal,
                    "Unexpected location response",
                ));
            }
            Err(e) => Self::location_failed(model, &e),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let span = tracing::debug_span!("update", event = event.name());
        let _guard = span.enter();

        if event.is_user_initiated() {
            debug!("user action");
        }

        match event {
            Event::Noop => return,

            Event::AppStarted => {
                Self::install_seed(model, CatalogSeed::bundled());
                info!(
                    destinations = model.catalog.destinations().len(),
                    events = model.catalog.events().len(),
                    "app started"
                );
            }

            Event::SeedProvided(seed) => {
                Self::install_seed(model, Ok(*seed));
            }

            Event::OnboardingCompleted => {
                model.onboarded = true;
                model.active_tab = Tab::Home;
                Self::push(caps, Route::Tabs { tab: Tab::Home });
            }

            Event::TabSelected { tab } => {
                if model.active_tab == Tab::Map && tab != Tab::Map {
                    Self::leave_map(model);
                }
                if model.active_tab == Tab::Events && tab != Tab::Events {
                    model.selected_event = None;
                    model.calendar_open = false;
                }
                model.active_tab = tab;
            }

            // --- Home ---
            Event::FavoriteToggled { id } => {
                model.catalog.toggle_favorite(&id);
            }

            Event::DestinationTapped { id } => {
                if model.catalog.find_destination(&id).is_some() {
                    Self::push(caps, Route::Destination { id });
                } else {
                    warn!(%id, "tapped unknown destination");
                    return;
                }
            }

            Event::CategoryTapped { id } => match model.catalog.find_category(&id) {
                Some(category) => {
                    let route = Route::category(&category.display_name);
                    Self::push(caps, route);
                }
                None => {
                    warn!(%id, "tapped unknown category");
                    return;
                }
            },

            Event::SeeAllDestinationsRequested => Self::push(caps, Route::AllDestinations),
            Event::SearchRequested => Self::push(caps, Route::Search),
            Event::ProfileRequested => Self::push(caps, Route::Profile),

            // --- Events ---
            Event::EventCategorySelected { tag } => {
                if let Err(e) = model.catalog.set_event_category(&tag) {
                    warn!(error = %e, "rejected event category");
                    model.set_error(e.into());
                }
            }

            Event::EventTapped { id } => {
                if model.catalog.find_event(&id).is_some() {
                    model.selected_event = Some(id);
                } else {
                    warn!(%id, "tapped unknown event");
                    return;
                }
            }

            Event::EventDetailsDismissed => {
                model.selected_event = None;
            }

            Event::CalendarToggled => {
                model.calendar_open = !model.calendar_open;
            }

            Event::DatePickerRequested { mode } => {
                model.picker = Some(mode);
                caps.picker.show(mode, Event::DatePickerResolved);
            }

            Event::DatePickerResolved(output) => {
                model.picker = None;
                match output {
                    PickerOutput::Confirmed(at) => {
                        debug!(%at, "picker confirmed");
                        model.picked_at = Some(at);
                    }
                    PickerOutput::Cancelled => debug!("picker cancelled"),
                }
            }

            // --- Map ---
            Event::MapFilterToggled { layer } => {
                model.catalog.toggle_map_filter(layer);
            }

            Event::MapFiltersCleared => {
                model.catalog.clear_map_filters();
            }

            Event::FilterPanelToggled => {
                model.filter_panel_open = !model.filter_panel_open;
            }

            Event::LocateUserRequested => {
                let request = model.begin_location_request();
                if model.location_permission.is_granted() {
                    Self::request_position(caps, request);
                } else {
                    model.location_permission = PermissionState::Requesting;
                    caps.location.request_permission(move |result| {
                        Event::LocationPermissionResolved {
                            request,
                            result: Box::new(result),
                        }
                    });
                }
            }

            Event::LocationPermissionResolved { request, result } => {
                if !model.is_current_location_request(request) {
                    debug!(request = request.0, "dropping stale permission result");
                    return;
                }
                Self::on_permission(model, caps, request, *result);
            }

            Event::PositionResolved { request, result } => {
                if !model.is_current_location_request(request) {
                    debug!(request = request.0, "dropping stale position result");
                    return;
                }
                Self::on_position(model, *result);
            }

            Event::DismissError => {
                model.clear_error();
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
