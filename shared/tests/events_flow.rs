use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};
use crux_core::testing::AppTester;
use shared::capabilities::{PickerMode, PickerOperation, PickerOutput};
use shared::view::{EventsView, Screen};
use shared::{App, CategoryFilter, Effect, Event, ItemId, Model, Tab};

fn on_events() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::AppStarted, &mut model);
    app.update(Event::OnboardingCompleted, &mut model);
    app.update(Event::TabSelected { tab: Tab::Events }, &mut model);
    (app, model)
}

fn events_view(app: &AppTester<App, Effect>, model: &Model) -> EventsView {
    match app.view(model).screen {
        Screen::Events(view) => view,
        other => panic!("expected events screen, got {other:?}"),
    }
}

fn titles(view: &EventsView) -> Vec<&str> {
    view.events.iter().map(|e| e.title.as_str()).collect()
}

#[test]
fn test_category_filter_narrows_events() {
    let (app, mut model) = on_events();

    let view = events_view(&app, &model);
    assert_eq!(titles(&view), ["Cultural Festival 2025", "Beach Concert Series"]);
    assert!(view.categories[0].selected);

    app.update(Event::EventCategorySelected { tag: "Cultural".into() }, &mut model);
    let view = events_view(&app, &model);
    assert_eq!(titles(&view), ["Cultural Festival 2025"]);
    assert!(view.categories.iter().any(|c| c.label == "Cultural" && c.selected));

    app.update(Event::EventCategorySelected { tag: "Sports".into() }, &mut model);
    assert!(events_view(&app, &model).events.is_empty());

    app.update(Event::EventCategorySelected { tag: "All".into() }, &mut model);
    assert_eq!(events_view(&app, &model).events.len(), 2);
}

#[test]
fn test_unknown_category_keeps_previous_filter() {
    let (app, mut model) = on_events();

    app.update(Event::EventCategorySelected { tag: "Music".into() }, &mut model);
    app.update(Event::EventCategorySelected { tag: "music".into() }, &mut model);

    assert_eq!(
        model.catalog.active_event_category(),
        &CategoryFilter::Tag("Music".into())
    );
    let view = app.view(&model);
    let error = view.error.expect("rejection is shown");
    assert_eq!(error.error_code, "INVALID_CATEGORY");
    assert_matches!(view.screen, Screen::Events(ref events) if events.events.len() == 1);
}

#[test]
fn test_event_details_modal() {
    let (app, mut model) = on_events();

    app.update(Event::EventTapped { id: ItemId::new("2") }, &mut model);
    let view = events_view(&app, &model);
    let details = view.selected_event.expect("details open");
    assert_eq!(details.location.as_deref(), Some("Beach Arena"));
    assert_eq!(details.time.as_deref(), Some("7:00 PM"));

    app.update(Event::EventDetailsDismissed, &mut model);
    assert!(events_view(&app, &model).selected_event.is_none());

    app.update(Event::EventTapped { id: ItemId::new("nope") }, &mut model);
    assert!(model.selected_event.is_none());
}

#[test]
fn test_calendar_marks_event_dates() {
    let (app, mut model) = on_events();

    app.update(Event::CalendarToggled, &mut model);
    let view = events_view(&app, &model);
    assert!(view.calendar_open);
    assert_eq!(
        view.marked_dates,
        [
            NaiveDate::from_ymd_opt(2025, 1, 27).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 28).unwrap(),
        ]
    );

    app.update(Event::TabSelected { tab: Tab::Home }, &mut model);
    assert!(!model.calendar_open);
}

#[test]
fn test_date_picker_round_trip() {
    let (app, mut model) = on_events();

    let update = app.update(Event::DatePickerRequested { mode: PickerMode::Date }, &mut model);
    assert_eq!(model.picker, Some(PickerMode::Date));
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Picker(request) => Some(request),
            _ => None,
        })
        .expect("picker effect");
    assert_eq!(request.operation, PickerOperation::Show { mode: PickerMode::Date });

    let at = NaiveDateTime::parse_from_str("2025-01-28 19:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    let update = app
        .resolve(&mut request, PickerOutput::Confirmed(at))
        .expect("resolve picker");
    for event in update.events {
        app.update(event, &mut model);
    }

    let view = events_view(&app, &model);
    assert_eq!(view.picker, None);
    assert_eq!(view.picked_at, Some(at));
}

#[test]
fn test_cancelled_picker_keeps_previous_choice() {
    let (app, mut model) = on_events();

    app.update(Event::DatePickerResolved(PickerOutput::Cancelled), &mut model);
    assert!(model.picked_at.is_none());
    assert!(model.picker.is_none());
}
