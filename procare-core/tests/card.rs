use procare_core::{
    CardError, CardStatus, CardView, DisplayLocale, DisplayZone, EntityState, HostSnapshot,
    HostState, TimelineCard, CARD_SIZE, DEFAULT_ICON, EMPTY_MESSAGE,
};
use serde_json::{json, Value};

const ENTITY: &str = "sensor.ava_latest_activity";

fn entity_with(activities: Value) -> EntityState {
    let attributes = json!({ "friendly_name": "Ava", "activities": activities });
    EntityState {
        entity_id: Some(ENTITY.to_string()),
        state: json!("Nap"),
        attributes: attributes.as_object().cloned().unwrap_or_default(),
    }
}

fn host_with(activities: Value) -> HostState {
    let mut host = HostState::new();
    host.insert(ENTITY, entity_with(activities));
    host
}

fn numbered_activities(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|index| {
                json!({
                    "title": format!("Note {index}"),
                    "timestamp": "2024-03-05T14:30:00",
                })
            })
            .collect(),
    )
}

fn configured(limit: u64) -> TimelineCard {
    TimelineCard::from_config(&json!({ "entity": ENTITY, "number_of_events": limit }))
        .expect("cấu hình hợp lệ")
}

#[test]
fn missing_entity_fails_configuration() {
    assert_eq!(
        TimelineCard::from_config(&json!({ "header": "Kid" })).err(),
        Some(CardError::MissingEntity)
    );

    let mut card = TimelineCard::new();
    assert!(card.configure(&json!({ "entity": "" })).is_err());
    assert_eq!(card.status(), CardStatus::Unconfigured);
    assert!(card.config().is_none());
}

#[test]
fn failed_reconfiguration_keeps_previous_config() {
    let mut card = configured(3);
    assert!(card.configure(&json!({})).is_err());
    assert_eq!(card.config().map(|config| config.entity.as_str()), Some(ENTITY));
}

#[test]
fn update_before_configuration_is_a_no_op() {
    let mut card = TimelineCard::new();
    assert!(card.update(&host_with(numbered_activities(2))).is_none());
    assert!(card.view().is_none());
}

#[test]
fn truncates_to_limit_keeping_input_order() {
    let mut card = configured(3);
    let view = card
        .update(&host_with(numbered_activities(7)))
        .expect("đã cấu hình");

    let titles: Vec<&str> = view.items().iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["Note 0", "Note 1", "Note 2"]);
}

#[test]
fn never_renders_more_than_ten() {
    let mut card = configured(50);
    let view = card.update(&host_with(numbered_activities(15))).unwrap();
    assert_eq!(view.items().len(), 10);
}

#[test]
fn empty_list_renders_placeholder() {
    let mut card = configured(5);
    let view = card.update(&host_with(json!([]))).unwrap().clone();

    assert!(matches!(view, CardView::Empty { .. }));
    assert!(view.items().is_empty());

    let html = card.html().unwrap();
    assert!(html.contains(EMPTY_MESSAGE));
    assert!(!html.contains("class=\"timeline\""));
}

#[test]
fn missing_activities_attribute_is_empty() {
    let mut host = HostState::new();
    host.insert(ENTITY, EntityState::default());

    let mut card = configured(5);
    assert!(matches!(card.update(&host), Some(CardView::Empty { .. })));
}

#[test]
fn malformed_records_are_defaulted() {
    let mut card = configured(5);
    let view = card
        .update(&host_with(json!([{ "timestamp": "nope" }, "garbage"])))
        .unwrap();

    let items = view.items();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item.title, "Activity");
        assert_eq!(item.description, "");
        assert_eq!(item.time, "Invalid Date");
        assert_eq!(item.icon, DEFAULT_ICON);
        assert!(item.staff_line().is_none());
        assert!(item.photo_url.is_none());
    }
}

#[test]
fn entity_disappears_and_recovers() {
    let mut card = configured(5);
    let present = host_with(numbered_activities(2));
    let absent = HostState::new();

    card.update(&present);
    assert_eq!(card.status(), CardStatus::EntityPresent);

    let view = card.update(&absent).unwrap().clone();
    assert_eq!(
        view,
        CardView::Error {
            message: format!("Entity not found: {ENTITY}")
        }
    );
    assert_eq!(card.status(), CardStatus::EntityMissing);
    assert!(card.html().unwrap().contains("Timeline Card Error"));

    card.update(&present);
    assert_eq!(card.status(), CardStatus::EntityPresent);
    let html = card.html().unwrap();
    assert!(!html.contains("Entity not found"));
    assert!(!html.contains("class=\"error\""));
    assert!(!html.contains("Timeline Card Error"));
    assert_eq!(html.matches("class=\"timeline-item\"").count(), 2);
}

#[test]
fn repeated_updates_are_identical() {
    let mut card = configured(4);
    let host = host_with(numbered_activities(6));

    card.update(&host);
    let first = card.html();
    card.update(&host);
    card.update(&host);
    assert_eq!(card.html(), first);
}

#[test]
fn long_format_and_locale() {
    let mut card = TimelineCard::from_config(&json!({
        "entity": ENTITY,
        "date_format": "long"
    }))
    .unwrap();
    let host = host_with(json!([{ "title": "Nap", "timestamp": "2024-03-05T14:30:00" }]));

    let view = card.update(&host).unwrap();
    assert_eq!(view.items()[0].time, "Tuesday, March 5 at 02:30 PM");

    card.set_locale(DisplayLocale::DeDe);
    let view = card.update(&host).unwrap();
    assert_eq!(view.items()[0].time, "Dienstag, 5. März um 14:30");
}

#[test]
fn month_dd_yy_format() {
    let mut card = configured(1);
    let host = host_with(json!([{ "title": "Meal note", "timestamp": "2024-03-05T14:30:00" }]));

    let item = &card.update(&host).unwrap().items()[0];
    assert_eq!(item.time, "March 05, 24 at 02:30 PM");
    assert_eq!(item.icon, "mdi:silverware-fork-knife");
}

#[test]
fn times_follow_the_viewer_zone() {
    let snapshot = HostSnapshot::from_value(json!({
        "states": {
            "sensor.ava_latest_activity": {
                "state": "Nap",
                "attributes": {
                    "activities": [
                        { "title": "Nap", "timestamp": "2024-03-05T19:30:00Z" },
                        { "title": "Meal", "timestamp": 1_709_667_000_000_i64 },
                        { "title": "Note", "timestamp": "2024-03-05T14:30:00" }
                    ]
                }
            }
        },
        "locale": { "language": "en", "time_zone": "server" },
        "config": { "time_zone": "America/New_York" }
    }))
    .unwrap();

    let mut card = configured(3).with_zone(snapshot.display_zone(None));
    let times: Vec<_> = card
        .update(&snapshot.states)
        .unwrap()
        .items()
        .iter()
        .map(|item| item.time.clone())
        .collect();
    assert_eq!(times, vec!["March 05, 24 at 02:30 PM"; 3]);

    card.set_zone(DisplayZone::Recorded);
    let view = card.update(&snapshot.states).unwrap();
    assert_eq!(view.items()[0].time, "March 05, 24 at 07:30 PM");
    assert_eq!(view.items()[2].time, "March 05, 24 at 02:30 PM");
}

#[test]
fn legacy_and_current_keys_together_are_accepted() {
    let raw = json!({
        "entity": ENTITY,
        "header": "Kid",
        "title": "Old",
        "number_of_events": 3,
        "max_events": 5
    });

    let card = TimelineCard::from_config(&raw).expect("cấu hình hợp lệ");
    let config = card.config().unwrap();
    assert_eq!(config.header, "Kid");
    assert_eq!(config.number_of_events, 3);

    let mut editor = procare_core::CardEditor::new();
    editor.configure(&raw);
    let edited = editor.config().unwrap();
    assert_eq!(edited["header"], json!(config.header));
    assert_eq!(edited["number_of_events"], json!(config.number_of_events));
}

#[test]
fn sizing_hint_and_stub() {
    let card = TimelineCard::new();
    assert_eq!(card.card_size(), CARD_SIZE);
    assert_eq!(CARD_SIZE, 3);
    assert_eq!(TimelineCard::stub_config(), json!({}));
}
