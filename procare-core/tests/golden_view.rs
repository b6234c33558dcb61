use std::fs;

use procare_core::{markup, HostSnapshot, TimelineCard};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn load_card() -> (TimelineCard, HostSnapshot) {
    let config: Value = serde_json::from_str(
        &fs::read_to_string(fixture_path("card_config.json")).expect("Không đọc được cấu hình mẫu"),
    )
    .expect("Cấu hình mẫu không hợp lệ");
    let snapshot = HostSnapshot::from_json_str(
        &fs::read_to_string(fixture_path("host_state.json")).expect("Không đọc được trạng thái mẫu"),
    )
    .expect("Trạng thái mẫu không hợp lệ");

    let card = TimelineCard::from_config(&config)
        .expect("Không tạo được card")
        .with_locale(snapshot.display_locale());
    (card, snapshot)
}

#[test]
fn timeline_view_matches_golden() {
    let (mut card, snapshot) = load_card();
    let view = card.update(&snapshot.states).expect("Card chưa được cấu hình");

    let actual = serde_json::to_value(view).expect("Không serialize view");
    let expected: Value = serde_json::from_str(
        &fs::read_to_string(fixture_path("timeline_view.json")).expect("Không đọc được golden view"),
    )
    .expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
}

#[test]
fn timeline_markup_is_escaped_and_complete() {
    let (mut card, snapshot) = load_card();
    card.update(&snapshot.states);
    let html = card.html().expect("Chưa có HTML");

    assert!(html.contains("<ha-card header=\"Ava's Day\"><div id=\"timeline-container\"><div class=\"timeline\">"));
    assert!(html.contains("<div class=\"title\">Learning &lt;Circle&gt;</div>"));
    assert!(html.contains("<div class=\"description\">Shapes &amp; colors</div>"));
    assert!(html.contains("<div class=\"staff\">by Ms. Rivera</div>"));
    assert!(html.contains("<img src=\"https://photos.example.com/nap.jpg\" alt=\"Activity photo\">"));
    assert!(html.contains("<ha-icon icon=\"mdi:silverware-fork-knife\"></ha-icon>"));
    assert_eq!(html.matches("class=\"timeline-item\"").count(), 4);
    assert!(!html.contains("Signed In"));
}

#[test]
fn markup_tree_exposes_items() {
    let (mut card, snapshot) = load_card();
    let view = card.update(&snapshot.states).cloned().expect("Chưa có view");

    let mut items = Vec::new();
    for node in markup::card_tree(&view) {
        let mut found = Vec::new();
        node.find_by_class("timeline-item", &mut found);
        items.extend(found.into_iter().cloned());
    }
    assert_eq!(items.len(), 4);
}
