//! Signup to first tour: catalog, persisted flags, and the pending check.

mod common;

use common::*;
use showcase::{
    FileStorage, MemoryStorage, PendingTours, Rect, Signal, TourDefinition, TourEvent, TourFlags,
};

const CATALOG: &str = r#"
[[tours]]
id = "welcome"
route = "/dashboard"

[[tours.steps]]
target = "nav-members"
title = "Members"
description = "Everyone in your church lives here."
duration_ms = 1000

[[tours.steps]]
target = "nav-events"
title = "Events"
durationMs = 1500
showCursor = true
action = "click"

[[tours]]
id = "giving"
route = "/finance"

[[tours.steps]]
target = "nav-finance"
title = "Giving"
"#;

fn catalog() -> PendingTours {
    let mut tours = PendingTours::new();
    for tour in TourDefinition::catalog_from_toml_str(CATALOG).expect("catalog parses") {
        tours.register(tour).expect("unique ids");
    }
    tours
}

#[test]
fn pending_tour_waits_for_route_then_runs_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flags.json");
    let (locator, _styler, mut seq) = setup();
    locator.insert("nav-members", Rect::new(20.0, 100.0, 180.0, 36.0));
    let events_tab = locator.insert("nav-events", Rect::new(20.0, 140.0, 180.0, 36.0));

    let mut tours = catalog();
    assert_eq!(tours.len(), 2);
    let check: Signal<()> = Signal::new("check-pending-tour");
    let _watch = tours.watch(&check);

    let mut flags = TourFlags::new(FileStorage::new(&path));
    flags.set_pending("u1", "welcome").expect("write flag");
    assert_eq!(check.dispatch(&()), 1);

    // Wrong page: nothing starts, the request stays latched.
    let started = tours.pump("/settings", "u1", &mut flags, &mut seq).expect("flags");
    assert_eq!(started, None);
    assert!(tours.is_requested());
    assert!(!seq.is_running());

    let started = tours
        .pump("/dashboard/home", "u1", &mut flags, &mut seq)
        .expect("flags");
    assert_eq!(started.as_deref(), Some("welcome"));
    assert!(!tours.is_requested());
    assert!(seq.is_running());

    let elapsed = run_to_idle(&mut seq);
    assert_eq!(elapsed, ms(1000 + 1500 + 500));
    assert_eq!(events_tab.activations(), 1);
    assert!(
        seq.drain_events()
            .iter()
            .any(|e| matches!(e, TourEvent::Finished { .. }))
    );

    // A fresh process sees the persisted flags and does not replay.
    let mut reloaded = TourFlags::new(FileStorage::new(&path));
    assert!(reloaded.has_seen("u1", "welcome").expect("read"));
    assert!(!reloaded.is_pending("u1", "welcome").expect("read"));
    let again = tours
        .check_now("/dashboard", "u1", &mut reloaded, &mut seq)
        .expect("flags");
    assert_eq!(again, None);
    assert!(!seq.is_running());
}

#[test]
fn check_while_running_leaves_flags_untouched() {
    let (locator, _styler, mut seq) = setup();
    locator.insert("other", Rect::new(20.0, 100.0, 180.0, 36.0));
    seq.start(vec![step("other", 1000)], false);

    let mut tours = catalog();
    let mut flags = TourFlags::new(MemoryStorage::new());
    flags.set_pending("u2", "giving").expect("write flag");
    tours.request();

    let started = tours.pump("/finance", "u2", &mut flags, &mut seq).expect("flags");
    assert_eq!(started, None);
    assert!(flags.is_pending("u2", "giving").expect("read"));
    assert!(!flags.has_seen("u2", "giving").expect("read"));

    run_to_idle(&mut seq);
    let started = tours.pump("/finance", "u2", &mut flags, &mut seq).expect("flags");
    assert_eq!(started.as_deref(), Some("giving"));
}
