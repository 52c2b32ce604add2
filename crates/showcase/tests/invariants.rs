//! Run-level invariants: exclusivity, restoration, progress, preemption.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use proptest::prelude::*;
use showcase::testing::MockElement;
use showcase::{
    Phase, Rect, ShowcaseStep, StartOutcome, StepAction, StyleProperty, StyleSnapshot, TourEvent,
};

const RAISED: &str = "9999";

#[test]
fn at_most_one_element_is_highlighted() {
    let (locator, styler, mut seq) = setup();
    let keys = ["a", "b", "c", "d"];
    for (i, key) in keys.iter().enumerate() {
        locator.insert(*key, Rect::new(40.0, 60.0 * i as f64 + 40.0, 200.0, 40.0));
    }
    seq.start(keys.iter().map(|k| step(k, 700)).collect(), false);

    let mut peak = 0;
    let mut preempted = false;
    for _ in 0..300 {
        seq.tick(FRAME);
        peak = peak.max(styler.count_with(StyleProperty::ZIndex, RAISED));
        if !preempted && seq.phase() == Phase::Running(2) {
            // Preempt mid-run with the same targets.
            seq.start(keys.iter().rev().map(|k| step(k, 400)).collect(), true);
            assert_eq!(styler.count_with(StyleProperty::ZIndex, RAISED), 0);
            preempted = true;
        }
    }
    assert!(preempted);
    assert_eq!(peak, 1);
    run_to_idle(&mut seq);
    assert_eq!(styler.count_with(StyleProperty::ZIndex, RAISED), 0);
}

#[test]
fn every_clear_restores_prior_styles() {
    let (locator, styler, mut seq) = setup();
    let plain = locator.insert("plain", Rect::new(40.0, 40.0, 100.0, 40.0));
    let styled = locator.insert("styled", Rect::new(40.0, 140.0, 100.0, 40.0));
    styler.set(&styled, StyleProperty::Position, "sticky");
    styler.set(&styled, StyleProperty::ZIndex, "3");
    styler.set(&styled, StyleProperty::BoxShadow, "none");

    let snapshot = |el: &MockElement| StyleSnapshot::capture(&styler, el);
    let before_plain = snapshot(&plain);
    let before_styled = snapshot(&styled);

    seq.start(vec![step("plain", 1000), step("styled", 1000)], false);
    seq.tick(ms(300));
    assert_ne!(snapshot(&plain), before_plain);

    seq.tick(ms(700));
    assert_eq!(snapshot(&plain), before_plain);

    seq.tick(ms(300));
    assert_eq!(
        styler.get(&styled, StyleProperty::Position).as_deref(),
        Some("sticky")
    );
    assert_eq!(
        styler.get(&styled, StyleProperty::ZIndex).as_deref(),
        Some(RAISED)
    );

    run_to_idle(&mut seq);
    assert_eq!(snapshot(&plain), before_plain);
    assert_eq!(snapshot(&styled), before_styled);
}

#[test]
fn unhighlighted_step_never_touches_styles() {
    let (locator, styler, mut seq) = setup();
    locator.insert("a", Rect::new(40.0, 40.0, 100.0, 40.0));
    seq.start(vec![step("a", 1000).with_highlight(false)], false);
    run_to_idle(&mut seq);
    assert!(styler.writes().is_empty());
    assert!(
        seq.drain_events()
            .iter()
            .any(|e| matches!(e, TourEvent::StepShown { index: 0, .. }))
    );
}

#[test]
fn skipped_step_never_shows_bubble_or_cursor() {
    let (locator, _styler, mut seq) = setup();
    locator.insert("a", Rect::new(40.0, 40.0, 100.0, 40.0));
    locator.insert("c", Rect::new(40.0, 140.0, 100.0, 40.0));

    let shown_for_missing = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&shown_for_missing);
    let _sub = seq.bubble_state().subscribe(move |b| {
        if b.visible && b.index == 1 {
            *flag.borrow_mut() = true;
        }
    });

    seq.start(
        vec![
            step("a", 500),
            step("missing", 5000).with_cursor(true),
            step("c", 500),
        ],
        false,
    );
    seq.tick(ms(500));
    // Step 1 was entered and skipped inside the same tick.
    assert_eq!(seq.phase(), Phase::Running(2));
    assert!(!seq.cursor_state().get().active);

    let total = run_to_idle(&mut seq) + ms(500);
    assert_eq!(total, ms(500 + 500 + 500));
    assert!(!*shown_for_missing.borrow());
}

#[test]
fn target_that_appears_later_is_still_skipped_this_run() {
    let (locator, _styler, mut seq) = setup();
    seq.start(vec![step("late", 1000)], false);
    locator.insert("late", Rect::new(40.0, 40.0, 100.0, 40.0));
    run_to_idle(&mut seq);
    let events = seq.drain_events();
    assert!(events.iter().any(|e| matches!(e, TourEvent::StepSkipped { .. })));
    assert!(!events.iter().any(|e| matches!(e, TourEvent::StepShown { .. })));
    assert_eq!(locator.lookups().len(), 1);
}

#[test]
fn forced_start_cancels_every_old_timer() {
    let (locator, _styler, mut seq) = setup();
    let old = locator.insert("old", Rect::new(40.0, 40.0, 100.0, 40.0));
    let new = locator.insert("new", Rect::new(40.0, 140.0, 100.0, 40.0));
    seq.start(
        vec![
            step("old", 1000),
            step("old", 4000).with_action(StepAction::Click),
        ],
        false,
    );
    // Step 1 entered at 1000, pulse at 1300, activation due at 1600.
    seq.tick(ms(1400));
    assert_eq!(seq.index(), Some(1));
    assert!(seq.cursor_state().get().clicking);

    assert_eq!(seq.start(vec![step("new", 1000)], true), StartOutcome::Preempted);
    assert_eq!(seq.index(), Some(0));
    assert!(!seq.cursor_state().get().clicking);
    assert!(!seq.bubble_state().get().visible);
    seq.drain_events();

    run_to_idle(&mut seq);
    assert_eq!(old.activations(), 0);
    assert_eq!(new.activations(), 0);
    let events = seq.drain_events();
    assert_eq!(entered(&events), vec![0]);
    assert!(!events.iter().any(|e| matches!(e, TourEvent::Activated { .. })));
}

#[test]
fn consecutive_natural_runs_are_identical() {
    let (locator, styler, mut seq) = setup();
    locator.insert("a", Rect::new(40.0, 40.0, 100.0, 40.0));
    locator.insert("b", Rect::new(700.0, 300.0, 100.0, 40.0));
    let steps = vec![
        step("a", 1200).with_cursor(true).with_action(StepAction::Click),
        step("gone", 1000),
        step("b", 900).with_cursor(true),
    ];

    let normalize = |events: Vec<TourEvent>| -> Vec<TourEvent> {
        events
            .into_iter()
            .map(|e| match e {
                TourEvent::Started { steps, .. } => TourEvent::Started { run: 0, steps },
                TourEvent::Finished { .. } => TourEvent::Finished { run: 0 },
                other => other,
            })
            .collect()
    };

    assert_eq!(seq.start(steps.clone(), false), StartOutcome::Started);
    let first_time = run_to_idle(&mut seq);
    let first_events = normalize(seq.drain_events());
    let first_writes = styler.writes().len();

    assert_eq!(seq.start(steps, false), StartOutcome::Started);
    let second_time = run_to_idle(&mut seq);
    let second_events = normalize(seq.drain_events());

    assert_eq!(first_time, second_time);
    assert_eq!(first_events, second_events);
    assert_eq!(styler.writes().len(), first_writes * 2);
    assert!(!seq.cursor_state().get().active);
    assert!(!seq.bubble_state().get().visible);
}

#[derive(Debug, Clone)]
struct StepSpec {
    present: bool,
    duration: u64,
    cursor: bool,
    click: bool,
}

fn arb_step() -> impl Strategy<Value = StepSpec> {
    (any::<bool>(), 1u64..600, any::<bool>(), any::<bool>()).prop_map(
        |(present, d, cursor, click)| StepSpec {
            present,
            duration: d * 5,
            cursor,
            click,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_runs_progress_monotonically(specs in prop::collection::vec(arb_step(), 1..8)) {
        let (locator, styler, mut seq) = setup();
        let steps: Vec<ShowcaseStep> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let key = format!("t{i}");
                if spec.present {
                    locator.insert(key.as_str(), Rect::new(40.0 * i as f64, 60.0, 120.0, 40.0));
                }
                let mut s = step(&key, spec.duration).with_cursor(spec.cursor);
                if spec.click {
                    s = s.with_action(StepAction::Click);
                }
                s
            })
            .collect();

        seq.start(steps, false);
        let mut last_index = 0;
        while seq.is_running() {
            seq.tick(FRAME);
            prop_assert!(styler.count_with(StyleProperty::ZIndex, RAISED) <= 1);
            if let Some(index) = seq.index() {
                prop_assert!(index >= last_index);
                last_index = index;
            }
        }

        let expected: u64 = specs.iter().filter(|s| s.present).map(|s| s.duration).sum::<u64>() + 500;
        prop_assert_eq!(seq.elapsed(), ms(expected));

        let events = seq.drain_events();
        prop_assert_eq!(entered(&events), (0..specs.len()).collect::<Vec<_>>());
        prop_assert_eq!(styler.count_with(StyleProperty::ZIndex, RAISED), 0);
    }
}
