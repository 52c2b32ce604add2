#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use showcase::testing::{MockLocator, RecordingStyler};
use showcase::{Sequencer, ShowcaseStep, Size, TourEvent};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

pub const VIEWPORT: Size = Size::new(1280.0, 800.0);
pub const FRAME: Duration = Duration::from_millis(5);

pub type TestSequencer = Sequencer<MockLocator, RecordingStyler>;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn setup() -> (MockLocator, RecordingStyler, TestSequencer) {
    let locator = MockLocator::new(VIEWPORT);
    let styler = RecordingStyler::default();
    let seq = Sequencer::new(locator.clone(), styler.clone());
    (locator, styler, seq)
}

pub fn step(target: &str, duration_ms: u64) -> ShowcaseStep {
    ShowcaseStep::new(target, format!("{target} title"), format!("{target} body"))
        .with_duration(ms(duration_ms))
}

/// Tick in `FRAME` increments until the run ends; returns total elapsed.
pub fn run_to_idle(seq: &mut TestSequencer) -> Duration {
    let start = seq.elapsed();
    let mut guard = 0;
    while seq.is_running() {
        seq.tick(FRAME);
        guard += 1;
        assert!(guard < 1_000_000, "run never finished");
    }
    seq.elapsed() - start
}

/// Indices of `StepEntered` events, in order.
pub fn entered(events: &[TourEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            TourEvent::StepEntered { index } => Some(*index),
            _ => None,
        })
        .collect()
}

/// Counts warn-level events under one target.
struct WarnCounter {
    target: &'static str,
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::WARN && meta.target() == self.target {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` with a scoped subscriber; returns its result and the number of
/// warnings logged under `showcase.sequencer`.
pub fn count_sequencer_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter {
        target: "showcase.sequencer",
        count: Arc::clone(&count),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}
