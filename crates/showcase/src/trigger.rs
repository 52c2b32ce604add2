#![forbid(unsafe_code)]

//! Deciding when a pending tour starts.
//!
//! After signup the host marks a tour pending and dispatches the global
//! "check pending tour" [`Signal`]. [`PendingTours`] latches that request and,
//! on the next [`pump`](PendingTours::pump) where the host is on a matching
//! route and the sequencer is idle, starts the first eligible tour and
//! updates the user's flags.
//!
//! A request stays latched while some pending tour is only waiting for its
//! route, so navigating to the right page later still starts it.

use std::cell::Cell;
use std::rc::Rc;

use showcase_runtime::{Signal, Subscription};

use crate::definition::TourDefinition;
use crate::error::{DefinitionError, StorageError};
use crate::flags::{StorageBackend, TourFlags};
use crate::highlight::Styler;
use crate::locator::Locator;
use crate::sequencer::{Sequencer, StartOutcome};

/// Registered tours plus the latched "check requested" bit.
#[derive(Debug, Default)]
pub struct PendingTours {
    tours: Vec<TourDefinition>,
    requested: Rc<Cell<bool>>,
}

impl PendingTours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tour. Ids must be non-empty and unique.
    pub fn register(&mut self, definition: TourDefinition) -> Result<(), DefinitionError> {
        definition.validate()?;
        if self.get(&definition.id).is_some() {
            return Err(DefinitionError::DuplicateId(definition.id));
        }
        self.tours.push(definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TourDefinition> {
        self.tours.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Latch a check whenever `signal` is dispatched.
    ///
    /// The returned guard must be kept alive for as long as the watch should
    /// stay active.
    pub fn watch(&self, signal: &Signal<()>) -> Subscription {
        let requested = Rc::clone(&self.requested);
        signal.subscribe(move |_| requested.set(true))
    }

    /// Latch a check directly.
    pub fn request(&self) {
        self.requested.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Run a latched check, if any. Returns the id of the tour started.
    pub fn pump<L, S, B>(
        &mut self,
        route: &str,
        user: &str,
        flags: &mut TourFlags<B>,
        sequencer: &mut Sequencer<L, S>,
    ) -> Result<Option<String>, StorageError>
    where
        L: Locator,
        S: Styler<L::Handle>,
        B: StorageBackend,
    {
        if !self.requested.get() {
            return Ok(None);
        }
        self.check_now(route, user, flags, sequencer)
    }

    /// Run the check regardless of the latch (e.g. when the host mounts).
    pub fn check_now<L, S, B>(
        &mut self,
        route: &str,
        user: &str,
        flags: &mut TourFlags<B>,
        sequencer: &mut Sequencer<L, S>,
    ) -> Result<Option<String>, StorageError>
    where
        L: Locator,
        S: Styler<L::Handle>,
        B: StorageBackend,
    {
        if sequencer.is_running() {
            return Ok(None);
        }
        let mut waiting_for_route = false;
        for tour in &self.tours {
            if !flags.is_pending(user, &tour.id)? {
                continue;
            }
            if flags.has_seen(user, &tour.id)? {
                flags.clear_pending(user, &tour.id)?;
                tracing::debug!(target: "showcase.flags", user, tour = %tour.id, "stale pending marker dropped");
                continue;
            }
            if !tour.matches_route(route) {
                waiting_for_route = true;
                continue;
            }
            // Flags change only once the tour is actually on screen.
            match sequencer.start(tour.steps.clone(), false) {
                StartOutcome::Started | StartOutcome::Preempted => {
                    tracing::debug!(target: "showcase.flags", user, tour = %tour.id, route, "pending tour started");
                    self.requested.set(false);
                    flags.mark_seen(user, &tour.id)?;
                    flags.clear_pending(user, &tour.id)?;
                    return Ok(Some(tour.id.clone()));
                }
                outcome => {
                    tracing::debug!(target: "showcase.flags", user, tour = %tour.id, ?outcome, "pending tour had nothing to show");
                }
            }
        }
        if !waiting_for_route {
            self.requested.set(false);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::MemoryStorage;
    use crate::step::ShowcaseStep;
    use crate::testing::{MockLocator, RecordingStyler};
    use showcase_core::{Rect, Size};

    struct Host {
        locator: MockLocator,
        sequencer: Sequencer<MockLocator, RecordingStyler>,
        flags: TourFlags<MemoryStorage>,
        tours: PendingTours,
        signal: Signal<()>,
    }

    fn host() -> Host {
        let locator = MockLocator::new(Size::new(1280.0, 800.0));
        locator.insert("nav", Rect::new(10.0, 10.0, 100.0, 30.0));
        let mut tours = PendingTours::new();
        tours
            .register(
                TourDefinition::new("welcome", vec![ShowcaseStep::new("nav", "Nav", "")])
                    .with_route("/dashboard"),
            )
            .unwrap();
        Host {
            sequencer: Sequencer::new(locator.clone(), RecordingStyler::default()),
            locator,
            flags: TourFlags::new(MemoryStorage::new()),
            tours,
            signal: Signal::new("check-pending-tour"),
        }
    }

    #[test]
    fn signal_then_matching_route_starts_tour() {
        let mut h = host();
        let _watch = h.tours.watch(&h.signal);
        h.flags.set_pending("u1", "welcome").unwrap();

        // No request yet: nothing happens.
        assert_eq!(h.tours.pump("/dashboard", "u1", &mut h.flags, &mut h.sequencer).unwrap(), None);

        h.signal.dispatch(&());
        assert!(h.tours.is_requested());
        let started = h.tours.pump("/dashboard", "u1", &mut h.flags, &mut h.sequencer).unwrap();
        assert_eq!(started.as_deref(), Some("welcome"));
        assert!(h.sequencer.is_running());
        assert!(h.flags.has_seen("u1", "welcome").unwrap());
        assert!(!h.flags.is_pending("u1", "welcome").unwrap());
        assert!(!h.tours.is_requested());
        assert_eq!(h.locator.lookups().len(), 1);
    }

    #[test]
    fn request_waits_for_route() {
        let mut h = host();
        h.flags.set_pending("u1", "welcome").unwrap();
        h.tours.request();
        assert_eq!(h.tours.pump("/signup", "u1", &mut h.flags, &mut h.sequencer).unwrap(), None);
        assert!(h.tours.is_requested());
        assert_eq!(
            h.tours.pump("/dashboard/home", "u1", &mut h.flags, &mut h.sequencer).unwrap().as_deref(),
            Some("welcome")
        );
    }

    #[test]
    fn seen_tour_does_not_restart() {
        let mut h = host();
        h.flags.set_pending("u1", "welcome").unwrap();
        h.flags.mark_seen("u1", "welcome").unwrap();
        assert_eq!(h.tours.check_now("/dashboard", "u1", &mut h.flags, &mut h.sequencer).unwrap(), None);
        assert!(!h.sequencer.is_running());
        // The leftover marker is dropped instead of being rechecked forever.
        assert!(!h.flags.is_pending("u1", "welcome").unwrap());
    }

    #[test]
    fn stepless_tour_cannot_be_registered() {
        let mut h = host();
        let err = h.tours.register(TourDefinition::new("empty", Vec::new())).unwrap_err();
        assert!(matches!(err, DefinitionError::NoSteps(ref id) if id == "empty"));
        assert!(h.tours.get("empty").is_none());

        h.flags.set_pending("u1", "empty").unwrap();
        h.tours.request();
        assert_eq!(h.tours.pump("/dashboard", "u1", &mut h.flags, &mut h.sequencer).unwrap(), None);
        assert!(h.flags.is_pending("u1", "empty").unwrap());
        assert!(!h.flags.has_seen("u1", "empty").unwrap());
    }

    /// Memory storage that refuses to record "seen" markers.
    #[derive(Debug, Default)]
    struct SeenWritesFail(MemoryStorage);

    impl StorageBackend for SeenWritesFail {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key.starts_with("showcase:seen:") {
                return Err(StorageError::Corrupt("store is read-only".into()));
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_seen_write_keeps_pending_marker() {
        let mut h = host();
        let mut flags = TourFlags::new(SeenWritesFail::default());
        flags.set_pending("u1", "welcome").unwrap();

        let result = h.tours.check_now("/dashboard", "u1", &mut flags, &mut h.sequencer);
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
        // The tour is on screen and will be offered again on the next check.
        assert!(h.sequencer.is_running());
        assert!(flags.is_pending("u1", "welcome").unwrap());
        assert!(!flags.has_seen("u1", "welcome").unwrap());
    }

    #[test]
    fn running_sequencer_defers_check() {
        let mut h = host();
        h.sequencer.start(vec![ShowcaseStep::new("nav", "", "")], false);
        h.flags.set_pending("u1", "welcome").unwrap();
        h.tours.request();
        assert_eq!(h.tours.pump("/dashboard", "u1", &mut h.flags, &mut h.sequencer).unwrap(), None);
        assert!(h.tours.is_requested());
        assert!(h.flags.is_pending("u1", "welcome").unwrap());
    }

    #[test]
    fn dropped_watch_stops_latching() {
        let h = host();
        let watch = h.tours.watch(&h.signal);
        drop(watch);
        h.signal.dispatch(&());
        assert!(!h.tours.is_requested());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut h = host();
        let err = h
            .tours
            .register(TourDefinition::new("welcome", vec![ShowcaseStep::new("nav", "", "")]))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateId(_)));
        assert_eq!(h.tours.len(), 1);
    }
}
