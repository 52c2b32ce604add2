#![forbid(unsafe_code)]

//! Test doubles for the element seams.
//!
//! All three types are cheap `Rc` handles: cloning one shares state with the
//! original, so a test can hand a clone to the [`Sequencer`](crate::Sequencer)
//! and keep another to inspect or mutate the page mid-run.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use showcase_core::{Rect, Size};

use crate::highlight::{StyleProperty, Styler};
use crate::locator::{ElementHandle, Locator};
use crate::step::TargetKey;

/// A fake element with a mutable bounding box and an activation counter.
#[derive(Debug, Clone)]
pub struct MockElement {
    key: TargetKey,
    rect: Rc<Cell<Rect>>,
    activations: Rc<Cell<u32>>,
}

impl MockElement {
    pub fn new(key: impl Into<TargetKey>, rect: Rect) -> Self {
        Self {
            key: key.into(),
            rect: Rc::new(Cell::new(rect)),
            activations: Rc::new(Cell::new(0)),
        }
    }

    pub fn key(&self) -> &TargetKey {
        &self.key
    }

    /// Move or resize the element.
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// How many times `activate` was called on this element or a clone.
    pub fn activations(&self) -> u32 {
        self.activations.get()
    }
}

impl ElementHandle for MockElement {
    fn bounding_box(&self) -> Rect {
        self.rect.get()
    }

    fn activate(&self) {
        self.activations.set(self.activations.get() + 1);
    }
}

#[derive(Debug, Default)]
struct LocatorState {
    viewport: Size,
    elements: HashMap<TargetKey, MockElement>,
    lookups: Vec<TargetKey>,
}

/// A locator over a fixed set of [`MockElement`]s.
#[derive(Debug, Clone, Default)]
pub struct MockLocator {
    state: Rc<RefCell<LocatorState>>,
}

impl MockLocator {
    pub fn new(viewport: Size) -> Self {
        let locator = Self::default();
        locator.state.borrow_mut().viewport = viewport;
        locator
    }

    /// Add an element; returns a handle sharing its state.
    pub fn insert(&self, key: impl Into<TargetKey>, rect: Rect) -> MockElement {
        let element = MockElement::new(key, rect);
        self.state
            .borrow_mut()
            .elements
            .insert(element.key.clone(), element.clone());
        element
    }

    /// Take an element off the page.
    pub fn remove(&self, key: &str) -> Option<MockElement> {
        self.state.borrow_mut().elements.remove(&TargetKey::new(key))
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Every key passed to `resolve`, in order, found or not.
    pub fn lookups(&self) -> Vec<TargetKey> {
        self.state.borrow().lookups.clone()
    }
}

impl Locator for MockLocator {
    type Handle = MockElement;

    fn resolve(&self, target: &TargetKey) -> Option<MockElement> {
        let mut state = self.state.borrow_mut();
        state.lookups.push(target.clone());
        state.elements.get(target).cloned()
    }

    fn viewport(&self) -> Size {
        self.state.borrow().viewport
    }
}

/// One call to [`Styler::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleWrite {
    pub element: TargetKey,
    pub property: StyleProperty,
    pub value: Option<String>,
}

#[derive(Debug, Default)]
struct StylerState {
    styles: BTreeMap<(TargetKey, StyleProperty), String>,
    writes: Vec<StyleWrite>,
}

/// An in-memory inline style table that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingStyler {
    state: Rc<RefCell<StylerState>>,
}

impl RecordingStyler {
    /// Current inline value of `property` on `element`.
    pub fn get(&self, element: &MockElement, property: StyleProperty) -> Option<String> {
        self.state
            .borrow()
            .styles
            .get(&(element.key.clone(), property))
            .cloned()
    }

    /// Seed a value without recording a write (the page's own styling).
    pub fn set(&self, element: &MockElement, property: StyleProperty, value: &str) {
        self.state
            .borrow_mut()
            .styles
            .insert((element.key.clone(), property), value.to_owned());
    }

    /// Number of elements whose `property` currently equals `value`.
    pub fn count_with(&self, property: StyleProperty, value: &str) -> usize {
        self.state
            .borrow()
            .styles
            .iter()
            .filter(|((_, p), v)| *p == property && v.as_str() == value)
            .count()
    }

    /// All recorded writes, oldest first.
    pub fn writes(&self) -> Vec<StyleWrite> {
        self.state.borrow().writes.clone()
    }
}

impl Styler<MockElement> for RecordingStyler {
    fn read(&self, element: &MockElement, property: StyleProperty) -> Option<String> {
        self.get(element, property)
    }

    fn write(&mut self, element: &MockElement, property: StyleProperty, value: Option<&str>) {
        let mut state = self.state.borrow_mut();
        let key = (element.key.clone(), property);
        match value {
            Some(v) => {
                state.styles.insert(key, v.to_owned());
            }
            None => {
                state.styles.remove(&key);
            }
        }
        state.writes.push(StyleWrite {
            element: element.key.clone(),
            property,
            value: value.map(str::to_owned),
        });
    }
}
