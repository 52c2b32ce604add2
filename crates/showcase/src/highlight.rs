#![forbid(unsafe_code)]

//! Spotlight styling with exact restoration.
//!
//! [`HighlightEffector::apply`] snapshots every style property it is about to
//! touch, then raises the element above the page with a shadow and a slight
//! scale. [`HighlightEffector::clear`] writes the snapshot back verbatim:
//! properties that were unset before `apply` are removed again rather than
//! reset to some default.
//!
//! # Invariants
//!
//! 1. At most one [`HighlightHandle`] is outstanding per effector. `apply`
//!    while one is outstanding returns [`HighlightError::AlreadyActive`].
//! 2. A handle can only be cleared once: `clear` takes it by value and the
//!    type is not `Clone`.
//! 3. After `clear`, reading every [`StyleProperty`] yields the values
//!    captured at `apply` time.

use crate::config::HighlightStyle;
use crate::error::HighlightError;

/// Style properties the effector reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Position,
    ZIndex,
    BoxShadow,
    Transform,
    Transition,
}

impl StyleProperty {
    /// Every property, in the order they are captured.
    pub const ALL: [StyleProperty; 5] = [
        StyleProperty::Position,
        StyleProperty::ZIndex,
        StyleProperty::BoxShadow,
        StyleProperty::Transform,
        StyleProperty::Transition,
    ];

    /// CSS property name.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::ZIndex => "z-index",
            Self::BoxShadow => "box-shadow",
            Self::Transform => "transform",
            Self::Transition => "transition",
        }
    }
}

/// Reads and writes inline style properties on elements of type `H`.
///
/// `None` means the property is not set inline. Writing `None` removes it.
pub trait Styler<H> {
    fn read(&self, element: &H, property: StyleProperty) -> Option<String>;
    fn write(&mut self, element: &H, property: StyleProperty, value: Option<&str>);
}

/// Values of every [`StyleProperty`] on one element at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSnapshot {
    values: Vec<(StyleProperty, Option<String>)>,
}

impl StyleSnapshot {
    /// Read every property of `element`.
    pub fn capture<H, S: Styler<H> + ?Sized>(styler: &S, element: &H) -> Self {
        Self {
            values: StyleProperty::ALL
                .into_iter()
                .map(|prop| (prop, styler.read(element, prop)))
                .collect(),
        }
    }

    /// Value captured for `property`.
    #[must_use]
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .and_then(|(_, v)| v.as_deref())
    }

    fn restore<H, S: Styler<H> + ?Sized>(&self, styler: &mut S, element: &H) {
        for (prop, value) in &self.values {
            styler.write(element, *prop, value.as_deref());
        }
    }
}

/// Proof that an element is currently highlighted.
///
/// Pass it back to [`HighlightEffector::clear`] to undo the styling.
#[must_use = "a highlight stays applied until its handle is cleared"]
#[derive(Debug)]
pub struct HighlightHandle<H> {
    element: H,
    snapshot: StyleSnapshot,
}

impl<H> HighlightHandle<H> {
    /// The highlighted element.
    pub fn element(&self) -> &H {
        &self.element
    }

    /// Style values captured before the highlight was applied.
    pub fn snapshot(&self) -> &StyleSnapshot {
        &self.snapshot
    }
}

/// Applies and removes the spotlight treatment.
#[derive(Debug)]
pub struct HighlightEffector<S> {
    styler: S,
    style: HighlightStyle,
    outstanding: bool,
}

impl<S> HighlightEffector<S> {
    /// Create an effector writing through `styler`.
    pub fn new(styler: S, style: HighlightStyle) -> Self {
        Self {
            styler,
            style,
            outstanding: false,
        }
    }

    /// Whether a handle is outstanding.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.outstanding
    }

    /// Styling written by [`apply`](Self::apply).
    pub fn style(&self) -> &HighlightStyle {
        &self.style
    }

    /// Underlying styler.
    pub fn styler(&self) -> &S {
        &self.styler
    }

    /// Highlight `element`, recording its prior style.
    pub fn apply<H: Clone>(&mut self, element: &H) -> Result<HighlightHandle<H>, HighlightError>
    where
        S: Styler<H>,
    {
        if self.outstanding {
            return Err(HighlightError::AlreadyActive);
        }
        let snapshot = StyleSnapshot::capture(&self.styler, element);

        // Stacking only takes effect on positioned elements.
        let positioned = !matches!(snapshot.get(StyleProperty::Position), None | Some("static"));
        if !positioned {
            self.styler
                .write(element, StyleProperty::Position, Some("relative"));
        }
        let z_index = self.style.z_index.to_string();
        let transform = self.style.transform();
        self.styler
            .write(element, StyleProperty::ZIndex, Some(&z_index));
        self.styler
            .write(element, StyleProperty::BoxShadow, Some(&self.style.box_shadow));
        self.styler
            .write(element, StyleProperty::Transform, Some(&transform));
        self.styler
            .write(element, StyleProperty::Transition, Some(&self.style.transition));

        self.outstanding = true;
        tracing::debug!(target: "showcase.highlight", positioned, "highlight applied");
        Ok(HighlightHandle {
            element: element.clone(),
            snapshot,
        })
    }

    /// Restore the element behind `handle` to its pre-highlight style.
    pub fn clear<H>(&mut self, handle: HighlightHandle<H>)
    where
        S: Styler<H>,
    {
        handle.snapshot.restore(&mut self.styler, &handle.element);
        self.outstanding = false;
        tracing::debug!(target: "showcase.highlight", "highlight cleared");
    }
}
