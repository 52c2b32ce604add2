#![forbid(unsafe_code)]

//! Element lookup seam.
//!
//! The orchestrator never queries a UI tree directly. A host implements
//! [`Locator`] over whatever it renders with (a DOM, a retained widget tree, a
//! test double) and hands back [`ElementHandle`]s. Resolution happens fresh
//! each time a step executes; a target that is not on screen yet simply
//! resolves to `None`.

use showcase_core::{Rect, Size};

use crate::step::TargetKey;

/// A live reference to a rendered element.
pub trait ElementHandle: Clone {
    /// Bounding box in viewport coordinates.
    fn bounding_box(&self) -> Rect;

    /// Synthetic click.
    fn activate(&self);
}

/// Resolves target keys to element handles.
pub trait Locator {
    type Handle: ElementHandle;

    /// Resolve `target`, or `None` if it is not currently rendered.
    fn resolve(&self, target: &TargetKey) -> Option<Self::Handle>;

    /// Current viewport size.
    fn viewport(&self) -> Size;
}

impl<L: Locator + ?Sized> Locator for &L {
    type Handle = L::Handle;

    fn resolve(&self, target: &TargetKey) -> Option<Self::Handle> {
        (**self).resolve(target)
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }
}
