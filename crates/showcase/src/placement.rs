#![forbid(unsafe_code)]

//! Tooltip placement against a target's bounding box.
//!
//! [`place`] is a pure function of the target rectangle, the viewport size,
//! an optional preferred side, and the [`PlacementConfig`]. It picks a side,
//! positions the bubble `gap` pixels away from the target on that side, then
//! clamps the result into the viewport minus `padding`.
//!
//! # Auto-placement
//!
//! Sides are tried in [`Side::PRIORITY`] order (right, left, bottom, top). A
//! side qualifies only when the space between the target and the viewport
//! edge is strictly greater than the bubble extent plus the gap. If none
//! qualifies the bubble goes on top and clamping pulls it back on screen.
//!
//! # Clamping
//!
//! `x` is clamped into `[padding, viewport.width - bubble_width - padding]`
//! and `y` likewise. When the viewport is too small for that range to be
//! non-empty, `padding` wins, so the bubble's top-left corner is always at
//! least `padding` from the viewport origin.

use showcase_core::geometry::clamp_low_wins;
use showcase_core::{Rect, Size};

use crate::config::PlacementConfig;
use crate::step::Side;

/// Resolved bubble position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge of the bubble.
    pub x: f64,
    /// Top edge of the bubble.
    pub y: f64,
    /// Side of the target the bubble sits on.
    pub side: Side,
}

/// Space between `target` and the viewport edge on `side`.
#[must_use]
pub fn available_space(target: Rect, viewport: Size, side: Side) -> f64 {
    match side {
        Side::Right => viewport.width - target.right(),
        Side::Left => target.left(),
        Side::Bottom => viewport.height - target.bottom(),
        Side::Top => target.top(),
    }
}

/// Whether a bubble fits on `side` without overlapping the target.
#[must_use]
pub fn fits(target: Rect, viewport: Size, side: Side, config: &PlacementConfig) -> bool {
    let needed = match side {
        Side::Right | Side::Left => config.bubble_width,
        Side::Bottom | Side::Top => config.bubble_height,
    } + config.gap;
    available_space(target, viewport, side) > needed
}

/// Pick the side: the preferred one if given, else the first that fits.
#[must_use]
pub fn resolve_side(
    target: Rect,
    viewport: Size,
    preferred: Option<Side>,
    config: &PlacementConfig,
) -> Side {
    if let Some(side) = preferred {
        return side;
    }
    Side::PRIORITY
        .into_iter()
        .find(|&side| fits(target, viewport, side, config))
        .unwrap_or(Side::Top)
}

/// Compute the bubble position for `target`.
#[must_use]
pub fn place(
    target: Rect,
    viewport: Size,
    preferred: Option<Side>,
    config: &PlacementConfig,
) -> Placement {
    let side = resolve_side(target, viewport, preferred, config);
    let PlacementConfig {
        gap,
        padding,
        bubble_width: bw,
        bubble_height: bh,
    } = *config;

    let centered_x = target.left() + target.width / 2.0 - bw / 2.0;
    let (raw_x, raw_y) = match side {
        Side::Right => (target.right() + gap, target.top()),
        Side::Left => (target.left() - bw - gap, target.top()),
        Side::Bottom => (centered_x, target.bottom() + gap),
        Side::Top => (centered_x, target.top() - bh - gap),
    };

    Placement {
        x: clamp_low_wins(raw_x, padding, viewport.width - bw - padding),
        y: clamp_low_wins(raw_y, padding, viewport.height - bh - padding),
        side,
    }
}
