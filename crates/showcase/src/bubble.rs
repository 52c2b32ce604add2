#![forbid(unsafe_code)]

//! Tooltip bubble state.

use showcase_runtime::{Observable, StateView};

use crate::placement::Placement;
use crate::step::{ShowcaseStep, Side};

/// What the renderer needs to draw the bubble.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleState {
    pub title: String,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub visible: bool,
    /// Side of the target the bubble sits on; `None` before the first step.
    pub placement: Option<Side>,
    /// Zero-based step index, for progress dots.
    pub index: usize,
    /// Number of steps in the run.
    pub count: usize,
}

/// Owner of the published [`BubbleState`].
#[derive(Debug)]
pub struct Bubble {
    state: Observable<BubbleState>,
}

impl Default for Bubble {
    fn default() -> Self {
        Self {
            state: Observable::new(BubbleState::default()),
        }
    }
}

impl Bubble {
    pub fn view(&self) -> StateView<BubbleState> {
        self.state.view()
    }

    pub fn state(&self) -> BubbleState {
        self.state.get()
    }

    /// Show `step`'s copy at `placement`.
    pub fn show(&mut self, step: &ShowcaseStep, placement: Placement, index: usize, count: usize) {
        self.state.set(BubbleState {
            title: step.title.clone(),
            description: step.description.clone(),
            x: placement.x,
            y: placement.y,
            visible: true,
            placement: Some(placement.side),
            index,
            count,
        });
    }

    /// Hide without clearing the copy, so a fade-out still has text to draw.
    pub fn hide(&mut self) {
        self.state.update(|s| s.visible = false);
    }

    /// Back to the idle default.
    pub fn reset(&mut self) {
        self.state.set(BubbleState::default());
    }
}
