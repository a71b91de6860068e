//! Inbound message queue
//!
//! Host events are queued and applied at the start of the next tick, so no
//! event ever observes a half-finished frame.

use std::collections::VecDeque;

use crate::input::keyboard::KeyCode;
use crate::scene::EntityId;
use crate::view::ViewMode;

/// A request for the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMessage {
    /// Set the speed multiplier (clamped)
    SetSpeed(f32),
    /// Change speed by whole speed steps
    AdjustSpeed(i32),
    /// Flip play/pause
    TogglePlay,
    /// Force play or pause
    SetPlaying(bool),
    /// Fly to and lock onto a body
    Focus(EntityId),
    /// Set or clear the selection without moving the camera
    Select(Option<EntityId>),
    /// Fly back to the overview
    ResetView,
    /// Switch between system and body view
    SetViewMode(ViewMode),
    /// Pointer moved, in NDC
    PointerMove(f32, f32),
    /// Pointer clicked, in NDC
    PointerClick(f32, f32),
    /// Pointer moved, in viewport pixels from the top-left corner
    PointerMovePx(f64, f64),
    /// Pointer clicked, in viewport pixels from the top-left corner
    PointerClickPx(f64, f64),
    /// Viewport resized, in pixels
    Resize {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// Key pressed
    Key(KeyCode),
    /// Page or window visibility changed
    VisibilityChanged {
        /// True when the view is no longer visible
        hidden: bool,
    },
}

/// FIFO of pending messages
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<ViewMessage>,
}

impl InputQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the next tick
    pub fn push(&mut self, message: ViewMessage) {
        self.pending.push_back(message);
    }

    /// Take every pending message in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = ViewMessage> + '_ {
        self.pending.drain(..)
    }

    /// Number of pending messages
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
