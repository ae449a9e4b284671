//! Keyboard mapping into per-tick input
//!
//! The host forwards raw key names; the latch turns them into one
//! `TickInput` per frame.

use crate::sim::{TickInput, TrickKind};

/// Trick bound to a number key
pub fn trick_for_key(key: &str) -> Option<TrickKind> {
    match key {
        "1" => Some(TrickKind::Backflip),
        "2" => Some(TrickKind::Frontflip),
        "3" => Some(TrickKind::Spin360),
        "4" => Some(TrickKind::Grab),
        _ => None,
    }
}

/// Host-side keyboard state between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    space_held: bool,
    up_held: bool,
    /// Space went down on the ground and is still held
    pending_flip: bool,
    tricks: Vec<TrickKind>,
    pub autopilot: bool,
}

impl InputLatch {
    /// Record a key press. Returns whether the key is a game key (the host
    /// should suppress its default action).
    pub fn key_down(&mut self, key: &str, airborne: bool) -> bool {
        match key {
            " " => {
                self.space_held = true;
                if airborne {
                    self.tricks.push(TrickKind::Backflip);
                } else {
                    // Jump now, flip as soon as the air allows
                    self.pending_flip = true;
                }
                true
            }
            "ArrowUp" => {
                self.up_held = true;
                true
            }
            "ArrowLeft" | "ArrowRight" => true,
            _ => match trick_for_key(key) {
                Some(kind) => {
                    self.tricks.push(kind);
                    true
                }
                None => false,
            },
        }
    }

    pub fn key_up(&mut self, key: &str) {
        match key {
            " " => {
                self.space_held = false;
                self.pending_flip = false;
            }
            "ArrowUp" => self.up_held = false,
            _ => {}
        }
    }

    /// Drop held keys (focus loss)
    pub fn release_all(&mut self) {
        self.space_held = false;
        self.up_held = false;
        self.pending_flip = false;
        self.tricks.clear();
    }

    /// Input for the next tick; one-shot trick presses are consumed
    pub fn take(&mut self) -> TickInput {
        TickInput {
            jump: self.space_held || self.up_held,
            queued_flip: self.pending_flip,
            tricks: std::mem::take(&mut self.tricks),
            autopilot: self.autopilot,
        }
    }
}
