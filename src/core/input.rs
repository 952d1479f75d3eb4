//=========================================================================
// Input System
//
// Pending-event buffer plus the per-frame input snapshot.
//
// Raw key and pointer events may arrive at any time, from any thread
// (window callbacks often run outside the frame loop). They are only
// enqueued here; once per frame the engine latches everything that
// accumulated into a stable snapshot, and resets the frame-scoped
// edge flags after every snapshot consumer has run.
//
// Responsibilities:
// - Accept raw events concurrently through a cloneable sender
// - Latch buffered events into pressed/just-pressed/just-released state
// - Expose read-only queries for scenes, scripts and UI
// - Reset the frame-scoped edges at the latch/reset boundary
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

//=== Key Codes ===========================================================

/// Host-facing key codes for the raw event surface.
///
/// The engine treats keys as opaque integers; these constants cover the
/// common set so hosts and gameplay code agree on values.
pub mod keys {
    pub const SPACE: i32 = 32;
    pub const ESCAPE: i32 = 256;
    pub const ENTER: i32 = 257;

    pub const ARROW_RIGHT: i32 = 262;
    pub const ARROW_LEFT: i32 = 263;
    pub const ARROW_DOWN: i32 = 264;
    pub const ARROW_UP: i32 = 265;

    pub const DIGIT_0: i32 = 48;
    pub const DIGIT_1: i32 = 49;
    pub const DIGIT_2: i32 = 50;
    pub const DIGIT_3: i32 = 51;
    pub const DIGIT_4: i32 = 52;
    pub const DIGIT_5: i32 = 53;
    pub const DIGIT_6: i32 = 54;
    pub const DIGIT_7: i32 = 55;
    pub const DIGIT_8: i32 = 56;
    pub const DIGIT_9: i32 = 57;

    pub const KEY_A: i32 = 65;
    pub const KEY_B: i32 = 66;
    pub const KEY_C: i32 = 67;
    pub const KEY_D: i32 = 68;
    pub const KEY_E: i32 = 69;
    pub const KEY_F: i32 = 70;
    pub const KEY_G: i32 = 71;
    pub const KEY_H: i32 = 72;
    pub const KEY_I: i32 = 73;
    pub const KEY_J: i32 = 74;
    pub const KEY_K: i32 = 75;
    pub const KEY_L: i32 = 76;
    pub const KEY_M: i32 = 77;
    pub const KEY_N: i32 = 78;
    pub const KEY_O: i32 = 79;
    pub const KEY_P: i32 = 80;
    pub const KEY_Q: i32 = 81;
    pub const KEY_R: i32 = 82;
    pub const KEY_S: i32 = 83;
    pub const KEY_T: i32 = 84;
    pub const KEY_U: i32 = 85;
    pub const KEY_V: i32 = 86;
    pub const KEY_W: i32 = 87;
    pub const KEY_X: i32 = 88;
    pub const KEY_Y: i32 = 89;
    pub const KEY_Z: i32 = 90;

    pub const POINTER_LEFT: i32 = 0;
    pub const POINTER_RIGHT: i32 = 1;
    pub const POINTER_MIDDLE: i32 = 2;
}

//=== RawInput ============================================================

/// A raw event as delivered by the host, before latching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    Key {
        key: i32,
        pressed: bool,
    },
    Pointer {
        key: i32,
        pressed: bool,
        x: f32,
        y: f32,
    },
}

//=== InputSender =========================================================

/// Cloneable handle for enqueueing raw events from any thread.
///
/// Sending never blocks and never touches per-frame state; events sit
/// in the pending buffer until the next latch.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<RawInput>,
}

impl InputSender {
    pub fn key_event(&self, key: i32, pressed: bool) {
        self.send(RawInput::Key { key, pressed });
    }

    pub fn pointer_event(&self, key: i32, pressed: bool, x: f32, y: f32) {
        self.send(RawInput::Pointer { key, pressed, x, y });
    }

    fn send(&self, event: RawInput) {
        // A dropped receiver means the engine is gone; late events are
        // not an error.
        if self.tx.send(event).is_err() {
            trace!(target: "input", "event dropped after shutdown: {:?}", event);
        }
    }
}

//=== ButtonState =========================================================

/// Snapshot state of one key or pointer button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

//=== PointerState ========================================================

/// Snapshot state of the pointer: latest position plus button states.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    buttons: HashMap<i32, ButtonState>,
}

//=== InputSystem =========================================================

/// Owns the pending-event buffer and the per-frame input snapshot.
///
/// `frame()` and `reset()` bracket the window in which the snapshot is
/// stable: everything between them sees one consistent view of input,
/// regardless of how events trickle in from the host.
pub struct InputSystem {
    sender: Sender<RawInput>,
    receiver: Receiver<RawInput>,
    keys: HashMap<i32, ButtonState>,
    pointer: PointerState,
}

impl InputSystem {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            keys: HashMap::new(),
            pointer: PointerState::default(),
        }
    }

    /// Returns a handle other threads can use to enqueue events.
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.sender.clone(),
        }
    }

    //--- Enqueue ----------------------------------------------------------
    //
    // Direct enqueue entry points for hosts that deliver events on the
    // frame thread. Equivalent to going through a sender handle.
    //
    pub fn set_key_event(&self, key: i32, pressed: bool) {
        let _ = self.sender.send(RawInput::Key { key, pressed });
    }

    pub fn set_pointer_event(&self, key: i32, pressed: bool, x: f32, y: f32) {
        let _ = self.sender.send(RawInput::Pointer { key, pressed, x, y });
    }

    //--- frame() ----------------------------------------------------------
    //
    // Latches all events buffered since the previous latch into the
    // snapshot. Repeated state (a move with the button still held, a
    // key-down repeat) produces no edge; only transitions do.
    //
    pub fn frame(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                RawInput::Key { key, pressed } => {
                    Self::apply(self.keys.entry(key).or_default(), pressed);
                }
                RawInput::Pointer { key, pressed, x, y } => {
                    self.pointer.x = x;
                    self.pointer.y = y;
                    Self::apply(self.pointer.buttons.entry(key).or_default(), pressed);
                }
            }
        }
    }

    fn apply(state: &mut ButtonState, pressed: bool) {
        if pressed && !state.pressed {
            state.just_pressed = true;
        }
        if !pressed && state.pressed {
            state.just_released = true;
        }
        state.pressed = pressed;
    }

    //--- reset() ----------------------------------------------------------
    //
    // Clears the frame-scoped edge flags. Must run only after every
    // snapshot consumer in the frame has finished; held state survives
    // into the next frame, edges do not.
    //
    pub fn reset(&mut self) {
        self.keys.retain(|_, state| {
            state.just_pressed = false;
            state.just_released = false;
            state.pressed
        });
        self.pointer.buttons.retain(|_, state| {
            state.just_pressed = false;
            state.just_released = false;
            state.pressed
        });
    }

    //--- Query Methods ----------------------------------------------------

    pub fn key_pressed(&self, key: i32) -> bool {
        self.keys.get(&key).is_some_and(|s| s.pressed)
    }

    pub fn key_just_pressed(&self, key: i32) -> bool {
        self.keys.get(&key).is_some_and(|s| s.just_pressed)
    }

    pub fn key_just_released(&self, key: i32) -> bool {
        self.keys.get(&key).is_some_and(|s| s.just_released)
    }

    pub fn pointer_position(&self) -> (f32, f32) {
        (self.pointer.x, self.pointer.y)
    }

    pub fn pointer_pressed(&self, button: i32) -> bool {
        self.pointer.buttons.get(&button).is_some_and(|s| s.pressed)
    }

    pub fn pointer_just_pressed(&self, button: i32) -> bool {
        self.pointer
            .buttons
            .get(&button)
            .is_some_and(|s| s.just_pressed)
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
