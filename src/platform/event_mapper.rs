//=========================================================================
// Platform Event Mapper
//
// Converts Winit input identifiers to the engine's host-facing
// integer key codes. Keeps the engine core independent of the
// windowing library's types.
//
// Responsibilities:
// - Translate physical keyboard keys to `keys::*` codes
// - Translate mouse buttons to pointer button codes
// - Drop keys the engine has no code for
//
//=========================================================================

use winit::event::MouseButton as WinitMouseButton;
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::core::input::keys;

//=== Key Conversion ======================================================
//
// Only the common subset is mapped; unmapped keys return `None` and
// are ignored by the platform layer.
//
pub(crate) fn key_code(physical: PhysicalKey) -> Option<i32> {
    let PhysicalKey::Code(code) = physical else {
        return None;
    };

    use WinitKeyCode::*;
    let mapped = match code {
        //--- Control keys ------------------------------------------------
        Space => keys::SPACE,
        Escape => keys::ESCAPE,
        Enter => keys::ENTER,

        //--- Arrow keys --------------------------------------------------
        ArrowRight => keys::ARROW_RIGHT,
        ArrowLeft => keys::ARROW_LEFT,
        ArrowDown => keys::ARROW_DOWN,
        ArrowUp => keys::ARROW_UP,

        //--- Numeric keys ------------------------------------------------
        Digit0 => keys::DIGIT_0, Digit1 => keys::DIGIT_1,
        Digit2 => keys::DIGIT_2, Digit3 => keys::DIGIT_3,
        Digit4 => keys::DIGIT_4, Digit5 => keys::DIGIT_5,
        Digit6 => keys::DIGIT_6, Digit7 => keys::DIGIT_7,
        Digit8 => keys::DIGIT_8, Digit9 => keys::DIGIT_9,

        //--- Alphabetic keys ---------------------------------------------
        KeyA => keys::KEY_A, KeyB => keys::KEY_B, KeyC => keys::KEY_C,
        KeyD => keys::KEY_D, KeyE => keys::KEY_E, KeyF => keys::KEY_F,
        KeyG => keys::KEY_G, KeyH => keys::KEY_H, KeyI => keys::KEY_I,
        KeyJ => keys::KEY_J, KeyK => keys::KEY_K, KeyL => keys::KEY_L,
        KeyM => keys::KEY_M, KeyN => keys::KEY_N, KeyO => keys::KEY_O,
        KeyP => keys::KEY_P, KeyQ => keys::KEY_Q, KeyR => keys::KEY_R,
        KeyS => keys::KEY_S, KeyT => keys::KEY_T, KeyU => keys::KEY_U,
        KeyV => keys::KEY_V, KeyW => keys::KEY_W, KeyX => keys::KEY_X,
        KeyY => keys::KEY_Y, KeyZ => keys::KEY_Z,

        //--- Unmapped ----------------------------------------------------
        _ => return None,
    };
    Some(mapped)
}

//=== Mouse Conversion ====================================================

pub(crate) fn pointer_code(button: WinitMouseButton) -> i32 {
    match button {
        WinitMouseButton::Left => keys::POINTER_LEFT,
        WinitMouseButton::Right => keys::POINTER_RIGHT,
        WinitMouseButton::Middle => keys::POINTER_MIDDLE,
        _ => keys::POINTER_MIDDLE + 1,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_ascii_codes() {
        assert_eq!(
            key_code(PhysicalKey::Code(WinitKeyCode::KeyA)),
            Some(keys::KEY_A)
        );
        assert_eq!(
            key_code(PhysicalKey::Code(WinitKeyCode::KeyZ)),
            Some(keys::KEY_Z)
        );
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(key_code(PhysicalKey::Code(WinitKeyCode::F24)), None);
    }

    #[test]
    fn mouse_buttons_map_to_pointer_codes() {
        assert_eq!(pointer_code(WinitMouseButton::Left), keys::POINTER_LEFT);
        assert_eq!(pointer_code(WinitMouseButton::Right), keys::POINTER_RIGHT);
        assert_eq!(pointer_code(WinitMouseButton::Middle), keys::POINTER_MIDDLE);
    }
}
