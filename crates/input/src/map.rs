//! Key mapping from terminal events to DOOM key codes.
//!
//! A single physical key can map to several codes: movement keys emit the
//! directional code plus the plain ASCII character, so both gameplay
//! movement and text-entry UI (savegame names, cheat codes) work from the
//! same key, and the shift modifier adds the run key on top. Unmapped keys
//! map to nothing and are dropped silently.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};

use tui_doom_types::keys::*;

/// DOOM codes for one key notification (zero to three).
pub fn map_key(key: &KeyEvent) -> ArrayVec<u8, 3> {
    let mut codes = ArrayVec::new();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // Ctrl-anything fires; the chord itself is not forwarded.
        codes.push(KEY_FIRE);
        return codes;
    }

    match key.code {
        KeyCode::Up => codes.push(KEY_UPARROW),
        KeyCode::Down => codes.push(KEY_DOWNARROW),
        KeyCode::Left => codes.push(KEY_LEFTARROW),
        KeyCode::Right => codes.push(KEY_RIGHTARROW),

        KeyCode::Char('w') | KeyCode::Char('W') => {
            codes.push(KEY_UPARROW);
            codes.push(b'w');
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            codes.push(KEY_DOWNARROW);
            codes.push(b's');
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            codes.push(KEY_STRAFE_L);
            codes.push(b'a');
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            codes.push(KEY_STRAFE_R);
            codes.push(b'd');
        }

        KeyCode::Char(' ') => codes.push(KEY_USE),
        KeyCode::Char('e') | KeyCode::Char('E') => {
            codes.push(KEY_USE);
            codes.push(b'e');
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            codes.push(KEY_FIRE);
            codes.push(b'f');
        }

        KeyCode::Enter => codes.push(KEY_ENTER),
        KeyCode::Esc => codes.push(KEY_ESCAPE),
        KeyCode::Tab => codes.push(KEY_TAB),
        KeyCode::Backspace => codes.push(KEY_BACKSPACE),

        KeyCode::F(n @ 1..=10) => codes.push(KEY_F1 + (n - 1)),
        KeyCode::F(11) => codes.push(KEY_F11),
        KeyCode::F(12) => codes.push(KEY_F12),

        KeyCode::Char(c) if c.is_ascii() && !c.is_ascii_control() => {
            codes.push(c.to_ascii_lowercase() as u8);
        }

        _ => {}
    }

    // Run while the shifted key is held; a key that maps to nothing stays
    // unmapped even with shift down.
    if key.modifiers.contains(KeyModifiers::SHIFT) && !codes.is_empty() {
        codes.insert(0, KEY_RSHIFT);
    }

    codes
}

/// Stable per-physical-key identifier for the bridge state table.
///
/// Uppercase and lowercase are the same physical key.
pub fn key_id(key: &KeyEvent) -> Option<KeyCode> {
    match key.code {
        KeyCode::Char(c) => Some(KeyCode::Char(c.to_ascii_lowercase())),
        KeyCode::Up
        | KeyCode::Down
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Enter
        | KeyCode::Esc
        | KeyCode::Tab
        | KeyCode::Backspace
        | KeyCode::F(_) => Some(key.code),
        _ => None,
    }
}

/// Keys answering modal yes/no prompts need a discrete press/release pair
/// on every notification, not a held state.
pub fn is_confirm_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('n') | KeyCode::Char('N')
            | KeyCode::Enter
            | KeyCode::Esc
    )
}

/// DOOM code for a mouse button, if it maps to one.
pub fn map_mouse_button(button: MouseButton) -> Option<u8> {
    match button {
        MouseButton::Left => Some(KEY_FIRE),
        MouseButton::Right => Some(KEY_USE),
        MouseButton::Middle => None,
    }
}

/// Host-level quit chord (the engine's own quit flows through Esc menus).
pub fn should_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_emit_directional_and_ascii_codes() {
        let codes = map_key(&KeyEvent::from(KeyCode::Char('w')));
        assert_eq!(codes.as_slice(), &[KEY_UPARROW, b'w']);

        let codes = map_key(&KeyEvent::from(KeyCode::Char('a')));
        assert_eq!(codes.as_slice(), &[KEY_STRAFE_L, b'a']);
    }

    #[test]
    fn arrow_keys_emit_only_directional_codes() {
        assert_eq!(
            map_key(&KeyEvent::from(KeyCode::Up)).as_slice(),
            &[KEY_UPARROW]
        );
        assert_eq!(
            map_key(&KeyEvent::from(KeyCode::Left)).as_slice(),
            &[KEY_LEFTARROW]
        );
    }

    #[test]
    fn ctrl_chord_maps_to_fire_only() {
        let key = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&key).as_slice(), &[KEY_FIRE]);
    }

    #[test]
    fn shift_modifier_adds_the_run_key() {
        let key = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert_eq!(map_key(&key).as_slice(), &[KEY_RSHIFT, KEY_UPARROW]);

        let key = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(map_key(&key).as_slice(), &[KEY_RSHIFT, KEY_UPARROW, b'w']);

        // Shift alone does not turn an unmapped key into a run press.
        let key = KeyEvent::new(KeyCode::Home, KeyModifiers::SHIFT);
        assert!(map_key(&key).is_empty());
    }

    #[test]
    fn unmapped_keys_map_to_nothing() {
        assert!(map_key(&KeyEvent::from(KeyCode::Home)).is_empty());
        assert!(map_key(&KeyEvent::from(KeyCode::Insert)).is_empty());
    }

    #[test]
    fn uppercase_and_lowercase_share_a_key_id() {
        let upper = key_id(&KeyEvent::from(KeyCode::Char('W')));
        let lower = key_id(&KeyEvent::from(KeyCode::Char('w')));
        assert_eq!(upper, lower);
    }

    #[test]
    fn confirm_keys_are_the_modal_prompt_set() {
        assert!(is_confirm_key(KeyCode::Char('y')));
        assert!(is_confirm_key(KeyCode::Char('n')));
        assert!(is_confirm_key(KeyCode::Enter));
        assert!(is_confirm_key(KeyCode::Esc));
        assert!(!is_confirm_key(KeyCode::Char('w')));
    }

    #[test]
    fn quit_requires_ctrl() {
        assert!(should_quit(&KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(&KeyEvent::from(KeyCode::Char('q'))));
    }
}
