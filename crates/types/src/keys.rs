//! DOOM key-code vocabulary.
//!
//! These are the values the engine's input layer understands (doomkeys.h in
//! the original source tree). Printable keys additionally pass through as
//! plain lowercase ASCII so menus and cheat entry work.

pub const KEY_RIGHTARROW: u8 = 0xAE;
pub const KEY_LEFTARROW: u8 = 0xAC;
pub const KEY_UPARROW: u8 = 0xAD;
pub const KEY_DOWNARROW: u8 = 0xAF;

pub const KEY_STRAFE_L: u8 = 0xA0;
pub const KEY_STRAFE_R: u8 = 0xA1;
pub const KEY_USE: u8 = 0xA2;
pub const KEY_FIRE: u8 = 0xA3;

pub const KEY_ESCAPE: u8 = 27;
pub const KEY_ENTER: u8 = 13;
pub const KEY_TAB: u8 = 9;
pub const KEY_BACKSPACE: u8 = 0x7F;

pub const KEY_RSHIFT: u8 = 0x80 + 0x36;
pub const KEY_RCTRL: u8 = 0x80 + 0x1D;
pub const KEY_RALT: u8 = 0x80 + 0x38;

pub const KEY_F1: u8 = 0x80 + 0x3B;
pub const KEY_F2: u8 = 0x80 + 0x3C;
pub const KEY_F3: u8 = 0x80 + 0x3D;
pub const KEY_F4: u8 = 0x80 + 0x3E;
pub const KEY_F5: u8 = 0x80 + 0x3F;
pub const KEY_F6: u8 = 0x80 + 0x40;
pub const KEY_F7: u8 = 0x80 + 0x41;
pub const KEY_F8: u8 = 0x80 + 0x42;
pub const KEY_F9: u8 = 0x80 + 0x43;
pub const KEY_F10: u8 = 0x80 + 0x44;
pub const KEY_F11: u8 = 0x80 + 0x57;
pub const KEY_F12: u8 = 0x80 + 0x58;
