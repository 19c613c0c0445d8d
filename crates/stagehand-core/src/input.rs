// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Backend-agnostic input vocabulary shared by the host and its plugins.
//!
//! Windowing backends translate their native events into these types before
//! handing them to the host, so plugins never see backend-specific key codes.

/// A physical keyboard key.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter keys.
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Digit keys on the main row.
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,
    /// Function keys.
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    /// Navigation and editing keys.
    Escape, Enter, Tab, Backspace, Space, Delete, Insert, Home, End, PageUp, PageDown,
    /// Arrow keys.
    Left, Right, Up, Down,
    /// Modifier keys.
    LeftShift, RightShift, LeftControl, RightControl, LeftAlt, RightAlt, LeftSuper, RightSuper,
    /// Any key the backend could not map.
    Unknown,
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// The key went down.
    Press,
    /// The key went up.
    Release,
    /// The key is held and the OS generated a repeat.
    Repeat,
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}

/// What happened to a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonAction {
    /// The button went down.
    Press,
    /// The button went up.
    Release,
}

/// Set of keyboard modifiers active while an input event was generated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mods {
    bits: u8,
}

impl Mods {
    /// No modifiers.
    pub const NONE: Self = Self { bits: 0 };
    /// Either shift key.
    pub const SHIFT: Self = Self { bits: 1 << 0 };
    /// Either control key.
    pub const CONTROL: Self = Self { bits: 1 << 1 };
    /// Either alt/option key.
    pub const ALT: Self = Self { bits: 1 << 2 };
    /// Either super/command/windows key.
    pub const SUPER: Self = Self { bits: 1 << 3 };

    /// Creates a modifier set from raw bits, discarding unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self { bits: bits & 0b1111 }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns `true` if no modifier is held.
    pub const fn none(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if at least one modifier is held.
    pub const fn any(&self) -> bool {
        self.bits != 0
    }

    /// Returns `true` if all modifiers in `other` are held.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Adds the modifiers in `other`.
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Removes the modifiers in `other`.
    pub fn remove(&mut self, other: Self) {
        self.bits &= !other.bits;
    }

    /// Sets or clears the modifiers in `other`.
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl core::ops::BitOr for Mods {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }
}

impl core::fmt::Debug for Mods {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.none() {
            return write!(f, "Mods {{ NONE }}");
        }
        let names = [
            (Self::SHIFT, "SHIFT"),
            (Self::CONTROL, "CONTROL"),
            (Self::ALT, "ALT"),
            (Self::SUPER, "SUPER"),
        ];
        write!(f, "Mods {{ ")?;
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, " }}")
    }
}

impl Key {
    /// Returns the modifier flag this key drives, if it is a modifier key.
    pub const fn modifier(&self) -> Option<Mods> {
        match self {
            Key::LeftShift | Key::RightShift => Some(Mods::SHIFT),
            Key::LeftControl | Key::RightControl => Some(Mods::CONTROL),
            Key::LeftAlt | Key::RightAlt => Some(Mods::ALT),
            Key::LeftSuper | Key::RightSuper => Some(Mods::SUPER),
            _ => None,
        }
    }
}

/// Recomputes the modifier set reported alongside a key event.
///
/// Some platforms report the modifier state from *before* the event when the
/// key itself is a modifier: pressing shift arrives without `SHIFT`, releasing
/// it arrives with `SHIFT` still set. The modifier bit belonging to `key` is
/// therefore derived from `action` instead of trusting `mods`.
pub fn fix_keyboard_mods(mods: Mods, key: Key, action: KeyAction) -> Mods {
    let mut fixed = mods;
    if let Some(flag) = key.modifier() {
        fixed.set(flag, action != KeyAction::Release);
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressing_shift_reports_shift() {
        let mods = fix_keyboard_mods(Mods::NONE, Key::LeftShift, KeyAction::Press);
        assert_eq!(mods, Mods::SHIFT);
    }

    #[test]
    fn releasing_control_clears_control_only() {
        let mods = fix_keyboard_mods(
            Mods::CONTROL | Mods::ALT,
            Key::RightControl,
            KeyAction::Release,
        );
        assert_eq!(mods, Mods::ALT);
    }

    #[test]
    fn repeat_keeps_modifier_set() {
        let mods = fix_keyboard_mods(Mods::NONE, Key::LeftSuper, KeyAction::Repeat);
        assert!(mods.contains(Mods::SUPER));
    }

    #[test]
    fn non_modifier_keys_pass_through() {
        let mods = fix_keyboard_mods(Mods::SHIFT, Key::A, KeyAction::Release);
        assert_eq!(mods, Mods::SHIFT);
    }

    #[test]
    fn truncation_drops_unknown_bits() {
        let mods = Mods::from_bits_truncate(0xFF);
        assert_eq!(mods.bits(), 0b1111);
        assert!(mods.any());
    }

    #[test]
    fn debug_lists_flag_names() {
        let text = format!("{:?}", Mods::SHIFT | Mods::SUPER);
        assert_eq!(text, "Mods { SHIFT | SUPER }");
        assert_eq!(format!("{:?}", Mods::NONE), "Mods { NONE }");
    }
}
