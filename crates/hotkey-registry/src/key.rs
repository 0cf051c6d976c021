use crate::error::{Error, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Modifier keys that must be held for a hotkey to fire.
    ///
    /// Bit values match the native hotkey modifier mask, so the set can be
    /// passed to the OS unchanged. The empty set means "no modifiers".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierSet: u32 {
        const ALT = 0x0001;
        const CONTROL = 0x0002;
        const SHIFT = 0x0004;
        const WIN = 0x0008;
    }
}

impl ModifierSet {
    /// Build a set from the low word of a hotkey message payload, dropping unknown bits
    pub fn from_raw(raw: u32) -> Self {
        Self::from_bits_truncate(raw)
    }
}

/// A platform virtual-key code.
///
/// The value is opaque to the registry; the named constants cover the keys
/// people usually bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(u16);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);
    pub const END: KeyCode = KeyCode(0x23);
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);
    pub const INSERT: KeyCode = KeyCode(0x2D);
    pub const DELETE: KeyCode = KeyCode(0x2E);
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F2: KeyCode = KeyCode(0x71);
    pub const F3: KeyCode = KeyCode(0x72);
    pub const F4: KeyCode = KeyCode(0x73);
    pub const F5: KeyCode = KeyCode(0x74);
    pub const F6: KeyCode = KeyCode(0x75);
    pub const F7: KeyCode = KeyCode(0x76);
    pub const F8: KeyCode = KeyCode(0x77);
    pub const F9: KeyCode = KeyCode(0x78);
    pub const F10: KeyCode = KeyCode(0x79);
    pub const F11: KeyCode = KeyCode(0x7A);
    pub const F12: KeyCode = KeyCode(0x7B);

    /// Wrap a raw virtual-key code
    pub const fn from_raw(raw: u16) -> Self {
        KeyCode(raw)
    }

    /// The raw virtual-key code
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The key for an ASCII letter or digit
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphanumeric() {
            Some(KeyCode(c.to_ascii_uppercase() as u16))
        } else {
            None
        }
    }

    /// Function key F1 through F24
    pub fn function(n: u8) -> Option<Self> {
        if (1..=24).contains(&n) {
            Some(KeyCode(0x70 + u16::from(n) - 1))
        } else {
            None
        }
    }
}

/// A key combination: the primary key plus the modifiers held with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    pub modifiers: ModifierSet,
    pub code: KeyCode,
}

impl Key {
    /// Create a new Key with the given modifiers and code
    pub fn new(modifiers: ModifierSet, code: KeyCode) -> Self {
        Key { modifiers, code }
    }

    /// Parse a key from a string representation
    ///
    /// Supports formats like:
    /// - "f5" (just a key)
    /// - "ctrl+enter" (with a modifier)
    /// - "ctrl+shift+enter" (multiple modifiers)
    /// - "control+win+a" (alternative names)
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('+').map(|p| p.trim()).collect();
        let Some((key_part, modifier_parts)) = parts.split_last() else {
            return Err(Error::InvalidKey("Empty key string".to_string()));
        };

        let code = parse_code(key_part)?;

        let mut modifiers = ModifierSet::empty();
        for part in modifier_parts {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => ModifierSet::CONTROL,
                "alt" | "option" => ModifierSet::ALT,
                "shift" => ModifierSet::SHIFT,
                "win" | "super" | "cmd" | "meta" => ModifierSet::WIN,
                _ => return Err(Error::InvalidKey(format!("Unknown modifier: {part}"))),
            };
        }

        Ok(Key { modifiers, code })
    }
}

impl TryFrom<&str> for Key {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl TryFrom<String> for Key {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Key::parse(&s)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.contains(ModifierSet::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if self.modifiers.contains(ModifierSet::ALT) {
            parts.push("alt".to_string());
        }
        if self.modifiers.contains(ModifierSet::SHIFT) {
            parts.push("shift".to_string());
        }
        if self.modifiers.contains(ModifierSet::WIN) {
            parts.push("win".to_string());
        }

        parts.push(self.code.to_string());
        write!(f, "{}", parts.join("+"))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0x30..=0x39 | 0x41..=0x5A => {
                write!(f, "{}", char::from(self.0 as u8).to_ascii_lowercase())
            }
            0x70..=0x87 => write!(f, "f{}", self.0 - 0x70 + 1),
            _ => match named_code(*self) {
                Some(name) => f.write_str(name),
                None => write!(f, "vk{:#04x}", self.0),
            },
        }
    }
}

/// Parse a key code from a string
fn parse_code(s: &str) -> Result<KeyCode> {
    let lower = s.to_lowercase();

    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(code) = KeyCode::from_char(c) {
            return Ok(code);
        }
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return KeyCode::function(n)
            .ok_or_else(|| Error::InvalidKey(format!("Unknown function key: {s}")));
    }

    if let Some(hex) = lower.strip_prefix("vk0x") {
        return u16::from_str_radix(hex, 16)
            .map(KeyCode::from_raw)
            .map_err(|_| Error::InvalidKey(format!("Invalid virtual-key code: {s}")));
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::ENTER),
        "space" => Ok(KeyCode::SPACE),
        "escape" | "esc" => Ok(KeyCode::ESCAPE),
        "tab" => Ok(KeyCode::TAB),
        "backspace" => Ok(KeyCode::BACKSPACE),
        "delete" | "del" => Ok(KeyCode::DELETE),
        "insert" | "ins" => Ok(KeyCode::INSERT),
        "home" => Ok(KeyCode::HOME),
        "end" => Ok(KeyCode::END),
        "pageup" | "page_up" | "pgup" => Ok(KeyCode::PAGE_UP),
        "pagedown" | "page_down" | "pgdn" => Ok(KeyCode::PAGE_DOWN),
        "left" | "arrowleft" => Ok(KeyCode::LEFT),
        "right" | "arrowright" => Ok(KeyCode::RIGHT),
        "up" | "arrowup" => Ok(KeyCode::UP),
        "down" | "arrowdown" => Ok(KeyCode::DOWN),
        _ => Err(Error::InvalidKey(format!("Unknown key code: {s}"))),
    }
}

fn named_code(code: KeyCode) -> Option<&'static str> {
    let name = match code {
        KeyCode::ENTER => "enter",
        KeyCode::SPACE => "space",
        KeyCode::ESCAPE => "escape",
        KeyCode::TAB => "tab",
        KeyCode::BACKSPACE => "backspace",
        KeyCode::DELETE => "delete",
        KeyCode::INSERT => "insert",
        KeyCode::HOME => "home",
        KeyCode::END => "end",
        KeyCode::PAGE_UP => "pageup",
        KeyCode::PAGE_DOWN => "pagedown",
        KeyCode::LEFT => "left",
        KeyCode::RIGHT => "right",
        KeyCode::UP => "up",
        KeyCode::DOWN => "down",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        let key = Key::parse("a").unwrap();
        assert_eq!(key.code, KeyCode::from_raw(0x41));
        assert!(key.modifiers.is_empty());

        let key = Key::parse("F1").unwrap();
        assert_eq!(key.code, KeyCode::F1);

        let key = Key::parse("7").unwrap();
        assert_eq!(key.code.raw(), 0x37);

        let key = Key::parse("f24").unwrap();
        assert_eq!(key.code.raw(), 0x87);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let key = Key::parse("ctrl+shift+enter").unwrap();
        assert_eq!(key.code, KeyCode::ENTER);
        assert_eq!(key.modifiers, ModifierSet::CONTROL | ModifierSet::SHIFT);

        let key = Key::parse("alt + win + space").unwrap();
        assert_eq!(key.code, KeyCode::SPACE);
        assert_eq!(key.modifiers, ModifierSet::ALT | ModifierSet::WIN);
    }

    #[test]
    fn test_parse_alternative_names() {
        assert_eq!(Key::parse("control+a").unwrap(), Key::parse("ctrl+a").unwrap());
        assert_eq!(Key::parse("super+a").unwrap(), Key::parse("win+a").unwrap());
        assert_eq!(Key::parse("cmd+a").unwrap(), Key::parse("meta+a").unwrap());
        assert_eq!(Key::parse("option+a").unwrap(), Key::parse("alt+a").unwrap());
        assert_eq!(Key::parse("return").unwrap(), Key::parse("ENTER").unwrap());
    }

    #[test]
    fn test_modifier_bits_match_native_mask() {
        assert_eq!(ModifierSet::ALT.bits(), 1);
        assert_eq!(ModifierSet::CONTROL.bits(), 2);
        assert_eq!(ModifierSet::SHIFT.bits(), 4);
        assert_eq!(ModifierSet::WIN.bits(), 8);
        assert_eq!((ModifierSet::CONTROL | ModifierSet::SHIFT).bits(), 6);
        assert_eq!(ModifierSet::from_raw(0x4006), ModifierSet::CONTROL | ModifierSet::SHIFT);
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::parse("shift+ctrl+enter").unwrap().to_string(), "ctrl+shift+enter");
        assert_eq!(Key::parse("win+alt+q").unwrap().to_string(), "alt+win+q");
        assert_eq!(Key::parse("f12").unwrap().to_string(), "f12");
        assert_eq!(Key::parse("ctrl+1").unwrap().to_string(), "ctrl+1");
        assert_eq!(
            Key::new(ModifierSet::empty(), KeyCode::from_raw(0xAD)).to_string(),
            "vk0xad"
        );
        assert_eq!(Key::parse("vk0xad").unwrap().code.raw(), 0xAD);
    }

    #[test]
    fn test_serialization() {
        let key = Key::parse("ctrl+shift+enter").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"ctrl+shift+enter\"");
        let deserialized: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(key, deserialized);
        assert!(serde_json::from_str::<Key>("\"hyper+a\"").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Key::parse("").is_err());
        assert!(Key::parse("ctrl+").is_err());
        assert!(Key::parse("unknown+a").is_err());
        assert!(Key::parse("ctrl+unknown").is_err());
        assert!(Key::parse("f25").is_err());
        assert!(Key::parse("vk0xzz").is_err());
    }
}
