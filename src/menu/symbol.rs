//! Keypad symbols

use std::fmt;

/// One DTMF keypress: `0`-`9`, `#` or `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DtmfSymbol(char);

impl DtmfSymbol {
    pub const HASH: DtmfSymbol = DtmfSymbol('#');
    #[allow(dead_code)] // API completeness
    pub const STAR: DtmfSymbol = DtmfSymbol('*');

    /// Keypad digit `d`. Panics when `d > 9`.
    pub const fn digit(d: u8) -> Self {
        assert!(d <= 9, "keypad digits are 0-9");
        DtmfSymbol((b'0' + d) as char)
    }

    pub fn new(c: char) -> Option<Self> {
        matches!(c, '0'..='9' | '#' | '*').then_some(Self(c))
    }

    /// Parse raw caller input. Anything other than exactly one keypad
    /// character yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(c)
    }

    pub fn is_digit(self) -> bool {
        self.0.is_ascii_digit()
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for DtmfSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
