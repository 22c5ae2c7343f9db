//! Menu nodes

use super::{Action, DtmfSymbol};
use std::collections::BTreeMap;

/// PNR length used by the built-in menus
pub const DEFAULT_CAPTURE_LENGTH: usize = 6;

/// Multi-digit capture settings for a node.
///
/// While a caller sits on a capturing node, digits are appended to the
/// session buffer instead of being looked up in the option table. Only
/// the terminator is dispatched through the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitCapture {
    pub length: usize,
    pub terminator: DtmfSymbol,
}

impl Default for DigitCapture {
    fn default() -> Self {
        Self {
            length: DEFAULT_CAPTURE_LENGTH,
            terminator: DtmfSymbol::HASH,
        }
    }
}

/// A single menu: what the caller hears and what each key does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub id: String,
    pub prompt: String,
    pub capture: Option<DigitCapture>,
    pub options: BTreeMap<DtmfSymbol, Action>,
}

impl MenuNode {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            capture: None,
            options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: DtmfSymbol, action: Action) -> Self {
        self.options.insert(key, action);
        self
    }

    #[must_use]
    pub fn with_capture(mut self, capture: DigitCapture) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn action_for(&self, key: DtmfSymbol) -> Option<&Action> {
        self.options.get(&key)
    }

    /// Accepted keys, in keypad-sorted order
    pub fn valid_symbols(&self) -> Vec<DtmfSymbol> {
        self.options.keys().copied().collect()
    }
}
