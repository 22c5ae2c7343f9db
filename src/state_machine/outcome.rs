//! Replies returned to the caller after each step

use super::Reservation;
use crate::menu::DtmfSymbol;

/// What the transport should do with the line after speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirective {
    Hangup,
    Transfer,
}

/// Result of applying one event to a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Moved to another node
    Processed {
        message: String,
        prompt: String,
        node: String,
    },

    /// A digit was captured; keep going
    Collecting { prompt: String, collected: String },

    /// Rejected input. Position and buffer are unchanged. `valid_symbols`
    /// lists the node's keys, or is `None` while capturing digits.
    InvalidInput {
        prompt: String,
        valid_symbols: Option<Vec<DtmfSymbol>>,
    },

    Ended { message: String },

    Transferring { message: String },

    Found {
        message: String,
        reservation: Reservation,
    },

    InvalidLookup { message: String },
}

impl Outcome {
    /// Terminal outcomes carry a directive; the rest expect more input
    pub fn directive(&self) -> Option<CallDirective> {
        match self {
            Outcome::Ended { .. } | Outcome::Found { .. } | Outcome::InvalidLookup { .. } => {
                Some(CallDirective::Hangup)
            }
            Outcome::Transferring { .. } => Some(CallDirective::Transfer),
            Outcome::Processed { .. }
            | Outcome::Collecting { .. }
            | Outcome::InvalidInput { .. } => None,
        }
    }

    /// Short status label, as reported to clients and logs
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Processed { .. } => "processed",
            Outcome::Collecting { .. } => "collecting",
            Outcome::InvalidInput { .. } => "invalid",
            Outcome::Ended { .. } => "call_ended",
            Outcome::Transferring { .. } => "transferring",
            Outcome::Found { .. } => "pnr_found",
            Outcome::InvalidLookup { .. } => "invalid_pnr",
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.directive().is_some()
    }

    /// The text to speak to the caller
    pub fn speech(&self) -> &str {
        match self {
            Outcome::Processed { prompt, .. }
            | Outcome::Collecting { prompt, .. }
            | Outcome::InvalidInput { prompt, .. } => prompt,
            Outcome::Ended { message }
            | Outcome::Transferring { message }
            | Outcome::Found { message, .. }
            | Outcome::InvalidLookup { message } => message,
        }
    }
}
