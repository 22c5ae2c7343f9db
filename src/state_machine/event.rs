//! Events that drive a call forward

use serde::Serialize;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Raw caller input, exactly as received. Usually one keypad symbol,
    /// but anything the transport delivers is accepted and audited.
    Keypress { raw: String },

    /// The reservation desk answered a lookup request
    LookupCompleted { reservation: Option<Reservation> },

    /// The caller (or the transport on their behalf) hung up
    Hangup,
}

impl Event {
    pub fn keypress(raw: impl Into<String>) -> Self {
        Event::Keypress { raw: raw.into() }
    }
}

/// A reservation record returned by the lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub pnr: String,
    pub flight_id: String,
    pub status: String,
    pub route: String,
}
