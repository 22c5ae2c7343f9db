//! Effects produced by state transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the reservation desk about a captured code, then feed the
    /// answer back as `Event::LookupCompleted`
    LookupReservation { code: String },

    /// The call is over: freeze the session and move it to the archive
    Archive,
}
