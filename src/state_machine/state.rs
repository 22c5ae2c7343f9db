//! Call state types

use serde::Serialize;

/// Where a call is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallPhase {
    /// Walking the menus
    #[default]
    Active,

    /// A complete code was submitted; waiting on the reservation desk
    LookingUp { code: String },

    /// Terminal. Nothing leaves this phase.
    Ended { disposition: Disposition },
}

/// How a call finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Disposition {
    /// An `EndCall` option fired
    Completed,
    /// Handed to an agent
    Transferred,
    /// Reservation found for the captured code
    ReservationFound { pnr: String },
    /// Terminator pressed with an incomplete code, or no reservation matched
    LookupFailed,
    /// External hangup
    CallerHangup,
}

/// The mutable part of a session: cursor, audit trail and digit buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallState {
    pub current_node: String,
    /// Node ids visited, starting with the root. Append-only.
    pub path: Vec<String>,
    /// Every raw input received, including rejected ones. Append-only.
    pub input_log: Vec<String>,
    /// Digits gathered at a capturing node; empty everywhere else
    pub buffer: String,
    #[serde(default)]
    pub phase: CallPhase,
}

impl CallState {
    /// Fresh state positioned at `root`
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            current_node: root.clone(),
            path: vec![root],
            input_log: Vec::new(),
            buffer: String::new(),
            phase: CallPhase::Active,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, CallPhase::Ended { .. })
    }

    pub fn disposition(&self) -> Option<&Disposition> {
        match &self.phase {
            CallPhase::Ended { disposition } => Some(disposition),
            _ => None,
        }
    }
}
