//! Pure state transition function
//!
//! Input handling, in order:
//! 1. every keypress is appended to the input log, valid or not
//! 2. at a capturing node, anything but the terminator feeds the digit buffer
//! 3. everything else is dispatched through the node's option table

use super::{CallPhase, CallState, Disposition, Effect, Event, Outcome, Reservation};
use crate::menu::{Action, ActionKind, DigitCapture, DtmfSymbol, GraphError, MenuGraph, MenuNode};
use thiserror::Error;

const INVALID_OPTION: &str = "Invalid option. Please try again.";
const DIGITS_ONLY: &str = "Only digits are allowed for PNR. Please enter numbers.";
const INCOMPLETE_CODE: &str = "PNR invalid or incomplete. Goodbye.";
const CALLER_HANGUP: &str = "Call ended by caller.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CallState,
    /// Reply for the caller; `None` while an effect is still outstanding
    pub outcome: Option<Outcome>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CallState) -> Self {
        Self {
            new_state: state,
            outcome: None,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Call has already ended")]
    CallEnded,
    #[error("Menu graph does not match call state: {0}")]
    Graph(#[from] GraphError),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &CallState,
    graph: &MenuGraph,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (&state.phase, event) {
        (CallPhase::Ended { .. }, _) => Err(TransitionError::CallEnded),

        (CallPhase::Active, Event::Keypress { raw }) => apply_keypress(state, graph, raw),

        (CallPhase::LookingUp { code }, Event::LookupCompleted { reservation }) => {
            Ok(complete_lookup(state, code, reservation))
        }

        (CallPhase::Active | CallPhase::LookingUp { .. }, Event::Hangup) => {
            let mut next = state.clone();
            next.buffer.clear();
            Ok(finish(
                next,
                Disposition::CallerHangup,
                Outcome::Ended {
                    message: CALLER_HANGUP.to_string(),
                },
            ))
        }

        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}

fn apply_keypress(
    state: &CallState,
    graph: &MenuGraph,
    raw: String,
) -> Result<TransitionResult, TransitionError> {
    let node = graph.node_by_id(&state.current_node)?;
    let symbol = DtmfSymbol::parse(&raw);

    let mut next = state.clone();
    next.input_log.push(raw);

    if let Some(capture) = node.capture {
        if symbol != Some(capture.terminator) {
            let outcome = capture_digit(&mut next, capture, symbol);
            return Ok(TransitionResult::new(next).with_outcome(outcome));
        }
    }

    let Some(action) = symbol.and_then(|key| node.action_for(key)) else {
        return Ok(TransitionResult::new(next).with_outcome(Outcome::InvalidInput {
            prompt: INVALID_OPTION.to_string(),
            valid_symbols: Some(node.valid_symbols()),
        }));
    };

    dispatch(next, graph, node, action)
}

/// Feed one symbol into the digit buffer of a capturing node
fn capture_digit(
    next: &mut CallState,
    capture: DigitCapture,
    symbol: Option<DtmfSymbol>,
) -> Outcome {
    let Some(digit) = symbol.filter(|s| s.is_digit()) else {
        return Outcome::InvalidInput {
            prompt: DIGITS_ONLY.to_string(),
            valid_symbols: None,
        };
    };

    // A full buffer stays full until the terminator arrives
    if next.buffer.len() >= capture.length {
        return Outcome::InvalidInput {
            prompt: format!(
                "You already entered {} digits. Press {} to confirm your PNR.",
                capture.length, capture.terminator
            ),
            valid_symbols: None,
        };
    }

    next.buffer.push(digit.as_char());

    let prompt = if next.buffer.len() < capture.length {
        format!("You entered {digit}. Enter remaining digits.")
    } else {
        format!(
            "You entered {} digits. Press {} to confirm your PNR.",
            capture.length, capture.terminator
        )
    };

    Outcome::Collecting {
        prompt,
        collected: next.buffer.clone(),
    }
}

fn dispatch(
    mut next: CallState,
    graph: &MenuGraph,
    node: &MenuNode,
    action: &Action,
) -> Result<TransitionResult, TransitionError> {
    // Leaving the node by any action empties the buffer
    let captured = std::mem::take(&mut next.buffer);

    match &action.kind {
        ActionKind::Navigate { target } => {
            let target_node = graph.node_by_id(target)?;
            next.current_node.clone_from(target);
            next.path.push(target.clone());
            Ok(TransitionResult::new(next).with_outcome(Outcome::Processed {
                message: action.message.clone(),
                prompt: target_node.prompt.clone(),
                node: target.clone(),
            }))
        }

        ActionKind::EndCall => Ok(finish(
            next,
            Disposition::Completed,
            Outcome::Ended {
                message: action.message.clone(),
            },
        )),

        ActionKind::Transfer => Ok(finish(
            next,
            Disposition::Transferred,
            Outcome::Transferring {
                message: action.message.clone(),
            },
        )),

        ActionKind::Lookup => {
            let capture = node.capture.ok_or_else(|| {
                TransitionError::InvalidTransition(format!(
                    "Lookup on node {} without digit capture",
                    node.id
                ))
            })?;

            if captured.len() == capture.length {
                next.phase = CallPhase::LookingUp {
                    code: captured.clone(),
                };
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::LookupReservation { code: captured }))
            } else {
                Ok(finish(
                    next,
                    Disposition::LookupFailed,
                    Outcome::InvalidLookup {
                        message: INCOMPLETE_CODE.to_string(),
                    },
                ))
            }
        }
    }
}

fn complete_lookup(
    state: &CallState,
    code: &str,
    reservation: Option<Reservation>,
) -> TransitionResult {
    let next = state.clone();
    match reservation {
        Some(reservation) => {
            let message = format!(
                "PNR {code} confirmed. Flight {} {}.",
                reservation.flight_id, reservation.route
            );
            finish(
                next,
                Disposition::ReservationFound {
                    pnr: code.to_string(),
                },
                Outcome::Found {
                    message,
                    reservation,
                },
            )
        }
        None => finish(
            next,
            Disposition::LookupFailed,
            Outcome::InvalidLookup {
                message: format!("No reservation found for PNR {code}. Goodbye."),
            },
        ),
    }
}

fn finish(mut next: CallState, disposition: Disposition, outcome: Outcome) -> TransitionResult {
    next.phase = CallPhase::Ended { disposition };
    TransitionResult::new(next)
        .with_outcome(outcome)
        .with_effect(Effect::Archive)
}
