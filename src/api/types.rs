//! API request and response types

use crate::runtime::{ArchivedCall, Session};
use crate::state_machine::{CallDirective, Outcome, Reservation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to start a simulated call
#[derive(Debug, Deserialize)]
pub struct StartCallRequest {
    pub caller_number: String,
    /// Accepted for client compatibility; the server issues its own id
    #[allow(dead_code)]
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartCallResponse {
    pub call_id: String,
    pub status: &'static str,
    pub prompt: String,
}

/// One keypress for a live call
#[derive(Debug, Deserialize)]
pub struct DtmfRequest {
    pub call_id: String,
    pub digit: String,
    /// Ignored; the server's view of the menu position wins
    #[allow(dead_code)]
    #[serde(default)]
    pub current_menu: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EndCallQuery {
    pub call_id: String,
}

#[derive(Debug, Serialize)]
pub struct EndCallResponse {
    pub status: &'static str,
    pub call_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_calls: usize,
    pub total_calls: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub calls: Vec<ArchivedCall>,
}

/// Outcome of one keypress as sent to JSON clients
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OutcomeResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_menu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_action: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

impl From<Outcome> for OutcomeResponse {
    fn from(outcome: Outcome) -> Self {
        let mut response = OutcomeResponse {
            status: outcome.status(),
            message: None,
            prompt: None,
            current_menu: None,
            collected: None,
            valid: None,
            call_action: outcome.directive().map(call_action),
            reservation: None,
        };

        match outcome {
            Outcome::Processed {
                message,
                prompt,
                node,
            } => {
                response.message = Some(message);
                response.prompt = Some(prompt);
                response.current_menu = Some(node);
            }
            Outcome::Collecting { prompt, collected } => {
                response.prompt = Some(prompt);
                response.collected = Some(collected);
            }
            Outcome::InvalidInput {
                prompt,
                valid_symbols,
            } => {
                response.prompt = Some(prompt);
                response.valid = valid_symbols
                    .map(|symbols| symbols.iter().map(ToString::to_string).collect());
            }
            Outcome::Found {
                message,
                reservation,
            } => {
                response.message = Some(message);
                response.reservation = Some(reservation);
            }
            Outcome::Ended { message }
            | Outcome::Transferring { message }
            | Outcome::InvalidLookup { message } => {
                response.message = Some(message);
            }
        }

        response
    }
}

fn call_action(directive: CallDirective) -> &'static str {
    match directive {
        CallDirective::Hangup => "hangup",
        CallDirective::Transfer => "transfer",
    }
}

/// A live call as reported to clients
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub call_id: String,
    pub caller_number: String,
    pub start_time: DateTime<Utc>,
    pub current_menu: String,
    pub menu_path: Vec<String>,
    pub inputs: Vec<String>,
    pub collected: String,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            call_id: session.id,
            caller_number: session.caller,
            start_time: session.started_at,
            current_menu: session.state.current_node,
            menu_path: session.state.path,
            inputs: session.state.input_log,
            collected: session.state.buffer,
        }
    }
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
