//! Telephony provider webhooks
//!
//! Translates the provider's form posts into engine calls and answers
//! with TwiML. The provider only tells us the caller's number, so the
//! live session is found by caller.

mod twiml;

pub use twiml::Twiml;

use crate::api::AppState;
use crate::state_machine::Outcome;
use axum::{
    extract::State,
    http::{header::HOST, HeaderMap},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

const DTMF_PATH: &str = "/twilio/dtmf";
const TIMEOUT_PATH: &str = "/twilio/timeout";
const UNKNOWN_CALLER: &str = "unknown";
const NO_INPUT: &str = "No input received. Goodbye.";
const APOLOGY: &str = "Sorry, something went wrong. Goodbye.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/voice", post(incoming_call))
        .route(DTMF_PATH, post(keypress))
        .route(TIMEOUT_PATH, post(gather_timeout))
}

#[derive(Debug, Default, Deserialize)]
struct CallForm {
    #[serde(rename = "From")]
    from: Option<String>,
    #[serde(rename = "CallSid")]
    call_sid: Option<String>,
    #[serde(rename = "Digits")]
    digits: Option<String>,
}

impl CallForm {
    fn caller(&self) -> &str {
        self.from
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(UNKNOWN_CALLER)
    }
}

/// Absolute callback URL for `path`, or the bare path when no host is known
fn callback_url(state: &AppState, headers: &HeaderMap, path: &str) -> String {
    let host = state.config.public_host.clone().or_else(|| {
        headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|host| !host.is_empty())
            .map(str::to_string)
    });
    match host {
        Some(host) => format!("https://{host}{path}"),
        None => path.to_string(),
    }
}

/// Speak `text` and wait for the next key
fn prompt_for_key(state: &AppState, headers: &HeaderMap, text: &str) -> Twiml {
    let config = &state.config;
    Twiml::new()
        .say(&config.voice, text)
        .gather(&callback_url(state, headers, DTMF_PATH), config.gather_timeout_secs)
        .redirect(&callback_url(state, headers, TIMEOUT_PATH))
}

fn render_outcome(state: &AppState, headers: &HeaderMap, outcome: &Outcome) -> Twiml {
    let voice = &state.config.voice;
    match outcome {
        Outcome::Processed { .. } | Outcome::Collecting { .. } | Outcome::InvalidInput { .. } => {
            prompt_for_key(state, headers, outcome.speech())
        }
        Outcome::Transferring { message } => {
            let response = Twiml::new().say(voice, message);
            match &state.config.agent_number {
                Some(number) => response.dial(number),
                None => response.hangup(),
            }
        }
        Outcome::Ended { .. } | Outcome::Found { .. } | Outcome::InvalidLookup { .. } => {
            Twiml::new().say(voice, outcome.speech()).hangup()
        }
    }
}

async fn incoming_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CallForm>,
) -> Twiml {
    let call = state.engine.start_call(form.caller()).await;
    tracing::info!(
        session_id = %call.session_id,
        caller = %form.caller(),
        call_sid = ?form.call_sid,
        "Provider call mapped to session"
    );
    prompt_for_key(&state, &headers, &call.prompt)
}

async fn keypress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CallForm>,
) -> Twiml {
    let caller = form.caller();
    let digits = form.digits.as_deref().unwrap_or_default();

    let session_id = match state.engine.find_by_caller(caller).await {
        Some(id) => id,
        None => {
            let call = state.engine.start_call(caller).await;
            tracing::warn!(
                session_id = %call.session_id,
                caller = %caller,
                "No live session for caller, started a fallback session"
            );
            call.session_id
        }
    };

    tracing::debug!(
        session_id = %session_id,
        caller = %caller,
        digit = %digits,
        call_sid = ?form.call_sid,
        "Provider keypress"
    );

    match state.engine.apply_input(&session_id, digits).await {
        Ok(outcome) => render_outcome(&state, &headers, &outcome),
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Keypress failed");
            Twiml::new().say(&state.config.voice, APOLOGY).hangup()
        }
    }
}

async fn gather_timeout(State(state): State<AppState>, Form(form): Form<CallForm>) -> Twiml {
    let caller = form.caller();
    if let Some(session_id) = state.engine.find_by_caller(caller).await {
        match state.engine.end_call(&session_id).await {
            Ok(status) => {
                tracing::info!(session_id = %session_id, status = ?status, "Caller timed out");
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Timeout hangup failed");
            }
        }
    }
    Twiml::new().say(&state.config.voice, NO_INPUT).hangup()
}
