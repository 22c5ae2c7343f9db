//! Session engine
//!
//! Owns the live sessions and drives each one through the state machine,
//! one event at a time. Different sessions never wait on each other;
//! events for the same session are serialized by that session's lock.

mod lookup;
pub mod session;
mod storage;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use lookup::StaticReservationDesk;
pub use session::{ArchivedCall, Session, SessionHandle};
pub use storage::InMemoryStorage;
pub use traits::*;

use crate::menu::MenuGraph;
use crate::state_machine::{transition, CallState, Effect, Event, Outcome, TransitionError};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Type alias for the production engine with concrete implementations
pub type ProductionEngine = SessionEngine<InMemoryStorage, StaticReservationDesk>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Call session not found: {0}")]
    SessionNotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TransitionError> for EngineError {
    fn from(e: TransitionError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

/// A freshly started call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedCall {
    pub session_id: String,
    pub prompt: String,
}

/// Result of an external hangup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCallStatus {
    Ended,
    NotFound,
}

/// Counts for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub active_count: usize,
    pub archived_count: usize,
}

/// Outcome of running an event to completion, before it is committed
struct Step {
    state: CallState,
    outcome: Outcome,
    archive: bool,
}

/// Generic engine that works with any store and reservation desk
pub struct SessionEngine<S, L>
where
    S: SessionStore,
    L: ReservationLookup,
{
    graph: Arc<MenuGraph>,
    store: S,
    lookup: L,
}

impl<S, L> SessionEngine<S, L>
where
    S: SessionStore,
    L: ReservationLookup,
{
    pub fn new(graph: Arc<MenuGraph>, store: S, lookup: L) -> Self {
        Self {
            graph,
            store,
            lookup,
        }
    }

    /// Open a session at the root node and return its prompt
    pub async fn start_call(&self, caller: &str) -> StartedCall {
        let session_id = loop {
            let id = new_session_id();
            let handle = SessionHandle::new(Session::new(&id, caller, self.graph.root_id()));
            match self.store.put(handle).await {
                Ok(()) => break id,
                Err(e) => tracing::warn!(error = %e, "Session id collision, retrying"),
            }
        };

        tracing::info!(session_id = %session_id, caller = %caller, "Call started");

        StartedCall {
            session_id,
            prompt: self.graph.root().prompt.clone(),
        }
    }

    /// Apply one caller input to a live session
    pub async fn apply_input(&self, session_id: &str, raw: &str) -> Result<Outcome, EngineError> {
        let handle = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))?;

        let mut session = handle.lock().await;
        // Lost a race with a request that ended this call
        if session.is_ended() {
            return Err(EngineError::SessionNotFound(session_id.to_string()));
        }

        let node = session.state.current_node.clone();
        let step = self.run(&session.state, Event::keypress(raw)).await?;
        let outcome = step.outcome.clone();
        self.commit(&mut session, step).await?;

        tracing::info!(
            session_id = %session_id,
            node = %node,
            digit = %raw,
            status = outcome.status(),
            terminal = outcome.is_terminal(),
            "Input applied"
        );

        Ok(outcome)
    }

    /// External hangup. Ending an unknown or already-ended call is not an
    /// error, it reports `NotFound`.
    pub async fn end_call(&self, session_id: &str) -> Result<EndCallStatus, EngineError> {
        let Some(handle) = self.store.get(session_id).await else {
            return Ok(EndCallStatus::NotFound);
        };

        let mut session = handle.lock().await;
        if session.is_ended() {
            return Ok(EndCallStatus::NotFound);
        }

        let step = self.run(&session.state, Event::Hangup).await?;
        self.commit(&mut session, step).await?;

        tracing::info!(session_id = %session_id, "Call ended by caller");
        Ok(EndCallStatus::Ended)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let (active_count, archived_count) = self.store.counts().await;
        Snapshot {
            active_count,
            archived_count,
        }
    }

    /// Copy of a live session
    pub async fn session(&self, session_id: &str) -> Option<Session> {
        let handle = self.store.get(session_id).await?;
        let session = handle.lock().await;
        (!session.is_ended()).then(|| session.clone())
    }

    pub async fn history(&self) -> Vec<ArchivedCall> {
        self.store.history().await
    }

    /// Most recently started live session for `caller`. Best effort: a
    /// caller with two concurrent calls gets the newer one.
    pub async fn find_by_caller(&self, caller: &str) -> Option<String> {
        self.store
            .list()
            .await
            .into_iter()
            .filter(|handle| handle.caller == caller)
            .max_by_key(|handle| handle.started_at)
            .map(|handle| handle.id)
    }

    /// Run an event through the state machine, executing effects until
    /// the caller has an answer. Works on a copy; nothing is committed.
    async fn run(&self, state: &CallState, event: Event) -> Result<Step, EngineError> {
        let mut result = transition(state, &self.graph, event)?;
        let mut archive = false;

        loop {
            let mut follow_up = None;
            for effect in &result.effects {
                match effect {
                    Effect::LookupReservation { code } => {
                        let reservation = self.lookup.lookup(code).await;
                        tracing::debug!(
                            code = %code,
                            found = reservation.is_some(),
                            "Reservation lookup"
                        );
                        follow_up = Some(Event::LookupCompleted { reservation });
                    }
                    Effect::Archive => archive = true,
                }
            }

            match (result.outcome, follow_up) {
                (Some(outcome), None) => {
                    return Ok(Step {
                        state: result.new_state,
                        outcome,
                        archive,
                    })
                }
                (None, Some(event)) => {
                    result = transition(&result.new_state, &self.graph, event)?;
                }
                (outcome, event) => {
                    return Err(EngineError::Internal(format!(
                        "Transition produced outcome {outcome:?} with follow-up {event:?}"
                    )))
                }
            }
        }
    }

    /// Write a finished step back. Archiving freezes the session and moves
    /// it out of the live set in one store operation.
    async fn commit(&self, session: &mut Session, step: Step) -> Result<(), EngineError> {
        let mut updated = session.clone();
        updated.state = step.state;

        if step.archive {
            let record = updated.close(Utc::now()).ok_or_else(|| {
                EngineError::Internal(format!(
                    "Archive requested for call {} that has not ended",
                    updated.id
                ))
            })?;
            tracing::info!(
                session_id = %record.id,
                caller = %record.caller,
                disposition = ?record.disposition,
                duration_secs = record.duration_secs,
                "Call archived"
            );
            self.store.retire(record).await;
        }

        *session = updated;
        Ok(())
    }
}

fn new_session_id() -> String {
    format!("CALL_{:X}", Uuid::new_v4().simple())
}
